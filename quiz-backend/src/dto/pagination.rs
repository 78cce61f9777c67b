use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

/// Resolved `limit`/`page` query values. Arithmetic saturates, so an
/// absurd page number yields an empty page instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub page: i64,
    pub offset: i64,
}

impl PageWindow {
    pub fn resolve(limit: Option<i64>, page: Option<i64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = page.unwrap_or(1).max(1);
        Self {
            limit,
            page,
            offset: (page - 1).saturating_mul(limit),
        }
    }

    /// 1-based position of the `idx`-th row of this page.
    pub fn rank(&self, idx: usize) -> i64 {
        self.offset
            .saturating_add(i64::try_from(idx).unwrap_or(i64::MAX))
            .saturating_add(1)
    }

    pub fn pagination(&self, total: i64) -> Pagination {
        Pagination {
            total,
            page: self.page,
            limit: self.limit,
            pages: (total + self.limit - 1) / self.limit,
        }
    }
}
