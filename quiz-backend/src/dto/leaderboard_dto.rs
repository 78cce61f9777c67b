use serde::{Deserialize, Serialize};

use crate::dto::pagination::Pagination;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub quiz_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub wallet_address: String,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub data: Vec<LeaderboardEntry>,
    pub pagination: Pagination,
}
