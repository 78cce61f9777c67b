use std::sync::Arc;

use crate::database::QuizStore;
use crate::dto::leaderboard_dto::{LeaderboardEntry, LeaderboardQuery, LeaderboardResponse};
use crate::dto::pagination::PageWindow;
use crate::error::{Error, Result};
use crate::models::quiz::parse_quiz_id;

#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn QuizStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self { store }
    }

    pub async fn page(&self, query: &LeaderboardQuery) -> Result<LeaderboardResponse> {
        let quiz_id = match query.quiz_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                parse_quiz_id(raw)
                    .ok_or_else(|| Error::BadRequest(format!("Invalid quiz_id: {}", raw)))?,
            ),
            None => None,
        };
        let window = PageWindow::resolve(query.limit, query.page);

        let (entries, total) = self
            .store
            .leaderboard(quiz_id, window.limit, window.offset)
            .await?;

        let data = entries
            .into_iter()
            .enumerate()
            .map(|(idx, e)| LeaderboardEntry {
                rank: window.rank(idx),
                wallet_address: e.wallet_address,
                score: e.score,
            })
            .collect();

        Ok(LeaderboardResponse {
            data,
            pagination: window.pagination(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryQuizStore;
    use crate::dto::pagination::{Pagination, MAX_LIMIT};
    use crate::models::quiz::{Question, Quiz};
    use uuid::Uuid;

    async fn store_with_quiz() -> (Arc<MemoryQuizStore>, Uuid) {
        let store = Arc::new(MemoryQuizStore::new());
        let quiz = Quiz::new(
            "ranked.pdf".into(),
            vec![Question {
                question: "Q?".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: "a".into(),
            }],
        );
        store.insert_quiz(&quiz).await.unwrap();
        (store, quiz.id)
    }

    #[tokio::test]
    async fn ranks_continue_across_pages() {
        let (store, quiz) = store_with_quiz().await;
        for (wallet, score) in [("a", 10), ("b", 8), ("c", 6), ("d", 4), ("e", 2)] {
            store.record_score(wallet, quiz, score).await.unwrap();
        }
        let svc = LeaderboardService::new(store);

        let second = svc
            .page(&LeaderboardQuery {
                limit: Some(2),
                page: Some(2),
                quiz_id: None,
            })
            .await
            .unwrap();
        assert_eq!(second.data.len(), 2);
        assert_eq!(second.data[0].rank, 3);
        assert_eq!(second.data[0].wallet_address, "c");
        assert_eq!(
            second.pagination,
            Pagination { total: 5, page: 2, limit: 2, pages: 3 }
        );
    }

    #[tokio::test]
    async fn clamps_paging_and_rejects_bad_quiz_ids() {
        let svc = LeaderboardService::new(Arc::new(MemoryQuizStore::new()));
        let resp = svc
            .page(&LeaderboardQuery {
                limit: Some(10_000),
                page: Some(-3),
                quiz_id: None,
            })
            .await
            .unwrap();
        assert_eq!(resp.pagination.limit, MAX_LIMIT);
        assert_eq!(resp.pagination.page, 1);
        assert_eq!(resp.pagination.pages, 0);

        let err = svc
            .page(&LeaderboardQuery {
                quiz_id: Some("abc".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_a_panic() {
        let (store, quiz) = store_with_quiz().await;
        store.record_score("a", quiz, 3).await.unwrap();
        let svc = LeaderboardService::new(store);

        let resp = svc
            .page(&LeaderboardQuery {
                limit: Some(MAX_LIMIT),
                page: Some(i64::MAX),
                quiz_id: None,
            })
            .await
            .unwrap();
        assert!(resp.data.is_empty());
        assert_eq!(resp.pagination.page, i64::MAX);
        assert_eq!(resp.pagination.total, 1);
    }
}
