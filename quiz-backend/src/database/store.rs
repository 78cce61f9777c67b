//! Storage seam for quizzes and per-wallet attempt records.
//!
//! The service keeps no authoritative state between requests; every
//! operation goes through a [`QuizStore`]. Counter and score mutations are
//! single atomic operations on the store so concurrent requests for the same
//! (wallet, quiz) pair never lose an increment.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::quiz::{Quiz, QuizSummary};
use crate::models::user_quiz::{ScoreEntry, ScoreUpdate, UserQuiz};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()>;

    async fn get_quiz(&self, id: Uuid) -> Result<Option<Quiz>>;

    async fn quiz_exists(&self, id: Uuid) -> Result<bool>;

    /// Newest first. Also returns the total number of stored quizzes.
    async fn list_quizzes(&self, limit: i64, offset: i64) -> Result<(Vec<QuizSummary>, i64)>;

    async fn find_attempt(&self, wallet_address: &str, quiz_id: Uuid) -> Result<Option<UserQuiz>>;

    /// Most recently touched record for the quiz, whichever wallet owns it.
    async fn find_attempt_for_quiz(&self, quiz_id: Uuid) -> Result<Option<UserQuiz>>;

    /// Returns the existing record, or inserts one with zero attempts.
    async fn create_attempt_if_absent(&self, wallet_address: &str, quiz_id: Uuid) -> Result<UserQuiz>;

    /// Adds one attempt, creating the record (at 1) when it does not exist.
    async fn increment_attempts(&self, wallet_address: &str, quiz_id: Uuid) -> Result<UserQuiz>;

    /// Keeps the higher of the stored best score and `score`. A missing
    /// record is created with one attempt and `score` as its best.
    async fn record_score(&self, wallet_address: &str, quiz_id: Uuid, score: i32) -> Result<ScoreUpdate>;

    /// One row per wallet with its highest non-zero best score on quizzes
    /// that exist, ordered by score descending then wallet. Also returns the
    /// total wallet count.
    async fn leaderboard(
        &self,
        quiz_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScoreEntry>, i64)>;
}
