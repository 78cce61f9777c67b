//! Per-wallet attempt and best-score tracking.
//!
//! A (wallet, quiz) pair moves from unseen, to active while fewer than
//! [`MAX_ATTEMPTS`](crate::models::user_quiz::MAX_ATTEMPTS) attempts are
//! recorded, to exhausted. There is no way back. Store failures do not fail
//! the request: callers get a zeroed status with an explanatory message.

use std::sync::Arc;

use uuid::Uuid;

use crate::database::QuizStore;
use crate::dto::user_quiz_dto::{AttemptStatusResponse, ScoreResponse};
use crate::error::{Error, Result};
use crate::models::quiz::parse_quiz_id;

const STORE_UNAVAILABLE: &str = "Attempt data is temporarily unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptCheck {
    Known(AttemptStatusResponse),
    /// The quiz does not exist; callers report it as exhausted.
    UnknownQuiz,
}

#[derive(Clone)]
pub struct AttemptService {
    store: Arc<dyn QuizStore>,
}

impl AttemptService {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self { store }
    }

    /// Returns the pair's status, creating a zero-attempt record when the
    /// quiz exists but the wallet has not been seen on it.
    pub async fn check_or_create(&self, wallet_address: &str, raw_quiz_id: &str) -> AttemptCheck {
        let Some(quiz_id) = parse_quiz_id(raw_quiz_id) else {
            return AttemptCheck::UnknownQuiz;
        };

        match self.quiz_exists(quiz_id).await {
            Ok(false) => return AttemptCheck::UnknownQuiz,
            Ok(true) => {}
            Err(e) => return self.degraded(e),
        }

        match self.store.create_attempt_if_absent(wallet_address, quiz_id).await {
            Ok(record) => AttemptCheck::Known((&record).into()),
            Err(e) => self.degraded(e),
        }
    }

    /// Read-only status lookup; never creates a record.
    pub async fn attempts(&self, wallet_address: &str, raw_quiz_id: &str) -> AttemptCheck {
        let Some(quiz_id) = parse_quiz_id(raw_quiz_id) else {
            return AttemptCheck::UnknownQuiz;
        };

        match self.quiz_exists(quiz_id).await {
            Ok(false) => return AttemptCheck::UnknownQuiz,
            Ok(true) => {}
            Err(e) => return self.degraded(e),
        }

        match self.store.find_attempt(wallet_address, quiz_id).await {
            Ok(record) => AttemptCheck::Known(
                record
                    .as_ref()
                    .map(AttemptStatusResponse::from)
                    .unwrap_or_else(|| AttemptStatusResponse::from_attempts(0)),
            ),
            Err(e) => self.degraded(e),
        }
    }

    /// Records one more attempt on an existing quiz. The stored counter is
    /// not capped; only the reported remaining allowance is floored at zero.
    pub async fn increment(&self, wallet_address: &str, raw_quiz_id: &str) -> Result<AttemptCheck> {
        let quiz_id = require_quiz_id(raw_quiz_id)?;

        match self.quiz_exists(quiz_id).await {
            Ok(false) => return Ok(AttemptCheck::UnknownQuiz),
            Ok(true) => {}
            Err(e) => return Ok(self.degraded(e)),
        }

        match self.store.increment_attempts(wallet_address, quiz_id).await {
            Ok(record) => {
                tracing::info!(
                    wallet = wallet_address,
                    quiz_id = %quiz_id,
                    attempts = record.attempts,
                    "Attempt recorded"
                );
                Ok(AttemptCheck::Known((&record).into()))
            }
            Err(e) => {
                tracing::error!(wallet = wallet_address, quiz_id = %quiz_id, error = ?e, "Failed to increment attempts");
                Ok(AttemptCheck::Known(AttemptStatusResponse::degraded(STORE_UNAVAILABLE)))
            }
        }
    }

    /// Keeps the best score seen for the pair and returns it. Scores for
    /// quizzes that do not exist are refused.
    pub async fn update_best_score(
        &self,
        wallet_address: &str,
        raw_quiz_id: &str,
        score: i32,
    ) -> Result<ScoreResponse> {
        let quiz_id = require_quiz_id(raw_quiz_id)?;
        if score < 0 {
            return Err(Error::BadRequest("score must not be negative".into()));
        }

        match self.quiz_exists(quiz_id).await {
            Ok(false) => return Err(Error::NotFound(format!("Quiz {} not found", quiz_id))),
            Ok(true) => {}
            Err(e) => {
                tracing::error!(quiz_id = %quiz_id, error = ?e, "Quiz lookup failed");
                return Ok(unavailable_score());
            }
        }

        match self.store.record_score(wallet_address, quiz_id, score).await {
            Ok(update) => {
                if update.updated {
                    tracing::info!(wallet = wallet_address, quiz_id = %quiz_id, best_score = update.best_score, "New best score");
                }
                Ok(ScoreResponse {
                    best_score: update.best_score,
                    updated: update.updated,
                    message: None,
                })
            }
            Err(e) => {
                tracing::error!(wallet = wallet_address, quiz_id = %quiz_id, error = ?e, "Failed to update best score");
                Ok(unavailable_score())
            }
        }
    }

    async fn quiz_exists(&self, quiz_id: Uuid) -> Result<bool> {
        self.store.quiz_exists(quiz_id).await
    }

    fn degraded(&self, e: Error) -> AttemptCheck {
        tracing::error!(error = ?e, "Attempt lookup failed");
        AttemptCheck::Known(AttemptStatusResponse::degraded(STORE_UNAVAILABLE))
    }
}

fn unavailable_score() -> ScoreResponse {
    ScoreResponse {
        best_score: 0,
        updated: false,
        message: Some(STORE_UNAVAILABLE.into()),
    }
}

fn require_quiz_id(raw: &str) -> Result<Uuid> {
    parse_quiz_id(raw).ok_or_else(|| Error::BadRequest(format!("Invalid quiz_id: {}", raw)))
}
