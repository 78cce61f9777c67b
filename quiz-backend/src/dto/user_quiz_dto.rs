use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user_quiz::{remaining_attempts, UserQuiz};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserQuizRequest {
    #[validate(length(min = 1, message = "wallet_address is required"))]
    pub wallet_address: String,
    #[validate(length(min = 1, message = "quiz_id is required"))]
    pub quiz_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateScoreRequest {
    #[validate(length(min = 1, message = "wallet_address is required"))]
    pub wallet_address: String,
    #[validate(length(min = 1, message = "quiz_id is required"))]
    pub quiz_id: String,
    #[validate(range(min = 0, message = "score must not be negative"))]
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStatusResponse {
    pub attempts: i32,
    pub remaining_attempts: i32,
    pub exceeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AttemptStatusResponse {
    pub fn from_attempts(attempts: i32) -> Self {
        let remaining = remaining_attempts(attempts);
        Self {
            attempts,
            remaining_attempts: remaining,
            exceeded: remaining == 0,
            message: None,
        }
    }

    /// An unknown quiz has no allowance at all.
    pub fn unknown_quiz() -> Self {
        Self {
            attempts: 0,
            remaining_attempts: 0,
            exceeded: true,
            message: Some("Quiz not found".into()),
        }
    }

    /// Zeroed answer for when the store could not be reached.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            attempts: 0,
            remaining_attempts: 0,
            exceeded: false,
            message: Some(message.into()),
        }
    }
}

impl From<&UserQuiz> for AttemptStatusResponse {
    fn from(record: &UserQuiz) -> Self {
        Self::from_attempts(record.attempts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub best_score: i32,
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
