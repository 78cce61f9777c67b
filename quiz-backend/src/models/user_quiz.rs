use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Scored attempts allowed per (wallet, quiz) pair.
pub const MAX_ATTEMPTS: i32 = 3;

/// Attempt and best-score state for one wallet on one quiz.
///
/// `attempts` is never clamped on write and may exceed [`MAX_ATTEMPTS`];
/// callers derive the remaining allowance with [`remaining_attempts`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserQuiz {
    pub wallet_address: String,
    pub quiz_id: Uuid,
    pub attempts: i32,
    pub best_score: i32,
    pub allowed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserQuiz {
    pub fn new(wallet_address: &str, quiz_id: Uuid, attempts: i32, best_score: i32) -> Self {
        let now = Utc::now();
        Self {
            wallet_address: wallet_address.to_string(),
            quiz_id,
            attempts,
            best_score,
            allowed: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn remaining(&self) -> i32 {
        remaining_attempts(self.attempts)
    }

    pub fn exceeded(&self) -> bool {
        self.remaining() == 0
    }
}

pub fn remaining_attempts(attempts: i32) -> i32 {
    (MAX_ATTEMPTS - attempts).max(0)
}

/// Outcome of reporting a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub best_score: i32,
    pub updated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ScoreEntry {
    pub wallet_address: String,
    pub score: i32,
}
