use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::store::QuizStore;
use crate::error::{Error, Result};
use crate::models::quiz::{Quiz, QuizSummary};
use crate::models::user_quiz::{ScoreEntry, ScoreUpdate, UserQuiz};

#[derive(Default)]
struct MemoryState {
    quizzes: HashMap<Uuid, Quiz>,
    attempts: HashMap<(String, Uuid), UserQuiz>,
}

/// Process-local store used when no `DATABASE_URL` is configured and in tests.
/// Each operation runs under one lock, so read-modify-write is atomic.
#[derive(Default)]
pub struct MemoryQuizStore {
    state: Mutex<MemoryState>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("memory store mutex poisoned".to_string()))
    }

    pub fn quiz_count(&self) -> usize {
        self.lock().map(|s| s.quizzes.len()).unwrap_or(0)
    }

    pub fn attempt_count(&self) -> usize {
        self.lock().map(|s| s.attempts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()> {
        let mut state = self.lock()?;
        if state.quizzes.contains_key(&quiz.id) {
            return Err(Error::Internal(format!("Quiz {} already exists", quiz.id)));
        }
        state.quizzes.insert(quiz.id, quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Option<Quiz>> {
        Ok(self.lock()?.quizzes.get(&id).cloned())
    }

    async fn quiz_exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.lock()?.quizzes.contains_key(&id))
    }

    async fn list_quizzes(&self, limit: i64, offset: i64) -> Result<(Vec<QuizSummary>, i64)> {
        let state = self.lock()?;
        let mut summaries: Vec<QuizSummary> = state.quizzes.values().map(QuizSummary::from).collect();
        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.quiz_id.cmp(&b.quiz_id))
        });

        let total = summaries.len() as i64;
        let page = summaries
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((page, total))
    }

    async fn find_attempt(&self, wallet_address: &str, quiz_id: Uuid) -> Result<Option<UserQuiz>> {
        let key = (wallet_address.to_string(), quiz_id);
        Ok(self.lock()?.attempts.get(&key).cloned())
    }

    async fn find_attempt_for_quiz(&self, quiz_id: Uuid) -> Result<Option<UserQuiz>> {
        Ok(self
            .lock()?
            .attempts
            .values()
            .filter(|r| r.quiz_id == quiz_id)
            .max_by_key(|r| r.updated_at)
            .cloned())
    }

    async fn create_attempt_if_absent(&self, wallet_address: &str, quiz_id: Uuid) -> Result<UserQuiz> {
        let mut state = self.lock()?;
        let record = state
            .attempts
            .entry((wallet_address.to_string(), quiz_id))
            .or_insert_with(|| UserQuiz::new(wallet_address, quiz_id, 0, 0));
        Ok(record.clone())
    }

    async fn increment_attempts(&self, wallet_address: &str, quiz_id: Uuid) -> Result<UserQuiz> {
        let mut state = self.lock()?;
        let record = state
            .attempts
            .entry((wallet_address.to_string(), quiz_id))
            .or_insert_with(|| UserQuiz::new(wallet_address, quiz_id, 0, 0));
        record.attempts += 1;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn record_score(&self, wallet_address: &str, quiz_id: Uuid, score: i32) -> Result<ScoreUpdate> {
        let mut state = self.lock()?;
        let key = (wallet_address.to_string(), quiz_id);
        match state.attempts.get_mut(&key) {
            Some(record) => {
                let updated = score > record.best_score;
                if updated {
                    record.best_score = score;
                    record.updated_at = Utc::now();
                }
                Ok(ScoreUpdate {
                    best_score: record.best_score,
                    updated,
                })
            }
            None => {
                state
                    .attempts
                    .insert(key, UserQuiz::new(wallet_address, quiz_id, 1, score));
                Ok(ScoreUpdate {
                    best_score: score,
                    updated: true,
                })
            }
        }
    }

    async fn leaderboard(
        &self,
        quiz_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScoreEntry>, i64)> {
        let state = self.lock()?;
        let mut best: HashMap<&str, i32> = HashMap::new();
        for record in state.attempts.values() {
            if record.best_score <= 0
                || quiz_id.is_some_and(|id| id != record.quiz_id)
                || !state.quizzes.contains_key(&record.quiz_id)
            {
                continue;
            }
            let entry = best.entry(record.wallet_address.as_str()).or_insert(0);
            *entry = (*entry).max(record.best_score);
        }

        let mut entries: Vec<ScoreEntry> = best
            .into_iter()
            .map(|(wallet, score)| ScoreEntry {
                wallet_address: wallet.to_string(),
                score,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.wallet_address.cmp(&b.wallet_address))
        });

        let total = entries.len() as i64;
        let page = entries
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((page, total))
    }
}
