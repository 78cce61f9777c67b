pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::{pool, MemoryQuizStore, PgQuizStore, QuizStore};
use crate::error::{Error, Result};
use crate::services::{
    ai_service::{OpenAiGenerator, QuestionGenerator},
    attempt_service::AttemptService,
    extract_service::{PdftotextExtractor, TextExtractor},
    leaderboard_service::LeaderboardService,
    quiz_service::QuizService,
};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuizStore>,
    pub quiz_service: QuizService,
    pub attempt_service: AttemptService,
    pub leaderboard_service: LeaderboardService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn QuizStore>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn QuestionGenerator>,
        max_questions: usize,
    ) -> Self {
        let quiz_service = QuizService::new(store.clone(), extractor, generator, max_questions);
        let attempt_service = AttemptService::new(store.clone());
        let leaderboard_service = LeaderboardService::new(store.clone());

        Self {
            store,
            quiz_service,
            attempt_service,
            leaderboard_service,
        }
    }

    /// Wires the production collaborators. Without a `DATABASE_URL` the
    /// service runs against an in-memory store.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn QuizStore> = match config.database_url.as_deref() {
            Some(url) => {
                let pool = pool::create_pool(url).await?;
                pool::run_migrations(&pool).await?;
                tracing::info!("Using Postgres quiz store");
                Arc::new(PgQuizStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; quizzes will be kept in memory only");
                Arc::new(MemoryQuizStore::new())
            }
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.openai_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let generator = OpenAiGenerator::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.llm_model.clone(),
            http_client,
        );
        let extractor = PdftotextExtractor::new(config.pdftotext_bin.clone());

        Ok(Self::new(
            store,
            Arc::new(extractor),
            Arc::new(generator),
            config.max_questions,
        ))
    }
}
