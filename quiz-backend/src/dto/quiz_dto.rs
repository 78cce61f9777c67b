use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::pagination::Pagination;
use crate::models::quiz::{Question, QuizSummary};

fn default_num_questions() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuestionsQuery {
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuestionsResponse {
    pub quiz_id: Uuid,
    pub questions: Vec<Question>,
    /// `"success"`, or `"warning"` when the quiz could not be fully persisted.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuizQuery {
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub num_questions: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub quiz_id: Uuid,
    pub questions: Vec<Question>,
    pub metadata: QuizMetadata,
    pub attempts: i32,
    pub best_score: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizListResponse {
    pub data: Vec<QuizSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(length(min = 1))]
    pub wallet_address: Option<String>,
    /// Question index to the chosen option text.
    pub answers: BTreeMap<usize, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub answer: String,
    pub correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub quiz_id: Uuid,
    pub score: i32,
    pub total: usize,
    pub answers: BTreeMap<usize, GradedAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<i32>,
}
