use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Every generated question carries exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    pub fn has_correct_option(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub filename: String,
    #[sqlx(json)]
    pub questions: Vec<Question>,
    pub num_questions: i32,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(filename: String, questions: Vec<Question>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            num_questions: questions.len() as i32,
            questions,
            created_at: Utc::now(),
        }
    }
}

/// Catalogue row for a stored quiz, without its questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuizSummary {
    pub quiz_id: Uuid,
    pub filename: String,
    pub num_questions: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            quiz_id: quiz.id,
            filename: quiz.filename.clone(),
            num_questions: quiz.num_questions,
            created_at: quiz.created_at,
        }
    }
}

/// Quiz ids are UUIDs; anything else can never match a stored quiz.
pub fn parse_quiz_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
