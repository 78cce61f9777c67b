//! Quiz generation pipeline and quiz retrieval.
//!
//! Generation runs extraction, question generation and persistence in
//! sequence. Extraction and generation failures end the request; storage
//! failures after a successful generation only downgrade the response to a
//! warning so the generated questions are never thrown away.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use rand::seq::SliceRandom;

use crate::database::QuizStore;
use crate::dto::pagination::PageWindow;
use crate::dto::quiz_dto::{
    GenerateQuestionsResponse, QuizListQuery, QuizListResponse, QuizMetadata, QuizResponse,
};
use crate::error::{Error, Result};
use crate::models::quiz::{parse_quiz_id, Question, Quiz, OPTIONS_PER_QUESTION};
use crate::services::ai_service::QuestionGenerator;
use crate::services::extract_service::TextExtractor;

pub const MAX_UPLOAD_BYTES: usize = 60 * 1024 * 1024;
/// Only this many leading characters of a document are sent for generation.
pub const MAX_SOURCE_CHARS: usize = 4000;

#[derive(Debug, Clone)]
pub struct GenerateQuizInput {
    pub filename: String,
    pub data: Bytes,
    pub num_questions: usize,
    pub wallet_address: Option<String>,
}

#[derive(Clone)]
pub struct QuizService {
    store: Arc<dyn QuizStore>,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn QuestionGenerator>,
    max_questions: usize,
}

impl QuizService {
    pub fn new(
        store: Arc<dyn QuizStore>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn QuestionGenerator>,
        max_questions: usize,
    ) -> Self {
        Self {
            store,
            extractor,
            generator,
            max_questions,
        }
    }

    pub fn validate_question_count(&self, num_questions: usize) -> Result<()> {
        if num_questions == 0 || num_questions > self.max_questions {
            return Err(Error::BadRequest(format!(
                "num_questions must be between 1 and {}",
                self.max_questions
            )));
        }
        Ok(())
    }

    pub async fn generate_quiz(&self, input: GenerateQuizInput) -> Result<GenerateQuestionsResponse> {
        validate_upload(&input.filename, input.data.len())?;
        self.validate_question_count(input.num_questions)?;

        tracing::info!(
            filename = %input.filename,
            bytes = input.data.len(),
            num_questions = input.num_questions,
            "Generating quiz"
        );

        let text = self.extractor.extract_text(&input.data).await?;
        if text.trim().is_empty() {
            return Err(Error::Unprocessable(
                "No text could be extracted from the PDF. It may be scanned, encrypted or empty."
                    .into(),
            ));
        }
        let source = truncate_chars(&text, MAX_SOURCE_CHARS);

        let generated = self.generator.generate(source, input.num_questions).await?;
        let mut questions = validate_generated(generated, input.num_questions)?;

        // ThreadRng is not Send, so it must not live across the awaits below.
        for q in questions.iter_mut() {
            q.options.shuffle(&mut rand::thread_rng());
        }

        let quiz = Quiz::new(input.filename, questions);
        let mut warnings: Vec<String> = Vec::new();

        match self.store.insert_quiz(&quiz).await {
            Ok(()) => tracing::info!(quiz_id = %quiz.id, "Quiz stored"),
            Err(e) => {
                tracing::error!(quiz_id = %quiz.id, error = ?e, "Failed to store quiz");
                warnings.push("Quiz was generated but could not be saved".into());
            }
        }

        if let Some(wallet) = input.wallet_address.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            if let Err(e) = self.store.create_attempt_if_absent(wallet, quiz.id).await {
                tracing::error!(quiz_id = %quiz.id, wallet, error = ?e, "Failed to link wallet to quiz");
                warnings.push("Quiz was generated but could not be linked to the wallet".into());
            }
        }

        let (status, warning) = if warnings.is_empty() {
            ("success".to_string(), None)
        } else {
            ("warning".to_string(), Some(warnings.join("; ")))
        };

        Ok(GenerateQuestionsResponse {
            quiz_id: quiz.id,
            questions: quiz.questions,
            status,
            warning,
        })
    }

    /// Loads a stored quiz or fails with `NotFound`, including for ids that
    /// are not UUIDs.
    pub async fn load_quiz(&self, raw_id: &str) -> Result<Quiz> {
        let not_found = || Error::NotFound(format!("Quiz {} not found", raw_id));
        let id = parse_quiz_id(raw_id).ok_or_else(not_found)?;
        self.store.get_quiz(id).await?.ok_or_else(not_found)
    }

    pub async fn get_quiz(&self, raw_id: &str, wallet_address: Option<&str>) -> Result<QuizResponse> {
        let quiz = self.load_quiz(raw_id).await?;

        let record = match wallet_address.map(str::trim).filter(|w| !w.is_empty()) {
            Some(wallet) => self.store.find_attempt(wallet, quiz.id).await?,
            None => self.store.find_attempt_for_quiz(quiz.id).await?,
        };
        let (attempts, best_score) = record.map_or((0, 0), |r| (r.attempts, r.best_score));

        Ok(QuizResponse {
            quiz_id: quiz.id,
            metadata: QuizMetadata {
                filename: quiz.filename,
                created_at: quiz.created_at,
                num_questions: quiz.num_questions,
            },
            questions: quiz.questions,
            attempts,
            best_score,
        })
    }

    /// Catalogue of stored quizzes, newest first.
    pub async fn list_quizzes(&self, query: &QuizListQuery) -> Result<QuizListResponse> {
        let window = PageWindow::resolve(query.limit, query.page);
        let (data, total) = self.store.list_quizzes(window.limit, window.offset).await?;
        Ok(QuizListResponse {
            data,
            pagination: window.pagination(total),
        })
    }
}

pub fn validate_upload(filename: &str, size: usize) -> Result<()> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(Error::BadRequest("File must be a PDF".into()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(Error::BadRequest(format!(
            "File exceeds the maximum size of {} MiB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Checks the generator's output question by question. Any malformed entry
/// rejects the whole batch; surplus questions are dropped.
pub fn validate_generated(mut questions: Vec<Question>, requested: usize) -> Result<Vec<Question>> {
    if questions.len() < requested {
        return Err(Error::Generation(format!(
            "Expected {} questions, generator returned {}",
            requested,
            questions.len()
        )));
    }
    questions.truncate(requested);

    for (idx, q) in questions.iter().enumerate() {
        if q.question.trim().is_empty() {
            return Err(Error::Generation(format!("Question {} has no prompt", idx + 1)));
        }
        if q.options.len() != OPTIONS_PER_QUESTION {
            return Err(Error::Generation(format!(
                "Question {} has {} options, expected {}",
                idx + 1,
                q.options.len(),
                OPTIONS_PER_QUESTION
            )));
        }
        let distinct: HashSet<&str> = q.options.iter().map(|o| o.trim()).collect();
        if distinct.len() != OPTIONS_PER_QUESTION {
            return Err(Error::Generation(format!(
                "Question {} repeats an option",
                idx + 1
            )));
        }
        if !q.has_correct_option() {
            return Err(Error::Generation(format!(
                "Question {} has a correct answer that is not among its options",
                idx + 1
            )));
        }
    }

    Ok(questions)
}
