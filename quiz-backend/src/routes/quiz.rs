use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::dto::quiz_dto::{
    GenerateQuestionsQuery, GenerateQuestionsResponse, GetQuizQuery, QuizListQuery,
    QuizListResponse, QuizResponse, SubmitAnswersRequest, SubmitAnswersResponse,
};
use crate::error::{Error, Result};
use crate::services::grading_service::GradingService;
use crate::services::quiz_service::{validate_upload, GenerateQuizInput};
use crate::AppState;

/// Accepts the document as multipart field `file`. `num_questions` and
/// `wallet_address` come from the query string; form fields of the same name
/// take precedence when present.
#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuestionsQuery>,
    mut multipart: Multipart,
) -> Result<Json<GenerateQuestionsResponse>> {
    let mut num_questions = query.num_questions;
    let mut wallet_address = query.wallet_address;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to get next field: {}", e);
        Error::BadRequest(e.to_string())
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                // Reject by name before buffering the body.
                validate_upload(&filename, 0)?;
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read upload bytes: {}", e);
                    Error::BadRequest("Failed to read file upload".into())
                })?;
                upload = Some((filename, data));
            }
            "num_questions" => {
                let raw = field.text().await.map_err(Error::Multipart)?;
                num_questions = raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::BadRequest(format!("Invalid num_questions: {}", raw)))?;
            }
            "wallet_address" => {
                wallet_address = Some(field.text().await.map_err(Error::Multipart)?);
            }
            _ => {}
        }
    }

    let (filename, data) = upload.ok_or_else(|| Error::BadRequest("PDF file is required".into()))?;

    let response = state
        .quiz_service
        .generate_quiz(GenerateQuizInput {
            filename,
            data,
            num_questions,
            wallet_address,
        })
        .await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
    Query(query): Query<GetQuizQuery>,
) -> Result<Json<QuizResponse>> {
    let quiz = state
        .quiz_service
        .get_quiz(&quiz_id, query.wallet_address.as_deref())
        .await?;
    Ok(Json(quiz))
}

#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<QuizListQuery>,
) -> Result<Json<QuizListResponse>> {
    let quizzes = state.quiz_service.list_quizzes(&query).await?;
    Ok(Json(quizzes))
}

#[axum::debug_handler]
pub async fn submit_answers(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
    Json(req): Json<SubmitAnswersRequest>,
) -> Result<Json<SubmitAnswersResponse>> {
    req.validate()?;
    let quiz = state.quiz_service.load_quiz(&quiz_id).await?;
    let (score, answers) = GradingService::grade(&quiz.questions, &req.answers);

    let best_score = match req.wallet_address.as_deref() {
        Some(wallet) => Some(
            state
                .attempt_service
                .update_best_score(wallet, &quiz.id.to_string(), score)
                .await?
                .best_score,
        ),
        None => None,
    };

    tracing::info!(quiz_id = %quiz.id, score, total = quiz.questions.len(), "Answers graded");

    Ok(Json(SubmitAnswersResponse {
        quiz_id: quiz.id,
        score,
        total: quiz.questions.len(),
        answers,
        best_score,
    }))
}
