use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::dto::user_quiz_dto::{
    AttemptStatusResponse, ScoreResponse, UpdateScoreRequest, UserQuizRequest,
};
use crate::error::Result;
use crate::services::attempt_service::AttemptCheck;
use crate::AppState;

fn check_response(check: AttemptCheck) -> Response {
    match check {
        AttemptCheck::Known(status) => (StatusCode::OK, Json(status)).into_response(),
        AttemptCheck::UnknownQuiz => {
            (StatusCode::NOT_FOUND, Json(AttemptStatusResponse::unknown_quiz())).into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_user_quiz(
    State(state): State<AppState>,
    Json(req): Json<UserQuizRequest>,
) -> Result<Response> {
    req.validate()?;
    let check = state
        .attempt_service
        .check_or_create(&req.wallet_address, &req.quiz_id)
        .await;
    Ok(check_response(check))
}

#[axum::debug_handler]
pub async fn get_attempts(
    State(state): State<AppState>,
    Path((wallet_address, quiz_id)): Path<(String, String)>,
) -> Response {
    check_response(state.attempt_service.attempts(&wallet_address, &quiz_id).await)
}

#[axum::debug_handler]
pub async fn increment_attempts(
    State(state): State<AppState>,
    Json(req): Json<UserQuizRequest>,
) -> Result<Response> {
    req.validate()?;
    let check = state
        .attempt_service
        .increment(&req.wallet_address, &req.quiz_id)
        .await?;
    Ok(check_response(check))
}

#[axum::debug_handler]
pub async fn update_score(
    State(state): State<AppState>,
    Json(req): Json<UpdateScoreRequest>,
) -> Result<Json<ScoreResponse>> {
    req.validate()?;
    let score = state
        .attempt_service
        .update_best_score(&req.wallet_address, &req.quiz_id, req.score)
        .await?;
    Ok(Json(score))
}
