pub mod health;
pub mod leaderboard;
pub mod quiz;
pub mod user_quiz;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::quiz_service::MAX_UPLOAD_BYTES;
use crate::AppState;

/// Headroom over the document cap for multipart framing and form fields, so
/// an oversized document is reported as a 400 by the pipeline itself.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/", get(health::health))
        .route("/generate-questions/", post(quiz::generate_questions))
        .route("/quizzes/", get(quiz::list_quizzes))
        .route("/quiz/:quiz_id", get(quiz::get_quiz))
        .route("/get-quiz/:quiz_id", get(quiz::get_quiz))
        .route("/quiz/:quiz_id/submit", post(quiz::submit_answers))
        .route("/user-quiz/", post(user_quiz::create_user_quiz))
        .route(
            "/user-quiz/increment-attempts/",
            put(user_quiz::increment_attempts),
        )
        .route(
            "/user-quiz/attempts/:wallet_address/:quiz_id",
            get(user_quiz::get_attempts),
        )
        .route("/user-quiz/update-score/", put(user_quiz::update_score))
        .route("/leaderboard/", get(leaderboard::get_leaderboard))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}
