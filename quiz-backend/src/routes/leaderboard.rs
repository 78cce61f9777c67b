use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::leaderboard_dto::{LeaderboardQuery, LeaderboardResponse};
use crate::error::Result;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let page = state.leaderboard_service.page(&query).await?;
    Ok(Json(page))
}
