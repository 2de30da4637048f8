use axum::{extract::State, Extension, Json};

use crate::{
    api::{AppJson, AppState, AuthenticatedUser},
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        watchlist_count = request.watchlist.len(),
        "Processing recommendation request"
    );

    let recommendations = state.recommendations.recommend(&request.watchlist).await?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}
