use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::{AppJson, AppPath, AppState, AuthenticatedUser},
    error::AppResult,
    models::{NewWatchlistItem, WatchlistItem, WatchlistPatch},
    services::watchlist,
};

/// GET /api/watchlist
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    let items = watchlist::list_items(state.store.as_ref(), user_id).await?;
    Ok(Json(items))
}

/// POST /api/watchlist
pub async fn add(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppJson(request): AppJson<NewWatchlistItem>,
) -> AppResult<(StatusCode, Json<WatchlistItem>)> {
    let item = watchlist::add_item(state.store.as_ref(), user_id, request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/watchlist/:id
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<WatchlistPatch>,
) -> AppResult<Json<WatchlistItem>> {
    let item = watchlist::update_item(state.store.as_ref(), user_id, id, patch).await?;
    Ok(Json(item))
}

/// DELETE /api/watchlist/:id
pub async fn remove(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    watchlist::delete_item(state.store.as_ref(), user_id, id).await?;
    Ok(Json(json!({ "message": "Movie removed", "id": id })))
}
