use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::api::AppState;

pub mod recommendations;
pub mod watchlist;

/// API routes under /api
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/watchlist", get(watchlist::list).post(watchlist::add))
        .route("/watchlist/:id", put(watchlist::update).delete(watchlist::remove))
        .route("/recommendations", post(recommendations::recommend))
}

/// API index
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Movie Watchlist API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "watchlist": {
                "getAll": "GET /api/watchlist (protected)",
                "add": "POST /api/watchlist (protected)",
                "update": "PUT /api/watchlist/:id (protected)",
                "delete": "DELETE /api/watchlist/:id (protected)",
            },
            "recommendations": {
                "getRecommendations": "POST /api/recommendations (protected)",
            },
            "health": "GET /api/health",
        },
        "documentation": "Protected routes require the x-user-id header set by the gateway",
    }))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "message": "Server is running", "status": "OK" })),
    )
}

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}
