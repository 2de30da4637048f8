use axum::{
    body::Body,
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{
    api::AppState,
    error::{InternalErrorDetail, INTERNAL_ERROR_MESSAGE},
};

/// Exposes internal error detail in development mode.
///
/// Production responses keep the generic body produced by `AppError`; the
/// detail extension is dropped either way so it never travels further.
pub async fn error_detail_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(InternalErrorDetail(detail)) =
        response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };

    if !state.environment.is_development() {
        return response;
    }

    let body = json!({ "error": INTERNAL_ERROR_MESSAGE, "detail": detail });
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(body.to_string()))
}
