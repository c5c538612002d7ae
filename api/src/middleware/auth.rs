//! Authentication middleware

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// Header carrying the long-lived opaque credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Resolve the request's credentials to a principal and attach it to the
/// request context. Rejects with 401 before any handler runs; never
/// mutates principal state.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let principal = state.auth.resolve(api_key, bearer)?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
