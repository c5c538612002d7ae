//! Request middleware

pub mod auth;
pub mod metering;

use crate::error::InternalErrorMessage;
use crate::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// Outermost catch-all: any 500 that leaves the gateway is reported to the
/// alert engine's error signal path. The engine itself never raises
/// request-visible errors, so this cannot fail the request further.
pub async fn track_errors(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status().is_server_error() {
        let message = response
            .extensions()
            .get::<InternalErrorMessage>()
            .map(|m| m.0.clone())
            .unwrap_or_else(|| "unhandled internal error".to_string());
        state.signals.observe_error(&message);
    }

    response
}
