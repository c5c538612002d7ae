//! Usage metering middleware

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use mend_tenant::Principal;
use std::sync::Arc;

/// Current tier id
pub const TIER_HEADER: &str = "x-tier";
/// Requests used this period, including the current one
pub const USED_HEADER: &str = "x-requests-used";
/// Configured request limit; literal `-1` means unlimited
pub const LIMIT_HEADER: &str = "x-requests-limit";

/// Meter the authenticated principal's request and attach usage metadata to
/// the outbound response.
///
/// Routes without a resolved principal pass through unmetered;
/// unauthenticated routes are not metered.
pub async fn meter_usage(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let decision = match request.extensions().get::<Principal>() {
        Some(principal) => Some(state.meter.admit(principal)?),
        None => None,
    };

    let mut response = next.run(request).await;

    if let Some(decision) = decision {
        let headers = response.headers_mut();
        insert(headers, TIER_HEADER, &decision.tier);
        insert(headers, USED_HEADER, &decision.used.to_string());
        insert(headers, LIMIT_HEADER, &decision.limit.to_string());
    }

    Ok(response)
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}
