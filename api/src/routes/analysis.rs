//! Metered business endpoints
//!
//! The analysis/fix engine is not part of this core; these endpoints are
//! the metered surface in front of it and return placeholder payloads
//! until the engine ships.

use axum::Json;
use serde_json::{json, Value};

/// `POST /api/v1/analyze`
pub async fn analyze() -> Json<Value> {
    Json(json!({
        "status": "coming_soon",
        "message": "Automated code analysis is coming soon",
    }))
}

/// `POST /api/v1/fix`
pub async fn fix() -> Json<Value> {
    Json(json!({
        "status": "coming_soon",
        "message": "Automated code fixes are coming soon",
    }))
}
