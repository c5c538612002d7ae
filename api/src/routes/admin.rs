//! Operator endpoints
//!
//! Admin-only: the auth gate resolves the principal, the handlers enforce
//! the role.

use crate::error::ApiError;
use crate::models::AdminStats;
use crate::AppState;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use mend_alerts::{AlertEvent, Severity};
use mend_common::GateError;
use mend_tenant::Principal;
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_ALERT_LIMIT: usize = 50;

/// Query parameters for the alert listing
#[derive(Debug, Deserialize)]
pub struct AlertParams {
    /// Only alerts of this severity
    pub severity: Option<Severity>,
    /// Most recent N alerts
    pub limit: Option<usize>,
}

fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(GateError::Forbidden.into())
    }
}

/// `GET /api/v1/admin/alerts` — recent alerts, newest first
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<AlertParams>,
) -> Result<Json<Vec<AlertEvent>>, ApiError> {
    require_admin(&principal)?;

    let limit = params.limit.unwrap_or(DEFAULT_ALERT_LIMIT);
    let alerts = match params.severity {
        Some(severity) => state
            .alerts
            .by_severity(severity)
            .into_iter()
            .take(limit)
            .collect(),
        None => state.alerts.recent(limit),
    };

    Ok(Json(alerts))
}

/// `GET /api/v1/admin/stats` — platform snapshot
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AdminStats>, ApiError> {
    require_admin(&principal)?;

    Ok(Json(AdminStats {
        principals: state.store.count(),
        alerts: state.alerts.history_len(),
    }))
}
