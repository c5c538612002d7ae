//! Public pricing endpoint

use crate::AppState;
use axum::extract::State;
use axum::Json;
use mend_tenant::TierDefinition;
use std::sync::Arc;

/// `GET /pricing` — the full canonical tier catalog, cheapest first
pub async fn list_tiers(State(state): State<Arc<AppState>>) -> Json<Vec<TierDefinition>> {
    Json(state.catalog.list().into_iter().cloned().collect())
}
