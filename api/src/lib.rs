//! CodeMend Platform API
//!
//! Request-gating layer for the CodeMend multi-tenant API: every metered
//! call passes the auth gate, then the usage meter, before reaching a
//! handler. Alerting runs on a separate signal path fed by the catch-all
//! error handler.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        API GATEWAY                             │
//! │                                                                │
//! │  public      /health /register /login /pricing                 │
//! │                                                                │
//! │  auth gate   /me ───────────────────────────┐                  │
//! │                                             │                  │
//! │  + meter     /api/v1/analyze /api/v1/fix    │ 401/402/429      │
//! │                                             │                  │
//! │  + admin     /api/v1/admin/*                │ 403              │
//! │                                             ▼                  │
//! │  errors ──▶ 500 ──▶ alert engine (error signal path)           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use mend_alerts::{AlertEngine, SignalDispatcher};
use mend_tenant::{
    Authenticator, InMemoryPrincipalStore, PrincipalStore, TierCatalog, UsageMeter,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared gateway state
pub struct AppState {
    /// Registered principals
    pub store: Arc<dyn PrincipalStore>,
    /// Canonical tier catalog
    pub catalog: Arc<TierCatalog>,
    /// Auth gate
    pub auth: Authenticator,
    /// Usage meter
    pub meter: UsageMeter,
    /// Alert engine (separate signal path, never on the request path)
    pub alerts: Arc<AlertEngine>,
    /// Dispatcher feeding the alert engine
    pub signals: SignalDispatcher,
}

impl AppState {
    /// Wire up the gate over fresh in-memory backings
    pub fn new() -> Self {
        let store: Arc<dyn PrincipalStore> = Arc::new(InMemoryPrincipalStore::new());
        let catalog = Arc::new(TierCatalog::new());
        let auth = Authenticator::from_env(store.clone());
        let meter = UsageMeter::new(store.clone(), catalog.clone());
        let alerts = Arc::new(AlertEngine::new());
        let signals = SignalDispatcher::new(alerts.clone());

        Self {
            store,
            catalog,
            auth,
            meter,
            alerts,
            signals,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the API router
pub fn build_router(state: Arc<AppState>) -> Router {
    // metered business endpoints: auth gate + usage meter
    let metered = Router::new()
        .route("/analyze", post(routes::analysis::analyze))
        .route("/fix", post(routes::analysis::fix))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metering::meter_usage,
        ));

    // admin endpoints: auth gate + role check in the handlers
    let admin = Router::new()
        .route("/admin/alerts", get(routes::admin::list_alerts))
        .route("/admin/stats", get(routes::admin::stats));

    let protected = Router::new()
        .route("/me", get(routes::auth::me))
        .nest("/api/v1", metered.merge(admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/pricing", get(routes::pricing::list_tiers))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::track_errors,
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
