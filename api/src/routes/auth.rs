//! Registration, login, and account endpoints

use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use mend_common::GateError;
use mend_tenant::identity::{generate_api_key, hash_password};
use mend_tenant::{Principal, TierCatalog};
use std::sync::Arc;

/// `POST /register`
///
/// 201 with the one-time API key; 409 if the email is taken; 402 if an
/// unknown tier id is supplied.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let tier = input
        .tier
        .unwrap_or_else(|| TierCatalog::default_tier().to_string());

    if !state.catalog.contains(&tier) {
        return Err(GateError::InvalidSubscription(tier).into());
    }

    let principal = Principal::new(
        &input.email,
        &hash_password(&input.password),
        input.company,
        &tier,
        &generate_api_key(),
    );

    let response = RegisterResponse {
        user_id: principal.id,
        api_key: principal.api_key.clone(),
        tier: principal.tier.clone(),
    };
    state.store.insert(principal)?;

    tracing::info!(user_id = %response.user_id, tier = %response.tier, "principal registered");
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /login`
///
/// Issues a 24-hour session credential; 401 on unmatched credentials.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (token, principal) = state.auth.login(&input.email, &input.password)?;

    Ok(Json(LoginResponse {
        token,
        user: principal.into(),
    }))
}

/// `GET /me`
///
/// Requires the auth gate; reports live usage counters and the full tier
/// definition. Not metered.
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<MeResponse>, ApiError> {
    // re-read so the counters reflect requests admitted after auth
    let principal = state
        .store
        .get(&principal.id)
        .unwrap_or(principal);

    let tier = state
        .catalog
        .get(&principal.tier)
        .cloned()
        .ok_or_else(|| GateError::InvalidSubscription(principal.tier.clone()))?;

    Ok(Json(MeResponse {
        user: principal.into(),
        tier,
    }))
}
