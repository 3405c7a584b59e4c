use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ApiJson;
use crate::auth::{self, ADMIN_ROLE};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login - exchange the admin credentials for a session cookie
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Value> {
    let security = &state.config.security;

    if !auth::credentials_match(security, &payload.email, &payload.password) {
        tracing::warn!("Rejected admin login for '{}'", payload.email);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = auth::generate_jwt(security, &payload.email)?;
    tracing::info!("Admin '{}' logged in", payload.email);

    Ok(ApiResponse::success(json!({
        "email": payload.email,
        "role": ADMIN_ROLE,
        "expires_in": security.session_ttl_secs,
    }))
    .with_cookie(auth::session_cookie(security, &token)))
}

/// POST /api/auth/logout - expire the session cookie
pub async fn logout(State(state): State<AppState>) -> ApiResponse<Value> {
    let cookie = auth::clear_session_cookie(&state.config.security);
    ApiResponse::success(json!({ "logged_out": true })).with_cookie(cookie)
}
