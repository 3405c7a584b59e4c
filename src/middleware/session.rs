use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{self, AdminSession};
use crate::error::ApiError;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

/// Session guard for admin pages: anything without a valid session cookie
/// is redirected to the login page
pub async fn require_admin_page(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(reason) => {
            tracing::debug!("Redirecting {} to login: {}", request.uri().path(), reason);
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

/// Same check for the admin JSON API, answering 401 instead of redirecting
pub async fn require_admin_api(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = authenticate(&state, request.headers()).map_err(|reason| {
        tracing::debug!("Rejecting {}: {}", request.uri().path(), reason);
        ApiError::unauthorized("Admin session required")
    })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AdminSession, String> {
    let security = &state.config.security;

    let token = auth::read_cookie(headers, &security.session_cookie)
        .ok_or_else(|| "missing session cookie".to_string())?;

    let claims = auth::validate_jwt(security, &token).map_err(|e| e.to_string())?;

    Ok(AdminSession::from(claims))
}
