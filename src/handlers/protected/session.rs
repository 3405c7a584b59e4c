use axum::Extension;

use crate::auth::AdminSession;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/admin/session - who is logged in and until when
pub async fn current(Extension(session): Extension<AdminSession>) -> ApiResult<AdminSession> {
    Ok(ApiResponse::success(session))
}
