use axum::{extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::api::ApiJson;
use crate::database::models::{ClientRequest, ReplySender, ValidationError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const SECRET_HEADER: &str = "x-webhook-secret";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InboundReply {
    pub request_id: String,
    pub message: String,
}

/// POST /api/webhooks/inbound-reply - a client answered one of our emails
pub async fn inbound_reply(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<InboundReply>,
) -> ApiResult<ClientRequest> {
    let Some(expected) = state.config.security.webhook_secret.as_deref() else {
        return Err(ApiError::service_unavailable("Inbound replies are not configured"));
    };

    let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    if provided.map(str::as_bytes) != Some(expected.as_bytes()) {
        tracing::warn!("Rejected inbound reply with a bad secret");
        return Err(ApiError::unauthorized("Invalid webhook secret"));
    }

    if payload.request_id.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField("request_id".to_string()).into());
    }
    if payload.message.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField("message".to_string()).into());
    }

    let repo = state.repository::<ClientRequest>();
    let mut request = repo.select_404(payload.request_id.trim()).await?;
    request.add_reply(ReplySender::Client, payload.message);
    repo.update(&request).await?;

    tracing::info!("Client reply appended to request {}", request.id);
    Ok(ApiResponse::success(request))
}
