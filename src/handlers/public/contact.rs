use axum::extract::State;
use serde::Deserialize;

use crate::api::ApiJson;
use crate::database::models::{ClientRequest, NewClientRequest, RequestType};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub attachments: Vec<String>,
}

/// POST /api/contact - record an inquiry and notify the studio.
///
/// Notifications are best-effort: the inquiry is stored and acknowledged
/// even when the mail relay is down.
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ContactRequest>,
) -> ApiResult<ClientRequest> {
    let request = ClientRequest::create(NewClientRequest {
        request_type: RequestType::Inquiry,
        name: payload.name,
        email: payload.email,
        subject: payload.subject,
        message: payload.message,
        attachments: payload.attachments,
        ..Default::default()
    })?;

    state.repository::<ClientRequest>().insert(&request).await?;
    tracing::info!("Inquiry {} received from {}", request.id, request.email);

    state.notifier.request_received(&request, None).await;

    Ok(ApiResponse::created(request))
}
