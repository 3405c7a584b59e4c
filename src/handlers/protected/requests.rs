use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::api::ApiJson;
use crate::database::models::{
    ClientRequest, ClientRequestPatch, NewClientRequest, ReplySender, RequestStatus, RequestType, ValidationError,
};
use crate::database::DocumentFilter;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub form_id: Option<String>,
}

impl RequestQuery {
    pub fn to_filter(&self) -> DocumentFilter {
        let mut filter = DocumentFilter::new();
        if let Some(status) = self.status {
            filter = filter.eq("status", status.as_str());
        }
        if let Some(kind) = self.request_type {
            filter = filter.eq("type", kind.as_str());
        }
        if let Some(form_id) = self.form_id.as_deref().filter(|id| !id.is_empty()) {
            filter = filter.eq("form_id", form_id);
        }
        filter
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplyRequest {
    pub message: String,
}

/// GET /api/admin/requests - inbox, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RequestQuery>,
) -> ApiResult<Vec<ClientRequest>> {
    let requests = state.repository::<ClientRequest>().select_any(&query.to_filter()).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /api/admin/requests/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ClientRequest> {
    Ok(ApiResponse::success(state.repository::<ClientRequest>().select_404(&id).await?))
}

/// POST /api/admin/requests - log a request received outside the site
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewClientRequest>,
) -> ApiResult<ClientRequest> {
    let request = ClientRequest::create(payload)?;
    state.repository::<ClientRequest>().insert(&request).await?;

    tracing::info!("Client request {} created by admin", request.id);
    Ok(ApiResponse::created(request))
}

/// PUT /api/admin/requests/:id - status changes and edits. A `replies` array
/// replaces the stored thread.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ClientRequestPatch>,
) -> ApiResult<ClientRequest> {
    let repo = state.repository::<ClientRequest>();
    let mut request = repo.select_404(&id).await?;
    request.apply(patch)?;
    repo.update(&request).await?;

    tracing::info!("Client request {} updated (status {})", id, request.status.as_str());
    Ok(ApiResponse::success(request))
}

/// DELETE /api/admin/requests/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    state.repository::<ClientRequest>().delete(&id).await?;

    tracing::info!("Client request {} deleted", id);
    Ok(ApiResponse::deleted(id))
}

/// POST /api/admin/requests/:id/reply - email the requester, then record the reply
pub async fn reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ReplyRequest>,
) -> ApiResult<ClientRequest> {
    let request = send_reply(&state, &id, &payload.message).await?;
    Ok(ApiResponse::success(request))
}

/// Nothing is persisted unless the relay accepted the email
pub async fn send_reply(
    state: &AppState,
    id: &str,
    message: &str,
) -> Result<ClientRequest, ApiError> {
    if message.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField("message".to_string()).into());
    }

    let repo = state.repository::<ClientRequest>();
    let mut request = repo.select_404(id).await?;

    state.notifier.send_reply(&request, message).await?;

    request.add_reply(ReplySender::Admin, message);
    repo.update(&request).await?;

    tracing::info!("Admin reply recorded on request {}", id);
    Ok(request)
}
