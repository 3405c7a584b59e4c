use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::ApiJson;
use crate::database::models::{ClientRequest, Form, NewClientRequest, RequestType};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionRequest {
    /// Answers keyed by field id
    pub answers: Map<String, Value>,
    pub name: String,
    pub email: String,
    pub attachments: Vec<String>,
}

/// Fetch a form that is open for submissions. Inactive forms look missing.
pub async fn load_active(state: &AppState, id: &str) -> Result<Form, DatabaseError> {
    let form = state.repository::<Form>().select_404(id).await?;
    if !form.is_active {
        return Err(DatabaseError::NotFound(format!("Form '{}' not found", id)));
    }
    Ok(form)
}

/// GET /api/forms/:id - public definition of an active form
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Form> {
    Ok(ApiResponse::success(load_active(&state, &id).await?))
}

/// POST /api/forms/:id/submit - store answers as a form submission
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SubmissionRequest>,
) -> ApiResult<ClientRequest> {
    let form = load_active(&state, &id).await?;
    let request = record_submission(&state, &form, payload).await?;
    Ok(ApiResponse::created(request))
}

/// Validate, persist and announce a submission
pub async fn record_submission(
    state: &AppState,
    form: &Form,
    payload: SubmissionRequest,
) -> Result<ClientRequest, ApiError> {
    form.validate_submission(&payload.answers)?;

    let name = non_blank(payload.name).or_else(|| form.requester_name(&payload.answers));
    let email = non_blank(payload.email).or_else(|| form.requester_email(&payload.answers));

    let request = ClientRequest::create(NewClientRequest {
        request_type: RequestType::FormSubmission,
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        subject: form.title.clone(),
        form_id: Some(form.id.clone()),
        submission: payload.answers,
        attachments: payload.attachments,
        ..Default::default()
    })?;

    state.repository::<ClientRequest>().insert(&request).await?;
    tracing::info!("Submission {} recorded for form {}", request.id, form.id);

    state.notifier.request_received(&request, Some(form)).await;

    Ok(request)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
