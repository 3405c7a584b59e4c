use axum::extract::{Path, State};

use crate::api::ApiJson;
use crate::database::models::{ClientRequest, Form, FormPatch, NewForm};
use crate::database::DocumentFilter;
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::state::AppState;

/// GET /api/admin/forms - every form, active or not
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Form>> {
    let forms = state.repository::<Form>().select_any(&DocumentFilter::new()).await?;
    Ok(ApiResponse::success(forms))
}

/// GET /api/admin/forms/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Form> {
    Ok(ApiResponse::success(state.repository::<Form>().select_404(&id).await?))
}

/// POST /api/admin/forms
pub async fn create(State(state): State<AppState>, ApiJson(payload): ApiJson<NewForm>) -> ApiResult<Form> {
    let form = Form::create(payload)?;
    state.repository::<Form>().insert(&form).await?;

    tracing::info!("Form {} created with {} fields", form.id, form.fields.len());
    Ok(ApiResponse::created(form))
}

/// PUT /api/admin/forms/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<FormPatch>,
) -> ApiResult<Form> {
    let repo = state.repository::<Form>();
    let mut form = repo.select_404(&id).await?;
    form.apply(patch)?;
    repo.update(&form).await?;

    tracing::info!("Form {} updated", id);
    Ok(ApiResponse::success(form))
}

/// DELETE /api/admin/forms/:id - removes the form and all of its submissions
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    let forms = state.repository::<Form>();
    forms.select_404(&id).await?;

    let removed = state
        .repository::<ClientRequest>()
        .delete_where(&submissions_of(&id))
        .await?;
    forms.delete(&id).await?;

    tracing::info!("Form {} deleted along with {} submissions", id, removed);
    Ok(ApiResponse::deleted(id).with_submissions(removed))
}

/// GET /api/admin/forms/:id/submissions
pub async fn submissions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ClientRequest>> {
    state.repository::<Form>().select_404(&id).await?;
    let requests = state
        .repository::<ClientRequest>()
        .select_any(&submissions_of(&id))
        .await?;
    Ok(ApiResponse::success(requests))
}

fn submissions_of(form_id: &str) -> DocumentFilter {
    DocumentFilter::new().eq("form_id", form_id)
}
