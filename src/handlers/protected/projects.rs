use axum::extract::{Path, Query, State};

use crate::api::ApiJson;
use crate::database::models::{NewProject, Project, ProjectPatch};
use crate::handlers::public::catalog::ProjectQuery;
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::state::AppState;

/// GET /api/admin/projects - same filters as the public listing
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Vec<Project>> {
    let projects = state.repository::<Project>().select_any(&query.to_filter()).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/admin/projects/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Project> {
    Ok(ApiResponse::success(state.repository::<Project>().select_404(&id).await?))
}

/// POST /api/admin/projects
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewProject>,
) -> ApiResult<Project> {
    let project = Project::create(payload)?;
    state.repository::<Project>().insert(&project).await?;

    tracing::info!("Project {} created", project.id);
    Ok(ApiResponse::created(project))
}

/// PUT /api/admin/projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> ApiResult<Project> {
    let repo = state.repository::<Project>();
    let mut project = repo.select_404(&id).await?;
    project.apply(patch)?;
    repo.update(&project).await?;

    tracing::info!("Project {} updated", id);
    Ok(ApiResponse::success(project))
}

/// DELETE /api/admin/projects/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    state.repository::<Project>().delete(&id).await?;

    tracing::info!("Project {} deleted", id);
    Ok(ApiResponse::deleted(id))
}
