use axum::extract::{Path, State};

use crate::api::ApiJson;
use crate::database::models::{NewTeamMember, TeamMember, TeamMemberPatch};
use crate::handlers::public::catalog::load_team;
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::state::AppState;

/// GET /api/admin/team
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    Ok(ApiResponse::success(load_team(&state).await?))
}

/// GET /api/admin/team/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<TeamMember> {
    Ok(ApiResponse::success(state.repository::<TeamMember>().select_404(&id).await?))
}

/// POST /api/admin/team
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewTeamMember>,
) -> ApiResult<TeamMember> {
    let member = TeamMember::create(payload)?;
    state.repository::<TeamMember>().insert(&member).await?;

    tracing::info!("Team member {} created", member.id);
    Ok(ApiResponse::created(member))
}

/// PUT /api/admin/team/:id - merge the provided fields
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TeamMemberPatch>,
) -> ApiResult<TeamMember> {
    let repo = state.repository::<TeamMember>();
    let mut member = repo.select_404(&id).await?;
    member.apply(patch)?;
    repo.update(&member).await?;

    tracing::info!("Team member {} updated", id);
    Ok(ApiResponse::success(member))
}

/// DELETE /api/admin/team/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Deleted> {
    state.repository::<TeamMember>().delete(&id).await?;

    tracing::info!("Team member {} deleted", id);
    Ok(ApiResponse::deleted(id))
}
