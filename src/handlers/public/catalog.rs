use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::database::models::{Project, ProjectStatus, TeamMember};
use crate::database::{DatabaseError, DocumentFilter};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    /// Matches projects tagged with this category
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl ProjectQuery {
    pub fn to_filter(&self) -> DocumentFilter {
        let mut filter = DocumentFilter::new();
        if let Some(status) = self.status {
            filter = filter.eq("status", status.as_str());
        }
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            filter = filter.contains("categories", category.to_lowercase());
        }
        if let Some(featured) = self.featured {
            filter = filter.eq("featured", featured);
        }
        filter
    }
}

/// Team members in display order
pub async fn load_team(state: &AppState) -> Result<Vec<TeamMember>, DatabaseError> {
    let mut members = state
        .repository::<TeamMember>()
        .select_any(&DocumentFilter::new())
        .await?;
    members.sort_by_key(|m| m.order);
    Ok(members)
}

/// GET /api/team - team members ordered for the about page
pub async fn team_list(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    Ok(ApiResponse::success(load_team(&state).await?))
}

/// GET /api/projects - portfolio, newest first
pub async fn project_list(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Vec<Project>> {
    let projects = state.repository::<Project>().select_any(&query.to_filter()).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/projects/:id
pub async fn project_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Project> {
    let project = state.repository::<Project>().select_404(&id).await?;
    Ok(ApiResponse::success(project))
}
