use axum::extract::State;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Identifiers a browser needs for an unsigned direct upload to the image host
#[derive(Debug, Serialize)]
pub struct UploadConfig {
    pub enabled: bool,
    pub cloud_name: Option<String>,
    pub folder: Option<String>,
    pub upload_preset: Option<String>,
}

/// GET /api/uploads/config
pub async fn upload_config(State(state): State<AppState>) -> ApiResult<UploadConfig> {
    let media = &state.config.media;

    Ok(ApiResponse::success(UploadConfig {
        enabled: media.cloud_name.is_some() && media.upload_preset.is_some(),
        cloud_name: media.cloud_name.clone(),
        folder: media.upload_folder.clone(),
        upload_preset: media.upload_preset.clone(),
    }))
}
