use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// Success body shared by every JSON endpoint: `{"success": true, "data": ...}`.
/// Errors use the `ApiError` envelope instead.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status: StatusCode,
    /// `Set-Cookie` value sent alongside the body (login and logout)
    pub cookie: Option<String>,
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    success: bool,
    data: &'a T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
            cookie: None,
        }
    }

    /// 201 for freshly stored records
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.cookie = Some(cookie);
        self
    }
}

/// Body of a successful delete
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
    /// Form deletes also report the submissions removed with the form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_submissions: Option<u64>,
}

impl ApiResponse<Deleted> {
    pub fn deleted(id: impl Into<String>) -> Self {
        Self::success(Deleted {
            id: id.into(),
            deleted: true,
            deleted_submissions: None,
        })
    }

    pub fn with_submissions(mut self, removed: u64) -> Self {
        self.data.deleted_submissions = Some(removed);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_value(Envelope { success: true, data: &self.data }) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error("Failed to serialize response data").into_response();
            }
        };

        let mut response = (self.status, Json(body)).into_response();
        if let Some(cookie) = self.cookie {
            match cookie.parse::<HeaderValue>() {
                Ok(value) => {
                    response.headers_mut().insert(header::SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::error!("Dropping unencodable session cookie: {}", e);
                    return ApiError::internal_server_error("Failed to set session cookie").into_response();
                }
            }
        }
        response
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
