use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::gpx::WriteError;

pub enum ApiError {
    NoRouteData,
    BadUpload(String),
    Render(WriteError),
}

impl From<WriteError> for ApiError {
    fn from(e: WriteError) -> Self {
        ApiError::Render(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NoRouteData => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "no_route_data",
                    "the uploaded document contains no usable route points",
                )),
            )
                .into_response(),
            ApiError::BadUpload(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("bad_upload", &msg)),
            )
                .into_response(),
            ApiError::Render(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("render_error", &e.to_string())),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
