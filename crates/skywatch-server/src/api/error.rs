//! Error type shared by every handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skywatch_upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter {name}: {value:?}")]
    InvalidParameter { name: &'static str, value: String },
    #[error("API key not configured")]
    MissingCredential,
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Self::MissingCredential | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound(message) => json!({ "message": message }),
            Self::Upstream(err) => {
                tracing::error!("Upstream call failed: {}", err);
                json!({ "error": err.to_string() })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
