use crate::domain::pipeline::{PipelineError, Stage};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// A pipeline run failed. The message is fixed; the stage says where.
    #[error("Video creation failed")]
    Generation { stage: Stage, cause: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure: message, plus the failed stage for generation errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Generation { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let stage = match self {
            Self::Generation { stage, .. } => Some(stage.to_string()),
            _ => None,
        };

        ErrorResponse {
            message: self.to_string(),
            stage,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Generation {
            stage: err.stage(),
            cause: err.to_string(),
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Generation { stage, cause } => tracing::error!(
                stage = %stage,
                cause = %cause,
                status = %status.as_u16(),
                "Request failed"
            ),
            _ => tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            ),
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
