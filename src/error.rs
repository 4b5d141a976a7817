use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by the HTTP handlers.
///
/// Every variant renders as `{"error": "<message>"}`; the message is the
/// bare text so clients can show it directly.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or empty required field
    #[error("{0}")]
    Validation(String),

    /// The model client could not be constructed (e.g. missing API key)
    #[error("{0}")]
    Configuration(String),

    /// The model API call failed
    #[error("{0}")]
    Upstream(String),

    /// The request body could not be read (e.g. over the size limit)
    #[error("{message}")]
    Body { status: StatusCode, message: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Body { status, .. } => *status,
            Self::Configuration(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey | LlmError::Client(_) => Self::Configuration(err.to_string()),
            _ => Self::Upstream(err.to_string()),
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut message = self.to_string();
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string();
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
