// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{
    clients::{extractor::ExtractionError, llm_client::CompletionError},
    storage::StorageError,
};

/// Message returned whenever an LLM-backed endpoint runs without a credential.
pub const MISSING_API_KEY_MESSAGE: &str = "OpenAI API key is not configured";

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// 400: required input missing or blank, or an unreadable request body.
    #[error("{0}")]
    Validation(String),

    /// 500: the operator has not configured an API credential.
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    Configuration,

    /// 500: the model replied with something that doesn't fit the expected shape.
    #[error("{0}")]
    UpstreamParse(String),

    /// The upstream service reported a failure; its status is passed through.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// 400: an uploaded document couldn't be turned into text.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Extraction(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Configuration
            | AppError::UpstreamParse(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a completion failure that isn't a parse problem.
    pub fn from_completion(err: CompletionError, failure_message: &str) -> Self {
        match err {
            CompletionError::EmptyReply => AppError::UpstreamParse(failure_message.to_string()),
            CompletionError::Api { status, message } => AppError::Upstream {
                status: status.unwrap_or(500),
                message: format!("OpenAI API error: {}", message),
            },
            CompletionError::Request(msg) => {
                tracing::error!("Failed to build completion request: {}", msg);
                AppError::UpstreamParse(failure_message.to_string())
            }
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
