//! API error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::SearchError;

/// Errors a handler can return to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent an unusable request.
    #[error("{0}")]
    Validation(String),

    /// No response could be built; `context` carries the diagnostic.
    #[error("{message}: {context}")]
    Internal { message: String, context: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingParameters => ApiError::Validation(err.to_string()),
            other => ApiError::Internal {
                message: "Failed to fetch flights".to_string(),
                context: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(error) => json!({ "error": error }),
            ApiError::Internal { message, context } => {
                tracing::error!(error = %message, context = %context, "Search failed");
                json!({ "error": message, "context": context })
            }
        };
        (status, Json(body)).into_response()
    }
}
