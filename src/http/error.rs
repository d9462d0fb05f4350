//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a handler reports to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("can't read request body")]
    BodyUnreadable(#[source] axum::Error),

    #[error("can't find stock with oid: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BodyUnreadable(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub http_status: u16,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BodyUnreadable(cause) => {
                tracing::error!(status = status.as_u16(), cause = %cause, "{}", self)
            }
            ApiError::NotFound(_) => tracing::error!(status = status.as_u16(), "{}", self),
        }

        let envelope = ErrorEnvelope {
            http_status: status.as_u16(),
            error: self.to_string(),
        };
        (status, Json(envelope)).into_response()
    }
}
