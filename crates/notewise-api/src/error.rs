//! API error mapping.
//!
//! Every error body is a JSON object with an `error` string, plus `details`
//! for server-side failures.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value as JsonValue};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Caller error; the message is returned as-is.
    BadRequest(String),
    /// The retrieval engine failed; `details` is its diagnostic payload.
    Retrieval(JsonValue),
    /// Any other failure.
    Internal(String),
    /// The request body could not be read (e.g. too large).
    Rejected { status: StatusCode, message: String },
    /// No route for this path.
    NotFound,
    /// The route exists but not for this method.
    MethodNotAllowed,
}

impl ApiError {
    pub fn invalid_json() -> Self {
        ApiError::BadRequest("Invalid JSON body".to_string())
    }
}

impl From<notewise_core::Error> for ApiError {
    fn from(err: notewise_core::Error) -> Self {
        match err {
            notewise_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            notewise_core::Error::Retrieval { message, details } => {
                error!(error = %message, details = %details, "Retrieval failed");
                ApiError::Retrieval(details)
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Retrieval(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "RPC error", "details": details }),
            ),
            ApiError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal error", "details": details }),
            ),
            ApiError::Rejected { status, message } => (status, json!({ "error": message })),
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
