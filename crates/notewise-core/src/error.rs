//! Error types for notewise.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result type alias using notewise's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notewise operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedding provider returned a failure or an unusable payload
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Generative model provider returned a failure or an unusable payload
    #[error("Inference error: {0}")]
    Inference(String),

    /// Retrieval collaborator failed; `details` carries its diagnostic payload
    #[error("Retrieval error: {message}")]
    Retrieval { message: String, details: JsonValue },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a retrieval error from a plain message, using the message as details.
    pub fn retrieval(message: impl Into<String>) -> Self {
        let message = message.into();
        Error::Retrieval {
            details: JsonValue::String(message.clone()),
            message,
        }
    }

    /// Re-tag any error raised by a retrieval backend as a retrieval error.
    ///
    /// Errors that already are `Retrieval` keep their diagnostic payload.
    pub fn into_retrieval(self) -> Self {
        match self {
            err @ Error::Retrieval { .. } => err,
            other => Error::retrieval(other.to_string()),
        }
    }

    /// True for errors caused by the caller's input rather than a collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    /// The URL is stripped; provider URLs may carry credentials.
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_embedding() {
        let err = Error::Embedding("failed to generate".to_string());
        assert_eq!(err.to_string(), "Embedding error: failed to generate");
    }

    #[test]
    fn test_error_display_inference() {
        let err = Error::Inference("model timeout".to_string());
        assert_eq!(err.to_string(), "Inference error: model timeout");
    }

    #[test]
    fn test_error_display_retrieval() {
        let err = Error::Retrieval {
            message: "function missing".to_string(),
            details: serde_json::json!({"code": "42883"}),
        };
        assert_eq!(err.to_string(), "Retrieval error: function missing");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("user_id is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: user_id is required");
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("GEMINI_API_KEY is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY is not set"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_retrieval_constructor_uses_message_as_details() {
        match Error::retrieval("connection refused") {
            Error::Retrieval { message, details } => {
                assert_eq!(message, "connection refused");
                assert_eq!(details, serde_json::json!("connection refused"));
            }
            other => panic!("Expected Retrieval error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_retrieval_keeps_existing_details() {
        let err = Error::Retrieval {
            message: "rpc failed".to_string(),
            details: serde_json::json!({"hint": "check args"}),
        };
        match err.into_retrieval() {
            Error::Retrieval { details, .. } => {
                assert_eq!(details["hint"], "check args");
            }
            other => panic!("Expected Retrieval error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_retrieval_wraps_other_errors() {
        let err = Error::Request("network unreachable".to_string()).into_retrieval();
        match err {
            Error::Retrieval { message, .. } => {
                assert_eq!(message, "Request error: network unreachable");
            }
            other => panic!("Expected Retrieval error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
