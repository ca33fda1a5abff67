//! Error handling for the PulsObywateli HTTP client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Error returned by every request made through [`crate::ApiClient`].
#[derive(Error, Debug)]
pub enum HttpError {
    /// The server answered with a non-2xx status
    #[error("{}", api_message(.status, .message))]
    Api {
        status: StatusCode,
        /// Human readable message extracted from the response body
        message: Option<String>,
        /// The full response body when it was valid JSON
        body: Option<Value>,
    },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request URL could not be built
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The access token cannot be sent as an `Authorization` header value
    #[error("Invalid access token")]
    InvalidToken,
}

fn api_message(status: &StatusCode, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("API error ({})", status),
    }
}

/// Coarse classification used to decide what the user gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response at all (connection refused, DNS, timeout, bad URL)
    Transport,
    /// 401 or 403: missing, invalid or expired token
    Unauthorized,
    /// Any other 4xx, normally carrying a message meant for the user
    Validation,
    /// 5xx
    Server,
    /// 2xx with a body that does not match the expected shape
    Decode,
}

impl HttpError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HttpError::Api { status, .. } => {
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN {
                    ErrorKind::Unauthorized
                } else if status.is_server_error() {
                    ErrorKind::Server
                } else {
                    ErrorKind::Validation
                }
            }
            HttpError::Network(err) if err.is_decode() => ErrorKind::Decode,
            HttpError::Network(_) | HttpError::Url(_) => ErrorKind::Transport,
            HttpError::Json(_) => ErrorKind::Decode,
            HttpError::InvalidToken => ErrorKind::Unauthorized,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            HttpError::Network(err) => err.status(),
            _ => None,
        }
    }

    /// The message the server put in its error payload.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            HttpError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The raw error payload, e.g. per-field validation errors.
    pub fn body(&self) -> Option<&Value> {
        match self {
            HttpError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials attached to the request.
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

/// Pulls a user-facing message out of an error payload.
///
/// The backend uses several shapes: `{"error": ..}` from hand written
/// views, `{"detail": ..}` from the auth layer and
/// `{"non_field_errors": [..]}` from serializer validation.
pub fn extract_message(body: &Value) -> Option<String> {
    if let Some(text) = body.as_str() {
        return Some(text.to_string());
    }

    for key in ["error", "detail", "message"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }

    body.get("non_field_errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}
