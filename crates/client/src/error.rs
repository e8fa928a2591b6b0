//! # Error Module
//!
//! Client errors using thiserror. Every failure can be normalized to the
//! `{message, fieldErrors?, statusCode}` shape the views show inline.

use ancla_core::{CoreError, FieldErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error as reported by the backend, or synthesized when there was no response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    #[serde(default, rename = "errors", skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    pub status_code: u16,
}

/// Error body as the backend sends it; every field optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: None,
            status_code,
        }
    }

    /// Build from a non-success response body.
    ///
    /// Falls back to the HTTP reason phrase when the body carries no message.
    pub fn from_body(status_code: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status_code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("An error occurred")
                    .to_string()
            });
        Self {
            message,
            field_errors: parsed.errors.filter(|e| !e.is_empty()),
            status_code,
        }
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.field_errors
            .as_ref()
            .and_then(|errors| errors.get(name))
            .map(Vec::as_slice)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status_code)?;
        if let Some(errors) = &self.field_errors {
            for (field, messages) in errors {
                write!(f, "\n  {}: {}", field, messages.join(", "))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Api(ApiError),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("credential store error: {0}")]
    Credentials(#[from] std::io::Error),

    #[error("session expired, sign in again")]
    SessionExpired,

    #[error("not signed in")]
    NotAuthenticated,

    /// The view that issued the request was left
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Result type alias for ClientError
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        ClientError::Api(err)
    }
}

impl ClientError {
    /// HTTP status, 500 when no response was received
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::Api(e) => e.status_code,
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()).unwrap_or(500),
            ClientError::SessionExpired | ClientError::NotAuthenticated => 401,
            ClientError::Invalid(e) if e.is_validation_error() => 422,
            ClientError::Invalid(_) => 400,
            _ => 500,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 401
    }

    /// Cancelled requests belong to a view that is gone
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ClientError::Cancelled)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Api(e) => e.field_errors.as_ref(),
            ClientError::Invalid(e) => e.field_errors(),
            _ => None,
        }
    }

    /// Normalized `{message, fieldErrors, statusCode}` view of any error
    pub fn to_api_error(&self) -> ApiError {
        match self {
            ClientError::Api(e) => e.clone(),
            other => ApiError {
                message: other.to_string(),
                field_errors: other.field_errors().cloned(),
                status_code: other.status_code(),
            },
        }
    }
}
