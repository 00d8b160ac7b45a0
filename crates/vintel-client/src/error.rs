//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the annotation service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid service account: {0}")]
    Credentials(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Operation not found: {0}")]
    NotFound(String),

    #[error("No annotation kinds requested")]
    NoKindsRequested,

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Annotation failed (code {code}): {message}")]
    Remote { code: i32, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Offset error: {0}")]
    Offset(#[from] vintel_models::OffsetError),
}

impl ClientError {
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a non-success HTTP status to a typed error.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            404 => Self::NotFound(body),
            _ => Self::RequestFailed { status, body },
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_404() {
        let err = ClientError::from_http_status(404, "no such operation");
        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(err.http_status(), Some(404));
    }

    #[test]
    fn test_from_http_status_other() {
        let err = ClientError::from_http_status(500, "internal error");
        assert!(matches!(
            err,
            ClientError::RequestFailed { status: 500, .. }
        ));
        assert_eq!(err.http_status(), Some(500));
    }

    #[test]
    fn test_auth_error_has_no_status() {
        assert_eq!(ClientError::auth_error("denied").http_status(), None);
    }
}
