//! API client errors.

use thiserror::Error;

/// Errors that can occur when calling the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Token missing, expired or lacking the required role.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A user-scoped call was attempted without a user or token.
    #[error("Usuario no definido o token faltante")]
    MissingCredentials,

    /// Cart quantities must be at least one.
    #[error("La cantidad debe ser mayor a 0")]
    InvalidQuantity,

    /// The configured base URL cannot be extended into an endpoint URL.
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The message the API put in the body, when there was one.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Unauthorized(message) => {
                (!message.is_empty()).then_some(message.as_str())
            }
            _ => None,
        }
    }

    /// Whether retrying with a fresh login could help.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::MissingCredentials)
    }
}

/// Pull a human-readable message out of an error body.
///
/// The API answers errors as `{"message": "..."}` (sometimes `error`); other
/// bodies are passed through, shortened.
pub(crate) fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "mensaje"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_owned();
            }
        }
    }
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_json() {
        assert_eq!(
            extract_message(r#"{"message": "Stock insuficiente"}"#),
            "Stock insuficiente"
        );
        assert_eq!(extract_message(r#"{"error": "Token inválido"}"#), "Token inválido");
    }

    #[test]
    fn test_extract_message_plain_body_is_truncated() {
        let body = "x".repeat(500);
        assert_eq!(extract_message(&body).len(), 200);
    }

    #[test]
    fn test_api_message() {
        let err = ApiError::Status {
            status: 400,
            message: "Email ya registrado".to_owned(),
        };
        assert_eq!(err.api_message(), Some("Email ya registrado"));
        assert!(ApiError::MissingCredentials.api_message().is_none());
        assert!(ApiError::MissingCredentials.is_unauthorized());
    }
}
