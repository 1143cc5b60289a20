//! Unified SDK error types.
//!
//! `Display` on every variant is the human-readable message a storefront
//! shows to the shopper. Server-supplied `message` fields win over the
//! built-in fallbacks.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    /// A required id or field was missing or malformed. No request was sent.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("No items to order. Cart is empty.")]
    EmptyOrder,

    /// The server answered, but not in a shape the SDK recognizes.
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// The server refused the operation with a message.
    #[error("{0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub(crate) const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection.";

/// HTTP-layer errors.
///
/// Status variants carry the server's `message` field when it sent one.
#[derive(Error, Debug)]
pub enum HttpError {
    /// No response was received.
    #[error("{}", .0.as_deref().unwrap_or(NETWORK_MESSAGE))]
    Network(Option<String>),

    #[error("Request timed out. Please check your internet connection and try again.")]
    Timeout,

    #[error("{}", .0.as_deref().unwrap_or("Session expired. Please login again."))]
    Unauthorized(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("You do not have permission to perform this action."))]
    Forbidden(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("Resource not found."))]
    NotFound(Option<String>),

    /// 400 and any other 4xx without a dedicated variant.
    #[error("{}", .message.as_deref().unwrap_or("An error occurred. Please try again."))]
    BadRequest {
        status: u16,
        message: Option<String>,
    },

    /// 5xx and 408.
    #[error("{}", .message.as_deref().unwrap_or("Server error. Please try again later."))]
    ServerError {
        status: u16,
        message: Option<String>,
    },

    #[error("Could not read server response: {0}")]
    Decode(String),
}

impl HttpError {
    /// The message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m) => m.as_deref(),
            Self::BadRequest { message, .. } | Self::ServerError { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// HTTP status code, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::BadRequest { status, .. } | Self::ServerError { status, .. } => Some(*status),
            Self::Network(_) | Self::Timeout | Self::Decode(_) => None,
        }
    }

    /// Transport failures and timeouts are network-class: worth retrying.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User is not logged in.")]
    NotAuthenticated,

    #[error("Session expired. Please refresh the page and try again.")]
    SessionExpired,

    #[error("Please login again to continue.")]
    LoginRequired,

    #[error("Admin access required.")]
    AdminRequired,

    #[error("{0}")]
    LoginFailed(String),
}

/// Session storage errors. Never surfaced by the history store.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupt: {0}")]
    Corrupt(String),

    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}

impl From<SessionError> for SdkError {
    fn from(e: SessionError) -> Self {
        SdkError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins_over_fallback() {
        let e = HttpError::Forbidden(Some("Coupons are disabled".into()));
        assert_eq!(e.to_string(), "Coupons are disabled");
        assert_eq!(
            HttpError::Forbidden(None).to_string(),
            "You do not have permission to perform this action."
        );
    }

    #[test]
    fn test_network_class() {
        assert!(HttpError::Timeout.is_network());
        assert!(HttpError::Network(None).is_network());
        assert!(!HttpError::BadRequest {
            status: 400,
            message: None
        }
        .is_network());
        assert_eq!(HttpError::Network(None).to_string(), NETWORK_MESSAGE);
    }

    #[test]
    fn test_status_codes() {
        let e = HttpError::ServerError {
            status: 503,
            message: None,
        };
        assert_eq!(e.status(), Some(503));
        let conflict = HttpError::BadRequest {
            status: 409,
            message: None,
        };
        assert_eq!(conflict.status(), Some(409));
        assert_eq!(HttpError::Timeout.status(), None);
    }
}
