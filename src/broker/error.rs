//! Broker error types

use thiserror::Error;

/// Broker request error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BrokerError {
    pub kind: BrokerErrorKind,
    pub message: String,
}

impl BrokerError {
    #[must_use]
    pub fn new(kind: BrokerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::Network, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::NotFound, message)
    }

    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::Auth, message)
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::InvalidRequest, message)
    }

    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::ServerError, message)
    }

    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(BrokerErrorKind::Decode, message)
    }

    /// Classify a non-success HTTP status
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::auth(format!("Authentication failed: {body}")),
            404 => Self::not_found(format!("Not found: {body}")),
            500..=599 => Self::server_error(format!("Server error: {body}")),
            _ => Self::invalid_request(format!("HTTP {status}: {body}")),
        }
    }
}

/// Error classification for callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerErrorKind {
    /// Connection failures, timeouts
    Network,
    /// 404
    NotFound,
    /// 401, 403
    Auth,
    /// Any other 4xx
    InvalidRequest,
    /// 5xx
    ServerError,
    /// Response body did not match the expected shape
    Decode,
}

impl BrokerErrorKind {
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::ServerError)
    }
}
