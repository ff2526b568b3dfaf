//! Broker API client
//!
//! Typed access to the three conversation endpoints of the backend broker.

mod error;
mod http;
mod types;

pub use error::{BrokerError, BrokerErrorKind};
pub use http::HttpBroker;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Conversation endpoints of the broker
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// `GET conversations/from_sender/?sender={sender}`
    async fn list_conversations(&self, sender: &str) -> Result<Vec<Conversation>, BrokerError>;

    /// `PATCH conversations/{id}/` with `{name}`
    async fn rename_conversation(&self, id: &str, name: &str) -> Result<(), BrokerError>;

    /// `GET conversations/{id}/`
    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail, BrokerError>;
}

/// Logging wrapper for broker clients
pub struct LoggingBroker {
    inner: Arc<dyn BrokerClient>,
}

impl LoggingBroker {
    #[must_use]
    pub fn new(inner: Arc<dyn BrokerClient>) -> Self {
        Self { inner }
    }

    fn record<T>(operation: &str, started: std::time::Instant, result: &Result<T, BrokerError>) {
        let duration = started.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    "Broker request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Broker request failed"
                );
            }
        }
    }
}

#[async_trait]
impl BrokerClient for LoggingBroker {
    async fn list_conversations(&self, sender: &str) -> Result<Vec<Conversation>, BrokerError> {
        let start = std::time::Instant::now();
        let result = self.inner.list_conversations(sender).await;
        Self::record("list_conversations", start, &result);
        result
    }

    async fn rename_conversation(&self, id: &str, name: &str) -> Result<(), BrokerError> {
        let start = std::time::Instant::now();
        let result = self.inner.rename_conversation(id, name).await;
        Self::record("rename_conversation", start, &result);
        result
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail, BrokerError> {
        let start = std::time::Instant::now();
        let result = self.inner.get_conversation(id).await;
        Self::record("get_conversation", start, &result);
        result
    }
}
