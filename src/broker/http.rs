//! reqwest implementation of the broker client

use super::types::{Conversation, ConversationDetail, RenameBody};
use super::{BrokerClient, BrokerError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const CONVERSATIONS_PATH: &str = "/back/api/broker/conversations";

/// Broker client speaking HTTP/JSON
pub struct HttpBroker {
    client: Client,
    base_url: String,
}

impl HttpBroker {
    /// Build a client rooted at `base_url` (the widget's `chatfaqAPI`).
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BrokerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn conversations_url(&self) -> String {
        format!("{}{CONVERSATIONS_PATH}", self.base_url)
    }

    fn conversation_url(&self, id: &str) -> String {
        format!("{}/{id}/", self.conversations_url())
    }

    /// Send a request and return the body of a successful response
    async fn send(request: RequestBuilder) -> Result<String, BrokerError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BrokerError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                BrokerError::network(format!("Connection failed: {e}"))
            } else {
                BrokerError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BrokerError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(BrokerError::from_status(status.as_u16(), &body));
        }

        Ok(body)
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, BrokerError> {
        serde_json::from_str(body)
            .map_err(|e| BrokerError::decode(format!("Failed to parse response: {e} - body: {body}")))
    }
}

#[async_trait]
impl BrokerClient for HttpBroker {
    async fn list_conversations(&self, sender: &str) -> Result<Vec<Conversation>, BrokerError> {
        let url = format!("{}/from_sender/", self.conversations_url());
        let body = Self::send(self.client.get(url).query(&[("sender", sender)])).await?;
        Self::parse(&body)
    }

    async fn rename_conversation(&self, id: &str, name: &str) -> Result<(), BrokerError> {
        Self::send(
            self.client
                .patch(self.conversation_url(id))
                .json(&RenameBody { name }),
        )
        .await?;
        Ok(())
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail, BrokerError> {
        let body = Self::send(
            self.client
                .get(self.conversation_url(id))
                .header("content-type", "application/json"),
        )
        .await?;
        Self::parse(&body)
    }
}
