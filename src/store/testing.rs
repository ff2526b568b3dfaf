//! Mock broker for store tests
//!
//! Queued answers and recorded calls, no I/O.

use crate::broker::{
    BrokerClient, BrokerError, BrokerErrorKind, Conversation, ConversationDetail,
};
use async_trait::async_trait;
use serde_json::Map;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One request the store made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerCall {
    List(String),
    Rename(String, String),
    Get(String),
}

pub fn conversation(id: &str, platform_id: &str, name: &str) -> Conversation {
    Conversation {
        id: id.to_string(),
        platform_conversation_id: platform_id.to_string(),
        name: Some(name.to_string()),
        extra: Map::new(),
    }
}

#[derive(Default)]
pub struct MockBroker {
    lists: Mutex<VecDeque<Result<Vec<Conversation>, BrokerError>>>,
    details: Mutex<HashMap<String, ConversationDetail>>,
    rename_failure: Mutex<Option<BrokerErrorKind>>,
    /// Per-conversation gates that hold `get_conversation` until notified
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<BrokerCall>>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_conversations(&self, conversations: Vec<Conversation>) {
        self.lists.lock().unwrap().push_back(Ok(conversations));
    }

    pub fn queue_list_error(&self, error: BrokerError) {
        self.lists.lock().unwrap().push_back(Err(error));
    }

    pub fn set_detail(&self, id: &str, detail: ConversationDetail) {
        self.details.lock().unwrap().insert(id.to_string(), detail);
    }

    pub fn fail_renames(&self, kind: BrokerErrorKind) {
        *self.rename_failure.lock().unwrap() = Some(kind);
    }

    /// Hold fetches of `id` until the returned gate is notified
    pub fn gate(&self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), gate.clone());
        gate
    }

    pub fn recorded_calls(&self) -> Vec<BrokerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BrokerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BrokerClient for MockBroker {
    async fn list_conversations(&self, sender: &str) -> Result<Vec<Conversation>, BrokerError> {
        self.record(BrokerCall::List(sender.to_string()));
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BrokerError::network("No mock response queued")))
    }

    async fn rename_conversation(&self, id: &str, name: &str) -> Result<(), BrokerError> {
        self.record(BrokerCall::Rename(id.to_string(), name.to_string()));
        match *self.rename_failure.lock().unwrap() {
            Some(kind) => Err(BrokerError::new(kind, "mock rename failure")),
            None => Ok(()),
        }
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail, BrokerError> {
        self.record(BrokerCall::Get(id.to_string()));
        let gate = self.gates.lock().unwrap().get(id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| BrokerError::not_found(format!("Not found: {id}")))
    }
}
