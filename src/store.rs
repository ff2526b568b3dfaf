//! Conversation state store
//!
//! Holds the active conversation, its messages and the sender's past
//! conversations. State lives in a watch channel: every mutation notifies
//! subscribers, and readers work on a snapshot.
//!
//! Actions never keep the state borrowed across a broker call. Two
//! overlapping calls therefore resolve in completion order, and whichever
//! response lands last decides the final state.

mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use state::{StoreState, UiFlags};

use crate::broker::{BrokerClient, BrokerError, Message};
use crate::config::WidgetConfig;
use crate::transport::Transport;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Placeholder platform ids for new conversations are 9-digit integers
const NEW_CONVERSATION_ID_RANGE: std::ops::Range<u32> = 100_000_000..1_000_000_000;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
    #[error("No conversation for platform id: {0}")]
    PlatformConversationNotFound(String),
    #[error("No user id set")]
    MissingUserId,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Session-scoped store shared by the widget's components
pub struct ConversationStore {
    broker: Arc<dyn BrokerClient>,
    state: watch::Sender<StoreState>,
}

impl ConversationStore {
    #[must_use]
    pub fn new(config: &WidgetConfig, broker: Arc<dyn BrokerClient>) -> Self {
        let (state, _) = watch::channel(StoreState::new(config));
        Self { broker, state }
    }

    /// Owned copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it
    #[must_use]
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that wakes on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn conversations_ids(&self) -> Vec<String> {
        self.read(|s| s.conversations_ids().into_iter().map(String::from).collect())
    }

    #[must_use]
    pub fn waiting_for_response(&self) -> bool {
        self.read(StoreState::waiting_for_response)
    }

    #[must_use]
    pub fn last_msg(&self) -> Option<Message> {
        self.read(|s| s.last_msg().cloned())
    }

    // ==================== Broker-backed actions ====================

    /// Replace the conversation list with the sender's conversations.
    ///
    /// # Errors
    ///
    /// `MissingUserId` when no user id is set, or the broker failure.
    pub async fn gather_conversations(&self) -> StoreResult<()> {
        let user_id = self
            .read(|s| s.user_id.clone())
            .ok_or(StoreError::MissingUserId)?;

        let conversations = self.broker.list_conversations(&user_id).await?;
        tracing::debug!(user_id = %user_id, count = conversations.len(), "Gathered conversations");

        self.state.send_modify(|s| s.conversations = conversations);
        Ok(())
    }

    /// Rename a conversation on the broker, then locally.
    ///
    /// # Errors
    ///
    /// `ConversationNotFound` if `id` is not in the local list (checked before
    /// and after the request), or the broker failure.
    pub async fn rename_conversation_name(&self, id: &str, name: &str) -> StoreResult<()> {
        if self.read(|s| s.conversation(id).is_none()) {
            return Err(StoreError::ConversationNotFound(id.to_string()));
        }

        self.broker.rename_conversation(id, name).await?;

        let renamed = self.state.send_if_modified(|s| {
            match s.conversations.iter_mut().find(|c| c.id == id) {
                Some(conv) => {
                    conv.name = Some(name.to_string());
                    true
                }
                None => false,
            }
        });
        if !renamed {
            tracing::warn!(conversation_id = %id, "Conversation disappeared during rename");
            return Err(StoreError::ConversationNotFound(id.to_string()));
        }

        tracing::debug!(conversation_id = %id, name = %name, "Renamed conversation");
        Ok(())
    }

    /// Load the messages of the conversation known to the platform as
    /// `platform_conversation_id` and make it the active one.
    ///
    /// # Errors
    ///
    /// `PlatformConversationNotFound` if no listed conversation carries that
    /// platform id, or the broker failure.
    pub async fn open_conversation(&self, platform_conversation_id: &str) -> StoreResult<()> {
        let conversation_id = self
            .read(|s| {
                s.conversation_by_platform_id(platform_conversation_id)
                    .map(|c| c.id.clone())
            })
            .ok_or_else(|| {
                StoreError::PlatformConversationNotFound(platform_conversation_id.to_string())
            })?;

        let detail = self.broker.get_conversation(&conversation_id).await?;
        tracing::debug!(
            conversation_id = %conversation_id,
            platform_conversation_id = %platform_conversation_id,
            messages = detail.mml_chain.len(),
            "Opened conversation"
        );

        self.state.send_modify(|s| {
            s.messages = detail.mml_chain;
            s.selected_pl_conversation_id = Some(platform_conversation_id.to_string());
        });
        Ok(())
    }

    // ==================== Local actions ====================

    /// Start a fresh conversation under a placeholder platform id, which is returned
    #[must_use]
    pub fn create_new_conversation(&self) -> String {
        let id = rand::thread_rng()
            .gen_range(NEW_CONVERSATION_ID_RANGE)
            .to_string();
        tracing::debug!(platform_conversation_id = %id, "New conversation");

        self.state.send_modify(|s| {
            s.messages.clear();
            s.selected_pl_conversation_id = Some(id.clone());
        });
        id
    }

    /// Insert a message, replacing any message with the same id
    pub fn add_message(&self, message: Message) {
        self.state.send_modify(|s| s.upsert_message(message));
    }

    pub fn set_user_id(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        self.state.send_modify(|s| s.user_id = Some(user_id));
    }

    pub fn set_fsm_def(&self, fsm_def: Value) {
        self.state.send_modify(|s| s.fsm_def = Some(fsm_def));
    }

    /// Attach the live connection and mirror its status
    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        self.state.send_modify(|s| {
            s.disconnected = !transport.is_connected();
            s.chatfaq_ws = Some(transport);
        });
    }

    pub fn set_disconnected(&self, disconnected: bool) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.disconnected, disconnected) != disconnected);
    }

    pub fn toggle_conversation_selection(&self, id: &str) {
        self.state.send_modify(|s| s.toggle_selection(id));
    }

    pub fn clear_selected_conversations(&self) {
        self.state
            .send_if_modified(|s| !std::mem::take(&mut s.selected_conversations).is_empty());
    }

    /// Signal components to scroll the message list to the bottom
    pub fn request_scroll_to_bottom(&self) {
        self.state
            .send_modify(|s| s.scroll_to_bottom = s.scroll_to_bottom.wrapping_add(1));
    }

    pub fn mark_feedback_sent(&self) {
        self.state
            .send_modify(|s| s.feedback_sent = s.feedback_sent.wrapping_add(1));
    }

    /// Apply several UI flag changes as one notification
    pub fn update(&self, f: impl FnOnce(&mut UiFlags)) {
        self.state.send_if_modified(|s| {
            let before = s.ui.clone();
            f(&mut s.ui);
            s.ui != before
        });
    }
}
