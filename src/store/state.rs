//! Store state snapshot and derived views

use crate::broker::{Conversation, Message, SenderType};
use crate::config::WidgetConfig;
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;

/// Presentation flags toggled directly by UI components
#[allow(clippy::struct_excessive_bools)] // Independent on/off switches read by separate components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiFlags {
    pub dark_mode: bool,
    pub menu_opened: bool,
    pub maximized: bool,
    pub history_opened: bool,
    pub opened: bool,
    pub deleting: bool,
    pub downloading: bool,
    pub is_phone: bool,
    pub display_generation: bool,
    pub display_sources: bool,
    pub sources_first: bool,
}

impl UiFlags {
    #[must_use]
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            dark_mode: false,
            menu_opened: false,
            maximized: true,
            history_opened: true,
            opened: false,
            deleting: false,
            downloading: false,
            is_phone: false,
            display_generation: config.display_generation,
            display_sources: config.display_sources,
            sources_first: config.sources_first,
        }
    }
}

impl Default for UiFlags {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}

/// Everything the widget knows about the current session
#[derive(Debug, Clone)]
pub struct StoreState {
    /// Conversation flow definition pushed by the backend
    pub fsm_def: Option<Value>,
    pub chatfaq_ws: Option<Arc<dyn Transport>>,
    /// Broker base URL (`chatfaqAPI`). Mirrors the URL the store's broker
    /// client was built with; requests never read it.
    pub chatfaq_api: String,
    pub user_id: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub ui: UiFlags,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
    pub selected_conversations: Vec<String>,
    pub selected_pl_conversation_id: Option<String>,
    /// Change counters: only the fact that they moved matters
    pub scroll_to_bottom: u64,
    pub feedback_sent: u64,
    pub disconnected: bool,
}

impl StoreState {
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            fsm_def: None,
            chatfaq_ws: None,
            chatfaq_api: config.api_url.clone(),
            user_id: config.user_id.clone(),
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            ui: UiFlags::from_config(config),
            conversations: Vec::new(),
            messages: Vec::new(),
            selected_conversations: Vec::new(),
            selected_pl_conversation_id: None,
            scroll_to_bottom: 0,
            feedback_sent: 0,
            disconnected: true,
        }
    }

    /// Ids of all known conversations, in list order
    #[must_use]
    pub fn conversations_ids(&self) -> Vec<&str> {
        self.conversations.iter().map(|c| c.id.as_str()).collect()
    }

    /// True until the bot's final chunk for the latest exchange has arrived
    #[must_use]
    pub fn waiting_for_response(&self) -> bool {
        match self.last_msg() {
            None => true,
            Some(msg) => match msg.sender.kind {
                SenderType::Human => true,
                SenderType::Bot => !msg.last,
                SenderType::Other => false,
            },
        }
    }

    #[must_use]
    pub fn last_msg(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn conversation_by_platform_id(&self, platform_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|c| c.platform_conversation_id == platform_id)
    }

    /// Replace the message with the same id, or append
    pub(crate) fn upsert_message(&mut self, message: Message) {
        match self.messages.iter_mut().find(|m| m.id == message.id) {
            Some(existing) => *existing = message,
            None => self.messages.push(message),
        }
    }

    pub(crate) fn toggle_selection(&mut self, id: &str) {
        match self.selected_conversations.iter().position(|c| c == id) {
            Some(pos) => {
                self.selected_conversations.remove(pos);
            }
            None => self.selected_conversations.push(id.to_string()),
        }
    }
}
