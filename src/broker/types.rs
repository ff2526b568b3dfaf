//! Broker record types
//!
//! The broker sends loosely shaped JSON. Fields the widget reads are typed;
//! everything else is kept in a flattened `extra` map so records survive a
//! round trip unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accept an identifier sent either as a JSON string or a JSON number.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

/// Conversation summary as listed for a sender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-assigned identity
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Identifier assigned by the embedding platform
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub platform_conversation_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Human,
    Bot,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(rename = "type")]
    pub kind: SenderType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sender {
    #[must_use]
    pub fn new(kind: SenderType) -> Self {
        Self {
            kind,
            extra: Map::new(),
        }
    }
}

/// A citation record from the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnowledgeItem {
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            extra: Map::new(),
        }
    }

    /// Identity used when collapsing duplicate citations
    #[must_use]
    pub fn key(&self) -> (Option<&str>, Option<&str>) {
        (self.url.as_deref(), self.title.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct References {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_items: Option<Vec<KnowledgeItem>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl References {
    #[must_use]
    pub fn with_items(items: Vec<KnowledgeItem>) -> Self {
        Self {
            knowledge_items: Some(items),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<References>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One message of a conversation chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub sender: Sender,
    /// Set on the final chunk of a bot response
    #[serde(default)]
    pub last: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    #[must_use]
    pub fn new(id: impl Into<String>, sender: SenderType) -> Self {
        Self {
            id: id.into(),
            sender: Sender::new(sender),
            last: false,
            payload: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn last(mut self, last: bool) -> Self {
        self.last = last;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Body of `GET conversations/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetail {
    #[serde(default)]
    pub mml_chain: Vec<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PATCH conversations/{id}/`
#[derive(Debug, Serialize)]
pub(crate) struct RenameBody<'a> {
    pub name: &'a str,
}
