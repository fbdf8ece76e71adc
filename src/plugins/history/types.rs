use serde::{Deserialize, Serialize};

use super::title::UNTITLED;

/// A single chat entry. Never edited once appended.
///
/// `content` is either plain markdown or a serialized JSON payload whose
/// shape decides how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub is_user: bool,
    pub timestamp: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content.into(), true)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content.into(), false)
    }

    fn new(content: String, is_user: bool) -> Self {
        Self {
            id: super::store::new_id("msg"),
            content,
            is_user,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub created_at_ms: u64,
    pub topic: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub(super) fn new(id: String, topic: String, created_at_ms: u64) -> Self {
        Self {
            id,
            title: UNTITLED.to_string(),
            created_at_ms,
            topic,
            messages: Vec::new(),
        }
    }

    pub fn summary(&self, current_id: Option<&str>) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at_ms: self.created_at_ms,
            topic: self.topic.clone(),
            message_count: self.messages.len() as u32,
            is_active: current_id == Some(self.id.as_str()),
        }
    }
}

/// Sidebar row: everything but the messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at_ms: u64,
    pub topic: String,
    pub message_count: u32,
    pub is_active: bool,
}
