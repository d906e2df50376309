//! Session, chat, and message records. Serializable as-is for local persistence.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::unix_timestamp_secs;

/// Title of a session before its first user message.
pub const UNTITLED_SESSION: &str = "New session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "role")]
    pub sender: Sender,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// One chat tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    pub(super) fn new(position: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: format!("Chat {}", position),
            messages: vec![],
        }
    }

    /// Last assistant reply, if any.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Assistant)
            .map(|m| m.content.as_str())
    }
}

/// Ephemeral sessions live only in memory; persistent ones are saved after each reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Ephemeral,
    Persistent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub created_at: u64,
    pub updated_at: u64,
    pub kind: SessionKind,
    pub chats: Vec<Chat>,
    /// Index into `chats`; not persisted.
    #[serde(skip)]
    pub(super) active_chat: usize,
}

impl Session {
    pub(super) fn new(kind: SessionKind) -> Self {
        let now = unix_timestamp_secs();
        Self {
            id: Uuid::new_v4().to_string(),
            title: UNTITLED_SESSION.to_string(),
            created_at: now,
            updated_at: now,
            kind,
            chats: vec![Chat::new(1)],
            active_chat: 0,
        }
    }

    pub fn active_chat(&self) -> &Chat {
        &self.chats[self.active_chat.min(self.chats.len().saturating_sub(1))]
    }

    pub fn active_chat_index(&self) -> usize {
        self.active_chat
    }

    pub(super) fn chat_index(&self, chat_id: &str) -> Option<usize> {
        self.chats.iter().position(|c| c.id == chat_id)
    }

    pub(super) fn push_chat(&mut self) -> String {
        let chat = Chat::new(self.chats.len() + 1);
        let id = chat.id.clone();
        self.chats.push(chat);
        self.active_chat = self.chats.len() - 1;
        id
    }

    pub(super) fn has_user_message(&self) -> bool {
        self.chats
            .iter()
            .flat_map(|c| &c.messages)
            .any(|m| m.sender == Sender::User)
    }

    /// Total messages across all chats.
    pub fn message_count(&self) -> usize {
        self.chats.iter().map(|c| c.messages.len()).sum()
    }
}
