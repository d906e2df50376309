//! Application state: sessions, chat tabs, and messages, with explicit transitions.
//!
//! A single controller owns a [`ChatState`] and drives it through `new_session`,
//! `new_chat`, `select_chat`, and `append_message`. Nothing here does I/O.

mod session;

pub use session::{Chat, Message, Sender, Session, SessionKind};

use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from state transitions. A failed transition leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("no chat with id {0} in the active session")]
    UnknownChat(String),
    #[error("no session with id {0}")]
    UnknownSession(String),
    #[error("message is empty")]
    EmptyMessage,
    #[error("session title is empty")]
    EmptyTitle,
}

/// Identifiers the backend needs to route a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: String,
    /// Only set for persistent sessions.
    pub session_id: Option<String>,
    pub chat_id: String,
}

/// Max length of a session title derived from the first user message.
pub const SESSION_TITLE_MAX_LEN: usize = 60;

pub(crate) fn unix_timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            log::warn!("System time before UNIX epoch: {}", e);
            0
        })
}

/// All sessions of one user plus the active session. Each session tracks its own active chat.
#[derive(Debug, Clone)]
pub struct ChatState {
    user_id: String,
    sessions: Vec<Session>,
    active_session: usize,
}

impl ChatState {
    /// Start with one session of `kind` holding one empty chat.
    pub fn new(user_id: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            user_id: user_id.into(),
            sessions: vec![Session::new(kind)],
            active_session: 0,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active_session(&self) -> &Session {
        &self.sessions[self.active_session]
    }

    fn active_session_mut(&mut self) -> &mut Session {
        &mut self.sessions[self.active_session]
    }

    pub fn active_chat(&self) -> &Chat {
        self.active_session().active_chat()
    }

    /// Create a session with one empty chat and make it active. Returns its id.
    pub fn new_session(&mut self, kind: SessionKind) -> String {
        let session = Session::new(kind);
        let id = session.id.clone();
        self.sessions.push(session);
        self.active_session = self.sessions.len() - 1;
        log::debug!("New {:?} session {}", kind, id);
        id
    }

    /// Add a chat tab to the active session and make it active. Returns its id.
    pub fn new_chat(&mut self) -> String {
        self.active_session_mut().push_chat()
    }

    /// Activate a chat of the active session.
    pub fn select_chat(&mut self, chat_id: &str) -> Result<(), StateError> {
        let session = self.active_session_mut();
        let idx = session
            .chat_index(chat_id)
            .ok_or_else(|| StateError::UnknownChat(chat_id.to_string()))?;
        session.active_chat = idx;
        Ok(())
    }

    /// Activate the next (or previous) chat tab, wrapping around.
    pub fn cycle_chat(&mut self, forward: bool) {
        let session = self.active_session_mut();
        let n = session.chats.len();
        session.active_chat = if forward {
            (session.active_chat + 1) % n
        } else {
            (session.active_chat + n - 1) % n
        };
    }

    pub fn select_session(&mut self, session_id: &str) -> Result<(), StateError> {
        let idx = self
            .session_index(session_id)
            .ok_or_else(|| StateError::UnknownSession(session_id.to_string()))?;
        self.active_session = idx;
        Ok(())
    }

    fn session_index(&self, session_id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == session_id)
    }

    /// Insert a loaded session (replacing one with the same id) and activate it and its first chat.
    pub fn open_session(&mut self, mut session: Session) {
        if session.chats.is_empty() {
            session.push_chat();
        }
        session.active_chat = 0;
        match self.session_index(&session.id) {
            Some(idx) => {
                self.sessions[idx] = session;
                self.active_session = idx;
            }
            None => {
                self.sessions.push(session);
                self.active_session = self.sessions.len() - 1;
            }
        }
    }

    /// Set a session title. Blank titles are rejected.
    pub fn rename_session(&mut self, session_id: &str, title: &str) -> Result<(), StateError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StateError::EmptyTitle);
        }
        let idx = self
            .session_index(session_id)
            .ok_or_else(|| StateError::UnknownSession(session_id.to_string()))?;
        self.sessions[idx].title = title.to_string();
        Ok(())
    }

    /// Drop a session. The last remaining session is replaced by a fresh one of the same kind.
    pub fn remove_session(&mut self, session_id: &str) -> Result<(), StateError> {
        let idx = self
            .session_index(session_id)
            .ok_or_else(|| StateError::UnknownSession(session_id.to_string()))?;
        let removed = self.sessions.remove(idx);
        if self.sessions.is_empty() {
            self.sessions.push(Session::new(removed.kind));
        }
        if self.active_session >= idx && self.active_session > 0 {
            self.active_session -= 1;
        }
        self.active_session = self.active_session.min(self.sessions.len() - 1);
        Ok(())
    }

    /// Append a message to a chat, wherever it lives: replies go to the chat the request came
    /// from, even if the user has switched tabs or sessions since. Titles the session from
    /// its first user message.
    pub fn append_message(
        &mut self,
        chat_id: &str,
        sender: Sender,
        content: impl Into<String>,
    ) -> Result<(), StateError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(StateError::EmptyMessage);
        }
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.chat_index(chat_id).is_some())
            .ok_or_else(|| StateError::UnknownChat(chat_id.to_string()))?;
        let now = unix_timestamp_secs();
        if sender == Sender::User && !session.has_user_message() {
            session.title = title_preview(&content, SESSION_TITLE_MAX_LEN);
        }
        if let Some(chat) = session.chats.iter_mut().find(|c| c.id == chat_id) {
            chat.messages.push(Message {
                sender,
                content,
                timestamp: Some(now),
            });
        }
        session.updated_at = now;
        Ok(())
    }

    /// The session holding `chat_id`, if any.
    pub fn session_of_chat(&self, chat_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.chat_index(chat_id).is_some())
    }

    /// Routing ids for a prompt sent from the active chat.
    pub fn request_context(&self) -> RequestContext {
        let session = self.active_session();
        RequestContext {
            user_id: self.user_id.clone(),
            session_id: (session.kind == SessionKind::Persistent).then(|| session.id.clone()),
            chat_id: session.active_chat().id.clone(),
        }
    }
}

/// Single-line preview of `text`, truncated to `max_len` chars with an ellipsis.
pub fn title_preview(text: &str, max_len: usize) -> String {
    let s = text.trim().replace('\n', " ");
    if s.chars().count() <= max_len {
        return s;
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", truncated)
}

#[cfg(test)]
mod tests;
