//! Persistence of sessions in ~/.local/share/texchat/sessions/.
//!
//! Only persistent sessions are written. Each session lives in its own
//! `session_<id>.json`; `index.json` holds the metadata used for listing.

mod index;
mod storage;

pub use index::{SessionMeta, filter_sessions, list_sessions};

use std::io;

use crate::core::config::Config;
use crate::core::state::{Session, SessionKind};

/// Save a session. Ephemeral sessions are skipped (`Ok(false)`), chats without
/// messages are dropped, and a session with no messages at all is rejected.
pub fn save_session(session: &Session, config: &Config) -> io::Result<bool> {
    if session.kind == SessionKind::Ephemeral {
        return Ok(false);
    }
    let mut stored = session.clone();
    stored.chats.retain(|c| !c.messages.is_empty());
    if stored.chats.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Cannot save empty session",
        ));
    }

    storage::ensure_data_dir()?;
    storage::write_session(&stored)?;
    index::add_or_update(SessionMeta {
        id: stored.id.clone(),
        title: stored.title.clone(),
        created_at: stored.created_at,
        updated_at: stored.updated_at,
        chat_count: stored.chats.len(),
    })?;
    index::prune(config)?;
    log::debug!(
        "Saved session {} ({} chats, {} messages)",
        stored.id,
        stored.chats.len(),
        stored.message_count()
    );
    Ok(true)
}

/// Load a session by id. Missing or unreadable files give `None`.
pub fn load_session(id: &str) -> Option<Session> {
    storage::read_session(id)
}

fn check_id(id: &str) -> io::Result<()> {
    if storage::is_valid_id(id) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid session id {:?}", id),
        ))
    }
}

/// Rename a session in the index and in its file.
pub fn rename_session(id: &str, new_title: &str) -> io::Result<()> {
    check_id(id)?;
    let new_title = new_title.trim();
    if new_title.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Title cannot be empty",
        ));
    }
    if !index::update_title(id, new_title)? {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("No session with id {}", id),
        ));
    }
    if let Some(mut session) = storage::read_session(id) {
        session.title = new_title.to_string();
        storage::write_session(&session)?;
    }
    Ok(())
}

/// Delete a session file and its index entry.
pub fn delete_session(id: &str) -> io::Result<()> {
    check_id(id)?;
    storage::remove_session_file(id)?;
    index::remove(id)
}
