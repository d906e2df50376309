//! Session index: metadata, listing, filtering, and index mutations.

use std::io;

use serde::{Deserialize, Serialize};

use crate::core::config::Config;

use super::storage;

/// Metadata for a stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub id: String,
    pub title: String,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default)]
    pub chat_count: usize,
}

/// Filter sessions by title or id (case-insensitive). Empty query returns all.
pub fn filter_sessions<'a>(metas: &'a [SessionMeta], query: &str) -> Vec<&'a SessionMeta> {
    if query.is_empty() {
        return metas.iter().collect();
    }
    let q = query.to_lowercase();
    metas
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&q) || m.id.to_lowercase().contains(&q))
        .collect()
}

/// List all stored sessions, most recently updated first.
pub fn list_sessions() -> io::Result<Vec<SessionMeta>> {
    let mut index = storage::load_index()?;
    index.sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(index.sessions)
}

/// Add or update a session in the index. Replaces any entry with the same id.
pub(super) fn add_or_update(meta: SessionMeta) -> io::Result<()> {
    let mut index = storage::load_index()?;
    index.sessions.retain(|s| s.id != meta.id);
    index.sessions.push(meta);
    storage::save_index(&index)
}

/// Update the title of a session. Returns false when the id is not in the index.
pub(super) fn update_title(id: &str, new_title: &str) -> io::Result<bool> {
    let mut index = storage::load_index()?;
    let Some(meta) = index.sessions.iter_mut().find(|s| s.id == id) else {
        return Ok(false);
    };
    meta.title = new_title.to_string();
    storage::save_index(&index)?;
    Ok(true)
}

pub(super) fn remove(id: &str) -> io::Result<()> {
    let mut index = storage::load_index()?;
    index.sessions.retain(|s| s.id != id);
    storage::save_index(&index)
}

/// Drop the oldest sessions beyond `max_sessions` (0 = unlimited), files included.
pub(super) fn prune(config: &Config) -> io::Result<()> {
    let max = config.max_sessions as usize;
    if max == 0 {
        return Ok(());
    }

    let mut index = storage::load_index()?;
    if index.sessions.len() <= max {
        return Ok(());
    }
    index.sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let to_remove: Vec<_> = index.sessions.drain(max..).collect();
    for meta in &to_remove {
        if let Err(e) = storage::remove_session_file(&meta.id) {
            log::warn!("Failed to remove session file {}: {}", meta.id, e);
        }
    }
    log::debug!("Pruned {} old session(s)", to_remove.len());
    storage::save_index(&index)
}
