//! Index and session file persistence (index.json, session_*.json).

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::paths;
use crate::core::state::Session;

use super::SessionMeta;

fn index_path() -> Option<PathBuf> {
    paths::data_dir().map(|d| d.join("index.json"))
}

/// Session ids are uuids; anything that could step outside the data dir is refused.
pub(super) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn session_path(id: &str) -> Option<PathBuf> {
    if !is_valid_id(id) {
        return None;
    }
    paths::data_dir().map(|d| d.join(format!("session_{}.json", id)))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct IndexFile {
    pub(super) sessions: Vec<SessionMeta>,
}

pub(super) fn ensure_data_dir() -> io::Result<PathBuf> {
    let dir = paths::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No data directory"))?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load the session index. Returns an empty index when there is no data dir or no file yet.
/// Propagates IO errors (permission, disk) and JSON parse errors.
pub(super) fn load_index() -> io::Result<IndexFile> {
    let Some(path) = index_path() else {
        return Ok(IndexFile::default());
    };
    let data = match fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexFile::default()),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub(super) fn save_index(index: &IndexFile) -> io::Result<()> {
    ensure_data_dir()?;
    let path =
        index_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No index path"))?;
    write_json_atomic(&path, index)
}

pub(super) fn read_session(id: &str) -> Option<Session> {
    let path = session_path(id)?;
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Session file {} is unreadable: {}", id, e);
            None
        }
    }
}

pub(super) fn write_session(session: &Session) -> io::Result<()> {
    let path = session_path(&session.id)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No session path"))?;
    write_json_atomic(&path, session)
}

/// Remove a session file. A missing file is not an error.
pub(super) fn remove_session_file(id: &str) -> io::Result<()> {
    let Some(path) = session_path(id) else {
        return Ok(());
    };
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn write_json_atomic<T: Serialize>(path: &std::path::Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)
}
