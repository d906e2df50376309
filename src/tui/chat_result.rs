//! Apply backend results to the app state and save sessions that changed.

use crate::core::backend::{BackendError, ChatReply};
use crate::core::config::Config;
use crate::core::history;
use crate::core::state::Sender;

use super::app::{App, ScrollPosition};

/// Shown when the backend answers with an empty reply.
pub(crate) const EMPTY_REPLY: &str = "*[Empty reply]*";

/// Append the reply (or error text) to the chat that sent the request, then save its session.
pub(crate) fn handle_chat_result(
    app: &mut App,
    chat_id: &str,
    result: Result<ChatReply, BackendError>,
    config: &Config,
) {
    app.waiting_chat = None;
    let content = match result {
        Ok(reply) if reply.response.trim().is_empty() => EMPTY_REPLY.to_string(),
        Ok(reply) => {
            if let Some(provider) = reply.provider.as_deref() {
                log::debug!("Reply for chat {} from {}", chat_id, provider);
            }
            reply.response
        }
        Err(e) => {
            log::warn!("Request for chat {} failed: {}", chat_id, e);
            e.reply_text()
        }
    };
    if let Err(e) = app.state.append_message(chat_id, Sender::Assistant, content) {
        // The chat was closed (its session deleted) while the request was in flight.
        log::warn!("Dropping reply: {}", e);
        return;
    }
    if app.state.active_chat().id == chat_id {
        app.scroll = ScrollPosition::Bottom;
    }
    let Some(session_id) = app.state.session_of_chat(chat_id).map(|s| s.id.clone()) else {
        return;
    };
    app.mark_dirty(&session_id);
    save_session(app, &session_id, config);
}

/// Save an open session if it has unsaved changes. Failures are logged and toasted.
pub(crate) fn save_session(app: &mut App, session_id: &str, config: &Config) {
    if !app.is_dirty(session_id) {
        return;
    }
    let Some(session) = app.state.sessions().iter().find(|s| s.id == session_id) else {
        app.clear_dirty(session_id);
        return;
    };
    match history::save_session(session, config) {
        Ok(saved) => {
            if saved {
                log::debug!("Saved session {}", session_id);
            }
            app.clear_dirty(session_id);
        }
        Err(e) => {
            log::warn!("Could not save session {}: {}", session_id, e);
            app.show_toast("Save failed");
        }
    }
}

pub(crate) fn save_all_dirty(app: &mut App, config: &Config) {
    for id in app.dirty_sessions() {
        save_session(app, &id, config);
    }
}
