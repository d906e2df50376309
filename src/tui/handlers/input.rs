//! Handler for main input (prompt editing, send, scroll).

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::runtime::Runtime;

use crate::core::backend::{BackendClient, ChatPayload};
use crate::core::state::Sender;

use super::super::app::{App, ScrollPosition};
use super::super::constants;
use super::{HandleResult, PendingChat, chat_spawn};

/// Send the prompt in the input from the active chat. One request at a time.
fn send_prompt(
    app: &mut App,
    client: &Arc<BackendClient>,
    pending_chat: &mut Option<PendingChat>,
    rt: &Arc<Runtime>,
) {
    if pending_chat.is_some() {
        app.show_toast("Waiting for a reply");
        return;
    }
    let Some(prompt) = app.take_input() else {
        return;
    };
    let context = app.state.request_context();
    if let Err(e) = app
        .state
        .append_message(&context.chat_id, Sender::User, prompt.as_str())
    {
        log::warn!("Could not add prompt: {}", e);
        return;
    }
    let session_id = app.state.active_session().id.clone();
    app.mark_dirty(&session_id);
    app.scroll = ScrollPosition::Bottom;

    let payload = ChatPayload::new(context, prompt, app.provider.clone());
    app.waiting_chat = Some(payload.chat_id.clone());
    *pending_chat = Some(chat_spawn::spawn_chat(rt, Arc::clone(client), payload));
}

/// Handle main input keys (when no popup is open).
pub(crate) fn handle_main_input(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
    client: &Arc<BackendClient>,
    pending_chat: &mut Option<PendingChat>,
    rt: &Arc<Runtime>,
) -> HandleResult {
    match key_code {
        KeyCode::Enter
            if key_modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.insert_char('\n');
        }
        KeyCode::Enter => send_prompt(app, client, pending_chat, rt),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.scroll_up(constants::SCROLL_LINES_SMALL),
        KeyCode::Down => app.scroll_down(constants::SCROLL_LINES_SMALL),
        KeyCode::PageUp => app.scroll_up(constants::SCROLL_LINES_PAGE),
        KeyCode::PageDown => app.scroll_down(constants::SCROLL_LINES_PAGE),
        KeyCode::Char('u') if key_modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.clear();
            app.input_cursor = 0;
        }
        KeyCode::Char(c) => {
            // Ignore Ctrl/Alt+key: user likely intended a shortcut (e.g. Alt+H)
            if !key_modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                app.insert_char(c);
            }
        }
        _ => {}
    }
    HandleResult::Continue
}
