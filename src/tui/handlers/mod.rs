//! Event handlers for the TUI: keyboard and mouse.

mod chat_spawn;
mod input;
mod session_selector;
mod shortcuts;

use std::sync::Arc;
use std::sync::mpsc;

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::backend::{BackendClient, BackendError, ChatReply};
use crate::core::config::Config;

use super::app::App;
use super::constants;
use super::draw::tab_at_row;
use super::shortcuts::Shortcut;

use self::shortcuts::handle_shortcut;

/// A chat request in flight: the chat it came from, its result channel, and its cancel token.
pub struct PendingChat {
    pub chat_id: String,
    pub result_rx: mpsc::Receiver<Result<ChatReply, BackendError>>,
    pub cancel_token: CancellationToken,
}

/// Result of handling an event: continue the loop or exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Break,
}

/// Context for key event handling. Bundles mutable state to reduce parameter count.
pub struct HandleKeyContext<'a> {
    pub app: &'a mut App,
    pub config: &'a Arc<Config>,
    pub client: &'a Arc<BackendClient>,
    pub pending_chat: &'a mut Option<PendingChat>,
    pub rt: &'a Arc<Runtime>,
}

/// True when Esc would start Option+key (escape_pending) rather than cancel a request.
pub(crate) fn would_esc_start_meta_sequence(
    key: &KeyEvent,
    app: &App,
    pending_chat: &Option<PendingChat>,
) -> bool {
    Shortcut::is_escape(key) && app.session_selector.is_none() && pending_chat.is_none()
}

/// Handle a mouse event: wheel scrolls the history, a click on a tab selects it.
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) -> HandleResult {
    if app.session_selector.is_some() {
        return HandleResult::Continue;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(constants::SCROLL_LINES_SMALL),
        MouseEventKind::ScrollDown => app.scroll_down(constants::SCROLL_LINES_SMALL),
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(rect) = app.sidebar_rect else {
                return HandleResult::Continue;
            };
            if mouse.column < rect.x || mouse.column >= rect.x + rect.width {
                return HandleResult::Continue;
            }
            let chats = &app.state.active_session().chats;
            if let Some(idx) = tab_at_row(rect, mouse.row, chats.len()) {
                let chat_id = chats[idx].id.clone();
                if let Err(e) = app.state.select_chat(&chat_id) {
                    log::warn!("Tab click: {}", e);
                }
                app.scroll = Default::default();
            }
        }
        _ => {}
    }
    HandleResult::Continue
}

/// Handle a key event. Returns HandleResult::Break to exit the main loop.
pub fn handle_key(key: KeyEvent, ctx: HandleKeyContext<'_>) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }
    let HandleKeyContext {
        app,
        config,
        client,
        pending_chat,
        rt,
    } = ctx;

    // Session browser takes all keys while open (Ctrl+C still quits).
    if app.session_selector.is_some() {
        if Shortcut::match_key(&key, false) == Some(Shortcut::Quit) {
            return HandleResult::Break;
        }
        session_selector::handle_session_selector(key.code, key.modifiers, app);
        return HandleResult::Continue;
    }

    // Esc+key sequence (Option as Meta on Mac terminals)
    if app.escape_pending {
        app.escape_pending = false;
        if let Some(shortcut) = Shortcut::match_key(&key, true) {
            return handle_shortcut(shortcut, app, config, pending_chat);
        }
    }

    if let Some(shortcut) = Shortcut::match_key(&key, false) {
        return handle_shortcut(shortcut, app, config, pending_chat);
    }

    // Esc: cancel in-flight request, else start Option+key sequence.
    if Shortcut::is_escape(&key) {
        match pending_chat.as_ref() {
            Some(pc) => {
                log::debug!("Cancelling request for chat {}", pc.chat_id);
                pc.cancel_token.cancel();
            }
            None => app.escape_pending = true,
        }
        return HandleResult::Continue;
    }

    input::handle_main_input(key.code, key.modifiers, app, client, pending_chat, rt)
}
