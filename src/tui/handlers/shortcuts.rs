//! Shortcut key handling (tabs, sessions, provider, copy, quit).

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::math;
use crate::core::persistence;
use crate::tui::shortcuts::Shortcut;

use super::super::app::{App, ScrollPosition};
use super::super::chat_result;
use super::{HandleResult, PendingChat, session_selector};

pub(super) fn handle_shortcut(
    shortcut: Shortcut,
    app: &mut App,
    config: &Arc<Config>,
    pending_chat: &mut Option<PendingChat>,
) -> HandleResult {
    match shortcut {
        Shortcut::Quit => {
            if let Some(pc) = pending_chat.take() {
                pc.cancel_token.cancel();
            }
            return HandleResult::Break;
        }
        Shortcut::Sessions => {
            chat_result::save_all_dirty(app, config);
            app.session_selector = Some(session_selector::open_session_selector());
        }
        Shortcut::NewChat => {
            app.state.new_chat();
            app.scroll = ScrollPosition::Bottom;
        }
        Shortcut::NewSession => {
            let active = app.state.active_session().id.clone();
            chat_result::save_session(app, &active, config);
            app.state.new_session(app.session_kind);
            app.scroll = ScrollPosition::Bottom;
        }
        Shortcut::NextChat | Shortcut::PrevChat => {
            app.state.cycle_chat(shortcut == Shortcut::NextChat);
            app.scroll = ScrollPosition::Bottom;
        }
        Shortcut::CycleProvider => {
            app.cycle_provider();
            if let Err(e) = persistence::save_last_provider(app.provider.as_deref()) {
                log::warn!("Could not remember provider: {}", e);
            }
            let toast = format!("Provider: {}", app.provider_label());
            app.show_toast(toast);
        }
        Shortcut::CopyReply => copy_last_reply(app),
    }
    HandleResult::Continue
}

/// Copy the last assistant reply of the active chat, as displayed (normalized).
fn copy_last_reply(app: &mut App) {
    let Some(reply) = app.state.active_chat().last_assistant_reply() else {
        app.show_toast("Nothing to copy");
        return;
    };
    let text = math::normalize_with(reply, app.policy);
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
        Ok(()) => app.show_toast("Copied"),
        Err(e) => {
            log::warn!("Clipboard unavailable: {}", e);
            app.show_toast("Copy failed");
        }
    }
}
