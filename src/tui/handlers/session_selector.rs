//! Handler for the session browser popup (Alt+H).

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::ListState;

use crate::core::history::{self, filter_sessions};

use super::super::app::{App, ScrollPosition, SessionSelectorState};

/// Action to apply after handling a session browser key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SelectorAction {
    Close,
    Open { id: String },
    Delete { id: String },
    Rename { id: String, new_title: String },
    /// No action; keep the browser open.
    Keep,
}

/// List stored sessions. Listing errors are shown inside the popup.
pub(crate) fn open_session_selector() -> SessionSelectorState {
    let (sessions, error) = match history::list_sessions() {
        Ok(s) => (s, None),
        Err(e) => {
            log::warn!("Could not list sessions: {}", e);
            (vec![], Some(e.to_string()))
        }
    };
    SessionSelectorState {
        sessions,
        selected_index: 0,
        list_state: ListState::default(),
        filter: String::new(),
        renaming: None,
        error,
    }
}

/// Update the selector for a key and return the action to apply.
pub(crate) fn selector_key(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    selector: &mut SessionSelectorState,
) -> SelectorAction {
    let ctrl = key_modifiers.contains(KeyModifiers::CONTROL);

    // When renaming, keys go to the rename input
    if let Some((id, input)) = selector.renaming.as_mut() {
        match key_code {
            KeyCode::Esc => selector.renaming = None,
            KeyCode::Enter => {
                let action = SelectorAction::Rename {
                    id: id.clone(),
                    new_title: input.clone(),
                };
                selector.renaming = None;
                return action;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if !ctrl => input.push(c),
            _ => {}
        }
        return SelectorAction::Keep;
    }

    let selected_id = |selector: &SessionSelectorState| {
        filter_sessions(&selector.sessions, &selector.filter)
            .get(selector.selected_index)
            .map(|m| (m.id.clone(), m.title.clone()))
    };

    match key_code {
        KeyCode::Esc => SelectorAction::Close,
        KeyCode::Enter => match selected_id(selector) {
            Some((id, _)) => SelectorAction::Open { id },
            None => SelectorAction::Keep,
        },
        KeyCode::Char('d') if ctrl => match selected_id(selector) {
            Some((id, _)) => SelectorAction::Delete { id },
            None => SelectorAction::Keep,
        },
        KeyCode::Delete => match selected_id(selector) {
            Some((id, _)) => SelectorAction::Delete { id },
            None => SelectorAction::Keep,
        },
        KeyCode::Char('r') if ctrl => {
            selector.renaming = selected_id(selector);
            SelectorAction::Keep
        }
        KeyCode::Up => {
            selector.selected_index = selector.selected_index.saturating_sub(1);
            SelectorAction::Keep
        }
        KeyCode::Down => {
            let len = filter_sessions(&selector.sessions, &selector.filter).len();
            selector.selected_index = (selector.selected_index + 1).min(len.saturating_sub(1));
            SelectorAction::Keep
        }
        KeyCode::Backspace => {
            selector.filter.pop();
            selector.selected_index = 0;
            SelectorAction::Keep
        }
        KeyCode::Char(c) if !ctrl => {
            selector.filter.push(c);
            selector.selected_index = 0;
            SelectorAction::Keep
        }
        _ => SelectorAction::Keep,
    }
}

/// Handle a key while the browser is open and apply the resulting action.
pub(crate) fn handle_session_selector(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
) {
    let Some(selector) = app.session_selector.as_mut() else {
        return;
    };
    match selector_key(key_code, key_modifiers, selector) {
        SelectorAction::Keep => {}
        SelectorAction::Close => app.session_selector = None,
        SelectorAction::Open { id } => {
            // An open session is switched to, keeping its unsaved changes.
            if app.state.select_session(&id).is_ok() {
                app.scroll = ScrollPosition::Bottom;
                app.session_selector = None;
                return;
            }
            match history::load_session(&id) {
                Some(session) => {
                    app.state.open_session(session);
                    app.clear_dirty(&id);
                    app.scroll = ScrollPosition::Bottom;
                    app.session_selector = None;
                }
                None => selector.error = Some(format!("Could not load session {}", id)),
            }
        }
        SelectorAction::Delete { id } => {
            if let Err(e) = history::delete_session(&id) {
                log::warn!("Could not delete session {}: {}", id, e);
                selector.error = Some(e.to_string());
                return;
            }
            selector.sessions.retain(|s| s.id != id);
            if app.state.sessions().iter().any(|s| s.id == id) {
                // Unsaved changes to a deleted session are dropped with it.
                app.clear_dirty(&id);
                if let Err(e) = app.state.remove_session(&id) {
                    log::warn!("{}", e);
                }
            }
            log::info!("Deleted session {}", id);
        }
        SelectorAction::Rename { id, new_title } => {
            if let Err(e) = history::rename_session(&id, &new_title) {
                selector.error = Some(e.to_string());
                return;
            }
            let title = new_title.trim().to_string();
            if let Some(meta) = selector.sessions.iter_mut().find(|s| s.id == id) {
                meta.title = title.clone();
            }
            if app.state.sessions().iter().any(|s| s.id == id)
                && let Err(e) = app.state.rename_session(&id, &title)
            {
                log::warn!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::SessionMeta;

    fn selector() -> SessionSelectorState {
        let meta = |id: &str, title: &str| SessionMeta {
            id: id.to_string(),
            title: title.to_string(),
            created_at: 0,
            updated_at: 0,
            chat_count: 1,
        };
        SessionSelectorState {
            sessions: vec![meta("a1", "Fourier series"), meta("b2", "Eigenvalues")],
            selected_index: 0,
            list_state: ListState::default(),
            filter: String::new(),
            renaming: None,
            error: None,
        }
    }

    #[test]
    fn opening_an_open_session_switches_to_it() {
        let config = crate::core::config::from_lookup(|_| None).expect("config");
        let mut app = App::new(&config, crate::core::state::SessionKind::Persistent);
        let first = app.state.active_session().id.clone();
        app.state.new_session(crate::core::state::SessionKind::Persistent);
        let chat = app.state.active_chat().id.clone();
        app.state
            .append_message(&chat, crate::core::state::Sender::User, "unsaved")
            .expect("append");
        let mut s = selector();
        s.sessions[0].id = first.clone();
        app.session_selector = Some(s);

        handle_session_selector(KeyCode::Enter, KeyModifiers::empty(), &mut app);

        assert!(app.session_selector.is_none());
        assert_eq!(app.state.active_session().id, first);
        assert_eq!(app.state.sessions().len(), 2);
        assert_eq!(app.state.sessions()[1].message_count(), 1);
    }

    fn press(s: &mut SessionSelectorState, code: KeyCode) -> SelectorAction {
        selector_key(code, KeyModifiers::empty(), s)
    }

    #[test]
    fn filter_then_open() {
        let mut s = selector();
        for c in "eigen".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        assert_eq!(
            press(&mut s, KeyCode::Enter),
            SelectorAction::Open {
                id: "b2".to_string()
            }
        );
    }

    #[test]
    fn navigation_is_clamped() {
        let mut s = selector();
        press(&mut s, KeyCode::Up);
        assert_eq!(s.selected_index, 0);
        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Down);
        assert_eq!(s.selected_index, 1);
    }

    #[test]
    fn ctrl_d_deletes_selected() {
        let mut s = selector();
        press(&mut s, KeyCode::Down);
        assert_eq!(
            selector_key(KeyCode::Char('d'), KeyModifiers::CONTROL, &mut s),
            SelectorAction::Delete {
                id: "b2".to_string()
            }
        );
    }

    #[test]
    fn rename_flow() {
        let mut s = selector();
        selector_key(KeyCode::Char('r'), KeyModifiers::CONTROL, &mut s);
        assert_eq!(
            s.renaming,
            Some(("a1".to_string(), "Fourier series".to_string()))
        );
        for _ in 0.."series".len() {
            press(&mut s, KeyCode::Backspace);
        }
        press(&mut s, KeyCode::Char('!'));
        assert_eq!(
            press(&mut s, KeyCode::Enter),
            SelectorAction::Rename {
                id: "a1".to_string(),
                new_title: "Fourier !".to_string()
            }
        );
        assert!(s.renaming.is_none());
    }

    #[test]
    fn esc_closes_and_empty_list_keeps() {
        let mut s = selector();
        for c in "zzz".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        assert_eq!(press(&mut s, KeyCode::Enter), SelectorAction::Keep);
        assert_eq!(press(&mut s, KeyCode::Esc), SelectorAction::Close);
    }
}
