//! TUI application state: chat state, input, scroll, popups, toasts.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::core::config::Config;
use crate::core::history::SessionMeta;
use crate::core::math::MathPolicy;
use crate::core::state::{ChatState, SessionKind};

use super::constants::{PROVIDERS, TOAST_SECS};

/// State for the session browser popup (Alt+H).
pub struct SessionSelectorState {
    pub sessions: Vec<SessionMeta>,
    pub selected_index: usize,
    pub list_state: ListState,
    pub filter: String,
    /// When renaming: (session_id, new_title_input).
    pub renaming: Option<(String, String)>,
    /// Error listing sessions or from delete/rename.
    pub error: Option<String>,
}

/// Scroll position: either a specific line index, or "at bottom" (follow new content).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPosition {
    Line(usize),
    Bottom,
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self::Bottom
    }
}

pub struct App {
    pub(crate) state: ChatState,
    /// Kind of sessions created with Ctrl+T.
    pub(crate) session_kind: SessionKind,
    /// User input in the text field.
    pub(crate) input: String,
    /// Cursor position in the input (byte index, always on a char boundary).
    pub(crate) input_cursor: usize,
    pub(crate) scroll: ScrollPosition,
    pub(crate) last_max_scroll: usize,
    /// Provider sent with each prompt; `None` = backend default.
    pub(crate) provider: Option<String>,
    pub(crate) policy: MathPolicy,
    pub(crate) show_timestamps: bool,
    pub(crate) session_selector: Option<SessionSelectorState>,
    /// Chat id of the request in flight.
    pub(crate) waiting_chat: Option<String>,
    /// Esc was pressed; next key = Option+key (Mac terminals with "Use option as meta").
    pub(crate) escape_pending: bool,
    /// Sidebar rect from last draw; for click hit testing.
    pub(crate) sidebar_rect: Option<Rect>,
    toast: Option<(String, Instant)>,
    /// Sessions with changes not yet written.
    dirty: HashSet<String>,
}

impl App {
    pub fn new(config: &Config, session_kind: SessionKind) -> Self {
        Self {
            state: ChatState::new(config.user_id.clone(), session_kind),
            session_kind,
            input: String::new(),
            input_cursor: 0,
            scroll: ScrollPosition::default(),
            last_max_scroll: 0,
            provider: config.provider.clone(),
            policy: config.math_policy,
            show_timestamps: config.show_timestamps,
            session_selector: None,
            waiting_chat: None,
            escape_pending: false,
            sidebar_rect: None,
            toast: None,
            dirty: HashSet::new(),
        }
    }

    pub(crate) fn is_waiting(&self) -> bool {
        self.waiting_chat.is_some()
    }

    /// True while the active chat has a request in flight.
    pub(crate) fn active_chat_waiting(&self) -> bool {
        self.waiting_chat.as_deref() == Some(self.state.active_chat().id.as_str())
    }

    pub(crate) fn is_dirty(&self, session_id: &str) -> bool {
        self.dirty.contains(session_id)
    }

    pub(crate) fn mark_dirty(&mut self, session_id: &str) {
        self.dirty.insert(session_id.to_string());
    }

    pub(crate) fn clear_dirty(&mut self, session_id: &str) {
        self.dirty.remove(session_id);
    }

    pub(crate) fn dirty_sessions(&self) -> Vec<String> {
        self.dirty.iter().cloned().collect()
    }

    pub(crate) fn show_toast(&mut self, text: impl Into<String>) {
        self.toast = Some((
            text.into(),
            Instant::now() + Duration::from_secs(TOAST_SECS),
        ));
    }

    /// Current toast text; expired toasts are dropped.
    pub(crate) fn active_toast(&mut self) -> Option<&str> {
        if self.toast.as_ref().is_some_and(|(_, until)| *until <= Instant::now()) {
            self.toast = None;
        }
        self.toast.as_ref().map(|(text, _)| text.as_str())
    }

    /// Next provider in the cycle: default, then each of [`PROVIDERS`]. Unknown
    /// providers (from the environment) restart the cycle.
    pub(crate) fn cycle_provider(&mut self) {
        let next = match self.provider.as_deref() {
            None => PROVIDERS.first(),
            Some(current) => PROVIDERS
                .iter()
                .position(|p| *p == current)
                .and_then(|i| PROVIDERS.get(i + 1)),
        };
        self.provider = next.map(|p| p.to_string());
    }

    pub(crate) fn provider_label(&self) -> &str {
        self.provider.as_deref().unwrap_or("default")
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        self.input.insert(self.input_cursor, c);
        self.input_cursor += c.len_utf8();
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.input.replace_range(prev..self.input_cursor, "");
            self.input_cursor = prev;
        }
    }

    pub(crate) fn delete_forward(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.input.replace_range(self.input_cursor..next, "");
        }
    }

    pub(crate) fn cursor_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.input_cursor = prev;
        }
    }

    pub(crate) fn cursor_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.input_cursor = next;
        }
    }

    pub(crate) fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub(crate) fn cursor_end(&mut self) {
        self.input_cursor = self.input.len();
    }

    /// Take the trimmed input, clearing the field. `None` when blank (input is kept).
    pub(crate) fn take_input(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input.clear();
        self.input_cursor = 0;
        Some(text)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.input[..self.input_cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.input[self.input_cursor..]
            .chars()
            .next()
            .map(|c| self.input_cursor + c.len_utf8())
    }

    /// Must be called before scroll_up/scroll_down when at bottom.
    pub(crate) fn materialize_scroll(&mut self) {
        if self.scroll == ScrollPosition::Bottom {
            self.scroll = ScrollPosition::Line(self.last_max_scroll);
        }
    }

    pub(crate) fn scroll_down(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            let pos = (pos + n).min(self.last_max_scroll);
            self.scroll = if pos == self.last_max_scroll {
                ScrollPosition::Bottom
            } else {
                ScrollPosition::Line(pos)
            };
        }
    }

    pub(crate) fn scroll_up(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line(pos.saturating_sub(n));
        }
    }

    /// Resolve scroll position to a concrete line index.
    pub(crate) fn scroll_line(&self) -> usize {
        match self.scroll {
            ScrollPosition::Line(n) => n.min(self.last_max_scroll),
            ScrollPosition::Bottom => self.last_max_scroll,
        }
    }
}
