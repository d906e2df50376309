//! Centralized keyboard shortcuts.
//!
//! Complete reference:
//!
//! | Action          | Keys                                   |
//! |-----------------|----------------------------------------|
//! | Send            | Enter                                  |
//! | Newline         | Shift+Enter, Alt+Enter                 |
//! | Scroll          | ↑ ↓ PageUp PageDown, mouse wheel       |
//! | New chat tab    | Ctrl+N                                 |
//! | New session     | Ctrl+T                                 |
//! | Next/prev tab   | Tab / Shift+Tab                        |
//! | Provider        | Alt+P, Esc+p (Option as meta)          |
//! | Session browser | Alt+H, Esc+h, Mac chars                |
//! | Copy reply      | Alt+Y, Esc+y                           |
//! | Cancel request  | Esc                                    |
//! | Quit            | Ctrl+C                                 |
//!
//! On macOS, Option+key can send:
//! - Esc+key if terminal has "Use option as meta key" enabled
//! - A special character (˙ for Option+H) if Option is in normal mode. Only Option+H is
//!   mapped: other Option characters (π, ¥, ħ) are legitimate input here.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Detected shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Session browser (Alt+H, Esc+h)
    Sessions,
    /// New chat tab in the active session (Ctrl+N)
    NewChat,
    /// New session (Ctrl+T)
    NewSession,
    /// Next chat tab (Tab)
    NextChat,
    /// Previous chat tab (Shift+Tab)
    PrevChat,
    /// Cycle provider (Alt+P, Esc+p)
    CycleProvider,
    /// Copy the last assistant reply (Alt+Y, Esc+y)
    CopyReply,
    /// Quit (Ctrl+C)
    Quit,
}

/// Characters produced by Option+H on Mac (Option not configured as Meta): Ì, ˙.
const MAC_OPTION_H: &[char] = &['\u{00CC}', '\u{02D9}'];

impl Shortcut {
    /// Returns the shortcut if the key matches. Handles Esc+key sequence when terminal
    /// sends Option as Meta (e.g. macOS "Use option as meta key").
    pub fn match_key(key: &KeyEvent, escape_pending: bool) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if escape_pending {
            return match key.code {
                KeyCode::Char('h') => Some(Shortcut::Sessions),
                KeyCode::Char('p') => Some(Shortcut::CycleProvider),
                KeyCode::Char('y') => Some(Shortcut::CopyReply),
                _ => None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Shortcut::Quit),
            KeyCode::Char('n') if ctrl => Some(Shortcut::NewChat),
            KeyCode::Char('t') if ctrl => Some(Shortcut::NewSession),
            KeyCode::Char('h') if alt => Some(Shortcut::Sessions),
            KeyCode::Char('p') if alt => Some(Shortcut::CycleProvider),
            KeyCode::Char('y') if alt => Some(Shortcut::CopyReply),
            KeyCode::BackTab => Some(Shortcut::PrevChat),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Shortcut::PrevChat)
            }
            KeyCode::Tab => Some(Shortcut::NextChat),
            KeyCode::Char(c) if MAC_OPTION_H.contains(&c) => Some(Shortcut::Sessions),
            _ => None,
        }
    }

    /// True if key is Escape (cancel, or start of Option+key sequence on some terminals).
    pub fn is_escape(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press && key.code == KeyCode::Esc
    }
}


/// Labels for the bottom bar (2 lines for readability on narrow terminals).
pub mod labels {
    use ratatui::style::Color;
    use ratatui::text::{Line, Span, Text};

    const DIM: Color = Color::DarkGray;

    pub fn bottom_bar(is_waiting: bool) -> Text<'static> {
        if is_waiting {
            Text::from(vec![
                Line::from(vec![
                    Span::styled("Esc ", Color::Yellow),
                    Span::raw("cancel"),
                    Span::styled("  ↑↓ ", DIM),
                    Span::raw("scroll"),
                ]),
                Line::from(vec![
                    Span::styled("Ctrl+N ", DIM),
                    Span::raw("new chat"),
                    Span::styled("  Tab ", DIM),
                    Span::raw("switch tab"),
                    Span::styled("  Ctrl+C ", DIM),
                    Span::raw("quit"),
                ]),
            ])
        } else {
            Text::from(vec![
                Line::from(vec![
                    Span::styled("Enter ", DIM),
                    Span::raw("send"),
                    Span::styled("  Shift/Alt+Enter ", DIM),
                    Span::raw("newline"),
                    Span::styled("  ↑↓ ", DIM),
                    Span::raw("scroll"),
                    Span::styled("  Tab ", DIM),
                    Span::raw("switch tab"),
                ]),
                Line::from(vec![
                    Span::styled("Ctrl+N ", DIM),
                    Span::raw("new chat"),
                    Span::styled("  Ctrl+T ", DIM),
                    Span::raw("new session"),
                    Span::styled("  Alt+H ", DIM),
                    Span::raw("sessions"),
                    Span::styled("  Alt+P ", DIM),
                    Span::raw("provider"),
                    Span::styled("  Alt+Y ", DIM),
                    Span::raw("copy"),
                    Span::styled("  Ctrl+C ", DIM),
                    Span::raw("quit"),
                ]),
            ])
        }
    }
}
