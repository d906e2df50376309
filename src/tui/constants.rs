//! TUI constants: colors, timing, and providers.

use ratatui::style::Color;

/// Accent green color (#98FB98).
pub(super) const ACCENT: Color = Color::Rgb(152, 251, 152);

/// Secondary accent, soft cyan (#7EC8E3).
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(126, 200, 227);

/// Math spans ($…$, $$…$$) in assistant replies.
pub(super) const MATH: Color = Color::Rgb(255, 203, 107);

/// Providers cycled with Alt+P, after the backend default.
pub(crate) const PROVIDERS: &[&str] = &["openai", "gemini", "anthropic"];

/// Event poll timeout in milliseconds (main loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Max wait for the key following Esc (Option as Meta on Mac terminals).
pub(crate) const ESC_SEQUENCE_DRAIN_MS: u64 = 150;

/// Scroll amount for arrow keys and mouse wheel.
pub(crate) const SCROLL_LINES_SMALL: usize = 3;

/// Scroll amount for PageUp/PageDown.
pub(crate) const SCROLL_LINES_PAGE: usize = 10;

/// Input textarea height (including borders).
pub(crate) const INPUT_LINES: u16 = 5;

/// Width of the chat tab sidebar.
pub(crate) const SIDEBAR_WIDTH: u16 = 22;

/// How long toasts stay visible.
pub(crate) const TOAST_SECS: u64 = 2;

/// Minimalist logo when idle (single character).
pub(super) const LOGO_IDLE: &str = "∑";

/// Spinner frames while waiting for a reply (braille pattern, 4 frames).
pub(super) const LOGO_THINKING: &[&str] = &["⠋", "⠙", "⠹", "⠸"];
