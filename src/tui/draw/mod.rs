//! TUI rendering: layout and widgets for the chat interface.

mod header;
mod history;
mod input;
mod session_popup;
mod sidebar;

pub(crate) use sidebar::tab_at_row;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app::App;
use super::constants::{ACCENT, INPUT_LINES, SIDEBAR_WIDTH};

const HEADER_HEIGHT: u16 = 2;
const BOTTOM_BAR_HEIGHT: u16 = 2;

pub(super) fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(INPUT_LINES),
            Constraint::Length(BOTTOM_BAR_HEIGHT),
        ])
        .split(area);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(chunks[1]);

    header::draw_header(f, app, chunks[0]);
    sidebar::draw_sidebar(f, app, body[0]);
    history::draw_history(f, app, body[1]);
    input::draw_input(f, app, chunks[2]);
    input::draw_bottom_bar(f, app, chunks[3]);

    if let Some(ref mut selector) = app.session_selector {
        session_popup::draw_session_popup(f, area, selector);
    }

    // Toast: top right, below header. Opaque background so it's visible over history.
    if let Some(text) = app.active_toast() {
        let toast_text = format!(" {} ", text);
        let toast_width = toast_text.chars().count() as u16 + 2;
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(toast_width).saturating_sub(1),
            y: area.y + HEADER_HEIGHT,
            width: toast_width.min(area.width),
            height: 3u16.min(area.height),
        };
        f.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .style(Style::default().bg(Color::Black));
        let para = Paragraph::new(Line::from(toast_text))
            .block(block)
            .style(Style::default().fg(ACCENT).bg(Color::Black));
        f.render_widget(para, toast_area);
    }
}
