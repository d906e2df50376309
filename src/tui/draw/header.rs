//! Header: logo/spinner, session title with dirty marker, provider, math policy.

use std::sync::OnceLock;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::SessionKind;

use super::super::app::App;
use super::super::constants::{ACCENT, ACCENT_SECONDARY, LOGO_IDLE, LOGO_THINKING};

/// Start time for header animation phase (thinking spinner).
static HEADER_START: OnceLock<Instant> = OnceLock::new();

const RIGHT_WIDTH: u16 = 34;

/// Session title for the header. " *" marks unsaved changes; ephemeral sessions say so.
pub(crate) fn title_text(app: &App) -> String {
    let session = app.state.active_session();
    let mut title = session.title.clone();
    if session.kind == SessionKind::Ephemeral {
        title.push_str(" (ephemeral)");
    } else if app.is_dirty(&session.id) {
        title.push_str(" *");
    }
    title
}

pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(0),
            Constraint::Length(RIGHT_WIDTH),
        ])
        .split(area);

    let logo_symbol = if app.is_waiting() {
        let start = HEADER_START.get_or_init(Instant::now);
        let frame = (start.elapsed().as_millis() as usize / 80) % LOGO_THINKING.len();
        LOGO_THINKING[frame]
    } else {
        LOGO_IDLE
    };
    let logo_line = Line::from(vec![
        Span::styled(format!("{} ", logo_symbol), Style::default().fg(ACCENT)),
        Span::styled(
            crate::core::app::NAME,
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(logo_line), chunks[0]);

    let title = Line::from(Span::styled(
        title_text(app),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(
        Paragraph::new(title).alignment(Alignment::Center),
        chunks[1],
    );

    let right = Line::from(vec![
        Span::styled("provider ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.provider_label(), Style::default().fg(ACCENT_SECONDARY)),
        Span::styled("  math ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.policy.to_string(), Style::default().fg(ACCENT_SECONDARY)),
    ]);
    f.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        chunks[2],
    );
}
