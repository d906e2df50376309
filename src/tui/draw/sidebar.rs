//! Sidebar: chat tabs of the active session.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::app::App;
use super::super::constants::{ACCENT, LOGO_THINKING};

pub(crate) fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let session = app.state.active_session();
    let active = session.active_chat_index();
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = session
        .chats
        .iter()
        .enumerate()
        .map(|(i, chat)| {
            let waiting = app.waiting_chat.as_deref() == Some(chat.id.as_str());
            let marker = if waiting { LOGO_THINKING[0] } else { " " };
            let label = format!("{} {} ({})", marker, chat.title, chat.messages.len());
            let label: String = label.chars().take(inner_width).collect();
            if i == active {
                Line::from(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Black)
                        .bg(ACCENT)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(label, Style::default().fg(Color::Gray)))
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chats ");
    f.render_widget(Paragraph::new(lines).block(block), area);
    app.sidebar_rect = Some(area);
}

/// Chat index for a click at `row` inside the sidebar, if it hits a tab.
pub(crate) fn tab_at_row(area: Rect, row: u16, tab_count: usize) -> Option<usize> {
    let first = area.y + 1;
    if row < first || row >= area.y + area.height.saturating_sub(1) {
        return None;
    }
    let idx = (row - first) as usize;
    (idx < tab_count).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::tab_at_row;
    use ratatui::layout::Rect;

    #[test]
    fn tab_at_row_skips_borders() {
        let area = Rect::new(0, 2, 20, 10);
        assert_eq!(tab_at_row(area, 2, 3), None);
        assert_eq!(tab_at_row(area, 3, 3), Some(0));
        assert_eq!(tab_at_row(area, 5, 3), Some(2));
        assert_eq!(tab_at_row(area, 6, 3), None);
        assert_eq!(tab_at_row(area, 11, 20), None);
    }
}
