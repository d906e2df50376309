//! Session browser popup (Alt+H).

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use crate::core::cli::format_timestamp;
use crate::core::history::{SessionMeta, filter_sessions};

use super::super::app::SessionSelectorState;
use super::super::constants::ACCENT;

fn format_session(meta: &SessionMeta) -> String {
    format!(
        "{}  ·  {} chat(s)  ·  {}",
        meta.title,
        meta.chat_count,
        format_timestamp(meta.updated_at)
    )
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [row] = vertical.areas(area);
    let [popup] = horizontal.areas(row);
    popup
}

fn boxed(content: Line<'_>, border: Color) -> Paragraph<'_> {
    Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .style(Style::default().fg(Color::White))
}

fn hint(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in pairs {
        spans.push(Span::styled(*key, Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(*action));
    }
    Line::from(spans)
}

pub(crate) fn draw_session_popup(f: &mut Frame, area: Rect, selector: &mut SessionSelectorState) {
    let popup_rect = popup_area(area, 70, 60);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Sessions (Alt+H) ");
    let inner = block.inner(popup_rect);
    f.render_widget(Clear, popup_rect);
    f.render_widget(block, popup_rect);

    let [filter_area, rename_area, list_area, hint_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(if selector.renaming.is_some() { 3 } else { 0 }),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    let filter_content = if selector.filter.is_empty() {
        Span::styled("Filter... ", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(selector.filter.as_str())
    };
    f.render_widget(boxed(Line::from(filter_content), Color::DarkGray), filter_area);

    if let Some((_, input)) = &selector.renaming {
        let line = Line::from(vec![
            Span::styled("Rename to: ", Style::default().fg(Color::DarkGray)),
            Span::raw(input.as_str()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(boxed(line, ACCENT), rename_area);
    }

    let filtered = filter_sessions(&selector.sessions, &selector.filter);
    selector.selected_index = selector
        .selected_index
        .min(filtered.len().saturating_sub(1));

    if let Some(ref err) = selector.error {
        let para = Paragraph::new(Line::from(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red),
        )));
        f.render_widget(para, list_area);
    } else if filtered.is_empty() {
        let msg = if selector.filter.is_empty() {
            "No saved sessions yet"
        } else {
            "No sessions match filter"
        };
        let para = Paragraph::new(Line::from(Span::styled(
            msg,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(para, list_area);
    } else {
        let items: Vec<ListItem> = filtered
            .iter()
            .map(|meta| ListItem::new(format!(" {} ", format_session(meta))))
            .collect();
        selector.list_state.select(Some(selector.selected_index));
        let list = List::new(items).highlight_style(Style::default().fg(Color::Black).bg(ACCENT));
        f.render_stateful_widget(list, list_area, &mut selector.list_state);
    }

    let hint_line = if selector.renaming.is_some() {
        hint(&[("Enter ", "confirm  "), ("Esc ", "cancel")])
    } else {
        hint(&[
            ("↑↓ ", "select  "),
            ("Enter ", "open  "),
            ("Ctrl+R ", "rename  "),
            ("Ctrl+D ", "delete  "),
            ("Esc ", "close"),
        ])
    };
    f.render_widget(Paragraph::new(hint_line), hint_area);
}
