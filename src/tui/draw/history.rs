//! Chat history: message blocks of the active chat, code blocks, and scrollbar.

use chrono::TimeZone;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::core::math;
use crate::core::state::Sender;

use super::super::app::App;
use super::super::constants::{ACCENT, ACCENT_SECONDARY};
use super::super::syntax::{chunk_spans, highlight_code};
use super::super::text::{
    MessageSegment, parse_markdown_inline, parse_message_segments, wrap_message,
};

fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat_n(c, n).collect()
}

struct MessageBlockParams<'a> {
    label: &'a str,
    content: &'a str,
    content_width: usize,
    wrap_width: usize,
    is_error: bool,
    is_user: bool,
    timestamp: Option<u64>,
}

fn format_time(unix_secs: u64) -> Option<String> {
    chrono::Local
        .timestamp_opt(unix_secs as i64, 0)
        .single()
        .map(|t| t.format("%H:%M").to_string())
}

/// Add a message block with borders, highlighted code blocks, and separator.
fn add_message_block(lines: &mut Vec<Line<'static>>, p: MessageBlockParams<'_>) {
    let border_style = Style::default().fg(if p.is_user {
        Color::DarkGray
    } else {
        ACCENT_SECONDARY
    });
    let code_inner_width = p.content_width.saturating_sub(2);

    // "┌─ Label ───...──┐" or "┌─ Label 14:32 ───...──┐"
    let top_label = match p.timestamp.and_then(format_time) {
        Some(time) => format!("┌─ {} {} ", p.label, time),
        None => format!("┌─ {} ", p.label),
    };
    let top_trail_len = p.wrap_width.saturating_sub(top_label.chars().count() + 1);
    lines.push(Line::from(Span::styled(
        format!("{}{}┐", top_label, repeat_char('─', top_trail_len)),
        border_style,
    )));

    for segment in parse_message_segments(p.content) {
        match segment {
            MessageSegment::Text(text) => {
                let trimmed = text.trim_matches('\n');
                if trimmed.trim().is_empty() {
                    continue;
                }
                for chunk in wrap_message(trimmed, p.content_width) {
                    let mut spans = vec![Span::styled("│   ", border_style)];
                    if p.is_error {
                        spans.push(Span::styled(chunk, Style::default().fg(Color::Red)));
                    } else if p.is_user {
                        spans.push(Span::raw(chunk));
                    } else {
                        spans.extend(parse_markdown_inline(&chunk));
                    }
                    lines.push(Line::from(spans));
                }
            }
            MessageSegment::CodeBlock { lang, code } => {
                let code_style = Style::default().fg(ACCENT_SECONDARY);
                let header = format!("┌─ {} ", if lang.is_empty() { "code" } else { lang });
                let trail = code_inner_width.saturating_sub(header.chars().count() + 1);
                lines.push(Line::from(vec![
                    Span::styled("│ ", border_style),
                    Span::styled(format!("{}{}┐", header, repeat_char('─', trail)), code_style),
                ]));
                for code_line in highlight_code(lang, code) {
                    for chunk in chunk_spans(&code_line, code_inner_width.saturating_sub(2)) {
                        let mut spans = vec![
                            Span::styled("│ ", border_style),
                            Span::styled("│ ", code_style),
                        ];
                        spans.extend(chunk);
                        lines.push(Line::from(spans));
                    }
                }
                lines.push(Line::from(vec![
                    Span::styled("│ ", border_style),
                    Span::styled(
                        format!("└{}┘", repeat_char('─', code_inner_width.saturating_sub(2))),
                        code_style,
                    ),
                ]));
            }
        }
    }

    lines.push(Line::from(Span::styled(
        format!("└{}┘", repeat_char('─', p.wrap_width.saturating_sub(2))),
        border_style,
    )));
    lines.push(Line::from(""));
}

fn welcome_lines(app: &App) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Ask anything. Formulas in replies are shown as $…$ and $$…$$.",
            Style::default().fg(ACCENT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Math policy: {}   Provider: {}",
                app.policy,
                app.provider_label()
            ),
            dim,
        )),
    ]
}

pub(crate) fn draw_history(f: &mut Frame, app: &mut App, history_area: Rect) {
    let history_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(history_area);
    let text_area = history_chunks[0];
    let scrollbar_area = history_chunks[1];
    let wrap_width = text_area.width as usize;
    let content_width = wrap_width.saturating_sub(6).max(1);

    let chat = app.state.active_chat();
    let mut lines: Vec<Line<'static>> = Vec::new();
    if chat.messages.is_empty() && !app.active_chat_waiting() {
        lines = welcome_lines(app);
    }
    for msg in &chat.messages {
        let timestamp = msg.timestamp.filter(|_| app.show_timestamps);
        match msg.sender {
            Sender::User => add_message_block(
                &mut lines,
                MessageBlockParams {
                    label: "You",
                    content: &msg.content,
                    content_width,
                    wrap_width,
                    is_error: false,
                    is_user: true,
                    timestamp,
                },
            ),
            Sender::Assistant => {
                let content = math::normalize_with(&msg.content, app.policy);
                add_message_block(
                    &mut lines,
                    MessageBlockParams {
                        label: "Assistant",
                        content: &content,
                        content_width,
                        wrap_width,
                        is_error: msg.content.starts_with("**Error:**"),
                        is_user: false,
                        timestamp,
                    },
                )
            }
        }
    }
    if app.active_chat_waiting() {
        lines.push(Line::from(Span::styled(
            "  Thinking... (Esc to cancel)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len();
    let visible = text_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible.max(1));
    app.last_max_scroll = max_scroll;
    let scroll_pos = app.scroll_line();
    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll_pos).take(visible).collect();

    f.render_widget(Paragraph::new(visible_lines), text_area);

    let mut scrollbar_state = ScrollbarState::default()
        .position(scroll_pos)
        .content_length(max_scroll);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_symbol("█")
        .thumb_style(Style::default().fg(ACCENT_SECONDARY))
        .track_symbol(Some("│"));
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}
