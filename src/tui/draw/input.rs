//! Prompt box and bottom bar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::app::App;
use super::super::constants::ACCENT;
use super::super::shortcuts::labels;

/// Cursor (row, col) in the input, counting explicit newlines only.
fn cursor_row_col(input: &str, cursor: usize) -> (usize, usize) {
    let before = &input[..cursor.min(input.len())];
    let row = before.matches('\n').count();
    let col = before
        .rsplit('\n')
        .next()
        .map_or(0, |line| line.chars().count());
    (row, col)
}

pub(crate) fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let has_focus = app.session_selector.is_none();
    let border_style = Style::default().fg(if has_focus { ACCENT } else { Color::DarkGray });
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", app.state.active_chat().title));
    let inner = block.inner(area);

    let lines: Vec<Line> = if app.input.is_empty() {
        vec![Line::from(Span::styled(
            "Ask anything... ",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.input.split('\n').map(Line::from).collect()
    };

    let (row, col) = cursor_row_col(&app.input, app.input_cursor);
    let inner_height = inner.height.max(1) as usize;
    let inner_width = inner.width.max(1) as usize;
    let scroll_y = row.saturating_sub(inner_height - 1);
    let scroll_x = col.saturating_sub(inner_width - 1);

    let para = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::White))
        .scroll((scroll_y as u16, scroll_x as u16));
    f.render_widget(para, area);

    if has_focus {
        let cx = inner.x + (col - scroll_x) as u16;
        let cy = inner.y + (row - scroll_y) as u16;
        f.set_cursor_position(Position::new(cx, cy));
    }
}

/// Bottom bar: session count and data location on the left, shortcuts on the right.
pub(crate) fn draw_bottom_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Min(72)])
        .split(area);

    let open = app.state.sessions().len();
    let status = Line::from(Span::styled(
        format!("{} open session(s)", open),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Left),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(labels::bottom_bar(app.is_waiting())).alignment(Alignment::Right),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::cursor_row_col;

    #[test]
    fn cursor_row_col_counts_lines_and_chars() {
        assert_eq!(cursor_row_col("", 0), (0, 0));
        assert_eq!(cursor_row_col("abc", 2), (0, 2));
        assert_eq!(cursor_row_col("ab\ncdé", 7), (1, 3));
        assert_eq!(cursor_row_col("ab\n", 3), (1, 0));
    }
}
