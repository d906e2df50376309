//! Inline Markdown parsing: **bold**, `code`, [links](url), $math$, headings, lists, tables.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::constants::{ACCENT, MATH};

/// Parse one display line: block prefixes (heading, bullet, numbered list, table row),
/// then inline markup.
pub(crate) fn parse_markdown_inline(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let trimmed = s.trim_start();
    let indent = &s[..s.len() - trimmed.len()];

    if trimmed.starts_with('#') {
        let content = trimmed.trim_start_matches('#').trim_start();
        if !content.is_empty() {
            spans.push(Span::styled(
                content.to_string(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        }
        return spans;
    }
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        if !indent.is_empty() {
            spans.push(Span::raw(indent.to_string()));
        }
        spans.push(Span::styled("• ", Style::default().fg(ACCENT)));
        spans.extend(parse_inline(rest));
        return spans;
    }
    if trimmed.starts_with('|') {
        let cells: Vec<&str> = trimmed
            .split('|')
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if !cells.is_empty() {
            for (i, cell) in cells.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" │ ", Style::default().fg(ACCENT)));
                }
                spans.extend(parse_inline(cell));
            }
            return spans;
        }
    }
    if let Some((num, rest)) = parse_numbered_list_prefix(trimmed) {
        if !indent.is_empty() {
            spans.push(Span::raw(indent.to_string()));
        }
        spans.push(Span::styled(
            format!("{}. ", num),
            Style::default().fg(ACCENT),
        ));
        spans.extend(parse_inline(rest));
        return spans;
    }
    spans.extend(parse_inline(s));
    spans
}

/// Parse "N. " or "N) " at start. Returns (number, rest) or None.
fn parse_numbered_list_prefix(s: &str) -> Option<(&str, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &s[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(|rest| (&s[..digits], rest))
}

fn math_style() -> Style {
    Style::default().fg(MATH).add_modifier(Modifier::ITALIC)
}

/// End (exclusive, byte index into `s`) of the markup element starting at `s[0]`, with
/// its styled spans. `None` when the marker is unpaired and should render as text.
fn parse_element(s: &str) -> Option<(usize, Vec<Span<'static>>)> {
    if let Some(rest) = s.strip_prefix("**") {
        let end = rest.find("**")?;
        let span = Span::styled(
            rest[..end].to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        );
        return Some((end + 4, vec![span]));
    }
    if let Some(rest) = s.strip_prefix("$$") {
        let end = rest.find("$$")?;
        let span = Span::styled(format!("$${}$$", &rest[..end]), math_style());
        return Some((end + 4, vec![span]));
    }
    if let Some(rest) = s.strip_prefix('$') {
        // Same shape as inline math in the normalizer: no space inside the delimiters,
        // no digit after either one ("$5 and $10" stays text), and `$$` is never a closer.
        if rest.starts_with(|c: char| c.is_whitespace() || c.is_ascii_digit()) {
            return None;
        }
        let mut search = 0;
        while let Some(off) = rest[search..].find('$') {
            let close = search + off;
            let before = rest[..close].chars().next_back();
            let after = rest[close + 1..].chars().next();
            if after == Some('$') {
                return None;
            }
            if close > 0
                && before.is_some_and(|c| !c.is_whitespace())
                && !after.is_some_and(|c| c.is_ascii_digit())
            {
                let span = Span::styled(format!("${}$", &rest[..close]), math_style());
                return Some((close + 2, vec![span]));
            }
            search = close + 1;
        }
        return None;
    }
    if let Some(rest) = s.strip_prefix('`') {
        let end = rest.find('`')?;
        let span = Span::styled(rest[..end].to_string(), Style::default().fg(ACCENT));
        return Some((end + 2, vec![span]));
    }
    if let Some(rest) = s.strip_prefix('[') {
        let close = rest.find("](")?;
        let text = &rest[..close];
        let url_len = rest[close + 2..].find(')')?;
        let span = Span::styled(
            text.to_string(),
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::UNDERLINED),
        );
        return Some((1 + close + 2 + url_len + 1, vec![span]));
    }
    None
}

/// Parse **bold**, `code`, [text](url), $math$ and $$math$$ in the rest of a line.
fn parse_inline(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i < s.len() {
        let c = s.as_bytes()[i];
        if matches!(c, b'*' | b'$' | b'`' | b'[')
            && let Some((len, styled)) = parse_element(&s[i..])
        {
            if i > plain_start {
                spans.push(Span::raw(s[plain_start..i].to_string()));
            }
            spans.extend(styled);
            i += len;
            plain_start = i;
            continue;
        }
        // '$$' that did not pair must not be retried as two single '$'.
        i += if s[i..].starts_with("$$") || s[i..].starts_with("**") {
            2
        } else {
            s[i..].chars().next().map_or(1, char::len_utf8)
        };
    }
    if plain_start < s.len() {
        spans.push(Span::raw(s[plain_start..].to_string()));
    }
    spans
}
