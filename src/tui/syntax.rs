//! Syntax highlighting for fenced code blocks using syntect.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use super::constants::ACCENT_SECONDARY;

const THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    let ts = THEME_SET.get_or_init(ThemeSet::load_defaults);
    ts.themes.get(THEME).or_else(|| ts.themes.values().next())
}

/// Convert a syntect style to ratatui. Transparent colours fall back to the plain code colour.
fn translate_style(s: syntect::highlighting::Style) -> Style {
    let fg = s.foreground;
    let mut style = Style::default().fg(if fg.a > 0 {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        ACCENT_SECONDARY
    });
    if s.font_style.contains(FontStyle::BOLD) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if s.font_style.contains(FontStyle::ITALIC) {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if s.font_style.contains(FontStyle::UNDERLINE) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Map a fence language tag (e.g. "rust", "py", "latex") to a syntax.
fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    let lang = lang.trim().to_lowercase();
    if lang.is_empty() {
        return None;
    }
    let ps = syntax_set();
    let ext = match lang.as_str() {
        "rust" => "rs",
        "python" => "py",
        "javascript" => "js",
        "typescript" => "ts",
        "golang" => "go",
        "ruby" => "rb",
        "bash" | "zsh" | "shell" => "sh",
        "yml" => "yaml",
        "markdown" => "md",
        "latex" => "tex",
        "c++" => "cpp",
        other => other,
    };
    ps.find_syntax_by_extension(ext)
        .or_else(|| ps.find_syntax_by_token(&lang))
}

fn plain(line: &str) -> Vec<Span<'static>> {
    vec![Span::styled(
        line.to_string(),
        Style::default().fg(ACCENT_SECONDARY),
    )]
}

/// Highlight a code block line by line, keeping parser state across lines.
/// Unknown languages and highlighting errors give plain-coloured lines.
pub(super) fn highlight_code(lang: &str, code: &str) -> Vec<Vec<Span<'static>>> {
    let (Some(syntax), Some(theme)) = (find_syntax(lang), theme()) else {
        return code.split('\n').map(plain).collect();
    };
    let mut h = HighlightLines::new(syntax, theme);
    code.split('\n')
        .map(|line| {
            let with_newline = format!("{}\n", line);
            match h.highlight_line(&with_newline, syntax_set()) {
                Ok(regions) => regions
                    .into_iter()
                    .map(|(style, text)| (style, text.trim_end_matches('\n')))
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(style, text)| Span::styled(text.to_string(), translate_style(style)))
                    .collect(),
                Err(e) => {
                    log::debug!("Highlighting {} failed: {}", lang, e);
                    plain(line)
                }
            }
        })
        .collect()
}

/// Split a styled line into chunks of at most `width` chars, keeping each span's style.
pub(super) fn chunk_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut chunks = vec![Vec::new()];
    let mut used = 0;
    for span in spans {
        let mut rest: &str = span.content.as_ref();
        while !rest.is_empty() {
            if used == width {
                chunks.push(Vec::new());
                used = 0;
            }
            let take = rest
                .char_indices()
                .nth(width - used)
                .map_or(rest.len(), |(i, _)| i);
            let (head, tail) = rest.split_at(take);
            used += head.chars().count();
            if let Some(chunk) = chunks.last_mut() {
                chunk.push(Span::styled(head.to_string(), span.style));
            }
            rest = tail;
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span<'static>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn unknown_language_is_plain() {
        let lines = highlight_code("nosuchlang", "a = 1\nb = 2");
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "a = 1");
        assert_eq!(lines[1][0].style.fg, Some(ACCENT_SECONDARY));
    }

    #[test]
    fn known_language_keeps_text() {
        let lines = highlight_code("rust", "fn main() {\n    let x = 1;\n}");
        assert_eq!(lines.len(), 3);
        assert_eq!(text(&lines[1]), "    let x = 1;");
        assert!(lines[0].len() > 1);
    }

    #[test]
    fn chunk_spans_splits_across_spans() {
        let spans = vec![
            Span::raw("abcd".to_string()),
            Span::styled("éfgh".to_string(), Style::default().fg(Color::Red)),
        ];
        let chunks = chunk_spans(&spans, 3);
        let texts: Vec<String> = chunks.iter().map(|c| text(c)).collect();
        assert_eq!(texts, ["abc", "déf", "gh"]);
        assert_eq!(chunks[1][1].style.fg, Some(Color::Red));
    }

    #[test]
    fn chunk_spans_empty_line_is_one_chunk() {
        assert_eq!(chunk_spans(&[], 10).len(), 1);
    }
}
