//! Text wrapping for display.

/// Split a message into display lines respecting message newlines, then wrap to `width`.
/// Continuation lines keep the leading indentation of their source line, so wrapped
/// list items stay aligned.
pub(crate) fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in msg.lines() {
        if line.trim().is_empty() || width == 0 {
            out.push(line.to_string());
            continue;
        }
        let indent_len = line.len() - line.trim_start().len();
        let indent = &line[..indent_len];
        let options = textwrap::Options::new(width)
            .subsequent_indent(if indent_len < width / 2 { indent } else { "" })
            .break_words(true);
        out.extend(textwrap::wrap(line, options).into_iter().map(|c| c.into_owned()));
    }
    if msg.ends_with('\n') {
        out.push(String::new());
    }
    out
}
