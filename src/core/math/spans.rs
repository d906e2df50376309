//! Splits text into plain runs and the regions the rewrite passes leave alone.
//!
//! Only ASCII delimiters are ever matched, so every split point is a char boundary.

/// A slice of the input. Protected regions include their delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Region<'a> {
    Text(&'a str),
    /// Fenced block or inline code span.
    Code(&'a str),
    /// `$...$`
    InlineMath(&'a str),
    /// `$$...$$`
    BlockMath(&'a str),
}

impl<'a> Region<'a> {
    pub(super) fn as_str(&self) -> &'a str {
        match *self {
            Region::Text(s) | Region::Code(s) | Region::InlineMath(s) | Region::BlockMath(s) => s,
        }
    }
}

/// Outcome of looking at a delimiter candidate.
enum Step {
    Code(usize),
    InlineMath(usize),
    BlockMath(usize),
    /// Not a region opener; advance by this many bytes.
    Skip(usize),
}

/// Split `text` into regions, in order. Concatenating the regions yields `text`.
pub(super) fn split(text: &str) -> Vec<Region<'_>> {
    let bytes = text.as_bytes();
    let mut regions = Vec::new();
    let mut text_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let step = match bytes[i] {
            b'\\' => Step::Skip(2),
            b'`' => code_region(bytes, i),
            b'$' => math_region(bytes, i),
            _ => Step::Skip(1),
        };
        let end = match step {
            Step::Skip(n) => {
                i += n;
                continue;
            }
            Step::Code(end) | Step::InlineMath(end) | Step::BlockMath(end) => end,
        };
        if text_start < i {
            regions.push(Region::Text(&text[text_start..i]));
        }
        let slice = &text[i..end];
        regions.push(match step {
            Step::Code(_) => Region::Code(slice),
            Step::InlineMath(_) => Region::InlineMath(slice),
            _ => Region::BlockMath(slice),
        });
        i = end;
        text_start = end;
    }
    if text_start < text.len() {
        regions.push(Region::Text(&text[text_start..]));
    }
    regions
}

/// Backtick run at `start`: three or more open a fence (unclosed runs to the end),
/// fewer open an inline span that needs a matching run.
fn code_region(bytes: &[u8], start: usize) -> Step {
    let run = bytes[start..].iter().take_while(|&&b| b == b'`').count();
    let fence = &bytes[start..start + run];
    match find(bytes, start + run, fence) {
        Some(close) => Step::Code(close + run),
        None if run >= 3 => Step::Code(bytes.len()),
        None => Step::Skip(run),
    }
}

/// `$$` pairs with the next unescaped `$$`. A single `$` opens inline math when
/// followed by a non-space that is not a digit, and closes at the next `$` on the
/// same line that is preceded by a non-space and not followed by a digit (so
/// "$5 and $10" stays text). A `$$` met before the closer ends the scan: the
/// block opener wins over the inline one.
fn math_region(bytes: &[u8], start: usize) -> Step {
    if bytes.get(start + 1) == Some(&b'$') {
        return match find_unescaped(bytes, start + 2, b"$$") {
            Some(close) => Step::BlockMath(close + 2),
            None => Step::Skip(2),
        };
    }
    let opens = bytes
        .get(start + 1)
        .is_some_and(|b| !b.is_ascii_whitespace() && !b.is_ascii_digit());
    if !opens {
        return Step::Skip(1);
    }
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => break,
            b'$' if bytes.get(j + 1) == Some(&b'$') => break,
            b'$' => {
                let closes = !bytes[j - 1].is_ascii_whitespace()
                    && !bytes.get(j + 1).is_some_and(|b| b.is_ascii_digit());
                if closes {
                    return Step::InlineMath(j + 1);
                }
                j += 1;
            }
            _ => j += 1,
        }
    }
    Step::Skip(1)
}

fn find(bytes: &[u8], from: usize, pat: &[u8]) -> Option<usize> {
    if pat.is_empty() || from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(pat.len())
        .position(|w| w == pat)
        .map(|p| p + from)
}

fn find_unescaped(bytes: &[u8], from: usize, pat: &[u8]) -> Option<usize> {
    let mut j = from;
    while j + pat.len() <= bytes.len() {
        if bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j..].starts_with(pat) {
            return Some(j);
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{Region, split};

    #[test]
    fn plain_text_is_one_region() {
        assert_eq!(split("hello (world)"), vec![Region::Text("hello (world)")]);
    }

    #[test]
    fn empty_input_has_no_regions() {
        assert!(split("").is_empty());
    }

    #[test]
    fn fenced_code_is_protected() {
        let regions = split("see\n```rust\nlet a = b[0];\n```\ndone");
        assert_eq!(
            regions,
            vec![
                Region::Text("see\n"),
                Region::Code("```rust\nlet a = b[0];\n```"),
                Region::Text("\ndone"),
            ]
        );
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let regions = split("x ```\n[a]");
        assert_eq!(regions, vec![Region::Text("x "), Region::Code("```\n[a]")]);
    }

    #[test]
    fn lone_backtick_is_text() {
        assert_eq!(split("a ` b"), vec![Region::Text("a ` b")]);
    }

    #[test]
    fn inline_and_block_math() {
        let regions = split("a $x^2$ b $$\ny\n$$ c");
        assert_eq!(
            regions,
            vec![
                Region::Text("a "),
                Region::InlineMath("$x^2$"),
                Region::Text(" b "),
                Region::BlockMath("$$\ny\n$$"),
                Region::Text(" c"),
            ]
        );
    }

    #[test]
    fn currency_is_not_math() {
        assert_eq!(
            split("costs $5 and $10 today"),
            vec![Region::Text("costs $5 and $10 today")]
        );
    }

    #[test]
    fn currency_before_block_math_leaves_the_block_intact() {
        assert_eq!(
            split("Cost $5 and $$\nx\n$$"),
            vec![Region::Text("Cost $5 and "), Region::BlockMath("$$\nx\n$$")]
        );
    }

    #[test]
    fn inline_math_does_not_close_on_block_opener() {
        assert_eq!(
            split("$a and $$b$$"),
            vec![Region::Text("$a and "), Region::BlockMath("$$b$$")]
        );
    }

    #[test]
    fn digit_after_dollar_does_not_open() {
        assert_eq!(
            split("Pay $5 for it then $z$"),
            vec![Region::Text("Pay $5 for it then "), Region::InlineMath("$z$")]
        );
    }

    #[test]
    fn escaped_dollar_does_not_open() {
        assert_eq!(split(r"\$x$ y"), vec![Region::Text(r"\$x$ y")]);
    }

    #[test]
    fn unclosed_block_is_text() {
        assert_eq!(split("$$ a"), vec![Region::Text("$$ a")]);
    }

    #[test]
    fn inline_math_stops_at_newline() {
        assert_eq!(split("$a\nb$"), vec![Region::Text("$a\nb$")]);
    }

    #[test]
    fn regions_concatenate_to_input() {
        let input = "é `code` ü $$a$$ (ñ) $b$ \\$ ```x";
        let joined: String = split(input).iter().map(|r| r.as_str()).collect();
        assert_eq!(joined, input);
    }
}
