//! The three rewrite passes. Each pass re-splits its input so spans produced by
//! an earlier pass are protected from the later ones.

use std::sync::LazyLock;

use regex::Regex;

use super::MathPolicy;
use super::spans::{self, Region};

/// `[ ... ]` with optional escaping backslashes on either side. Lazy, so the
/// first closing bracket wins.
static BRACKET_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\?\[(.+?)\\?\]").expect("bracket pattern is valid"));

/// `( ... )` with optional escaping backslashes on either side.
static PAREN_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\?\((.+?)\\?\)").expect("paren pattern is valid"));

/// Characters that mark a parenthesized span as math under the strict policy.
const MATH_MARKERS: [char; 4] = ['=', '^', '_', '\\'];

/// Rewrite bracket spans in plain text to `$$...$$`.
pub(super) fn convert_brackets(text: &str, policy: MathPolicy) -> String {
    rewrite_text_regions(text, |t, out| rewrite_brackets(t, policy, out))
}

/// Rewrite paren spans in plain text to `$...$`.
pub(super) fn convert_parens(text: &str, policy: MathPolicy) -> String {
    rewrite_text_regions(text, |t, out| rewrite_parens(t, policy, out))
}

/// Replace line breaks inside every `$$...$$` region with single spaces.
pub(super) fn fold_block_math(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for region in spans::split(text) {
        match region {
            Region::BlockMath(s) => out.push_str(&fold_line_breaks(s)),
            other => out.push_str(other.as_str()),
        }
    }
    out
}

fn fold_line_breaks(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn rewrite_text_regions(text: &str, mut rewrite: impl FnMut(&str, &mut String)) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for region in spans::split(text) {
        match region {
            Region::Text(t) => rewrite(t, &mut out),
            other => out.push_str(other.as_str()),
        }
    }
    out
}

fn rewrite_brackets(text: &str, policy: MathPolicy, out: &mut String) {
    let mut copied = 0;
    let mut pos = 0;
    while let Some(caps) = BRACKET_SPAN.captures_at(text, pos) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        pos = whole.end();
        if policy == MathPolicy::Strict
            && let Some(dest_len) = link_destination_len(&text[whole.end()..])
        {
            // Skip the destination too so its contents are not rescanned.
            pos += dest_len;
            continue;
        }
        let math = inner.as_str().trim();
        if math.is_empty() {
            continue;
        }
        out.push_str(&text[copied..whole.start()]);
        out.push_str("$$");
        out.push_str(math);
        out.push_str("$$");
        copied = whole.end();
    }
    out.push_str(&text[copied..]);
}

fn rewrite_parens(text: &str, policy: MathPolicy, out: &mut String) {
    let mut copied = 0;
    let mut pos = 0;
    while let Some(caps) = PAREN_SPAN.captures_at(text, pos) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        pos = whole.end();
        let is_math = match policy {
            MathPolicy::Strict => {
                !is_link_destination(text, whole.start())
                    && inner.as_str().contains(MATH_MARKERS)
            }
            MathPolicy::Permissive => true,
        };
        let math = inner.as_str().trim();
        if !is_math || math.is_empty() {
            continue;
        }
        out.push_str(&text[copied..whole.start()]);
        out.push('$');
        out.push_str(math);
        out.push('$');
        copied = whole.end();
    }
    out.push_str(&text[copied..]);
}

/// Length of a `(destination)` at the start of `rest`, if any. Destinations end
/// at the first `)` and never cross a line break.
fn link_destination_len(rest: &str) -> Option<usize> {
    let after_open = rest.strip_prefix('(')?;
    let close = after_open.find([')', '\n'])?;
    after_open[close..].starts_with(')').then_some(close + 2)
}

/// An unescaped paren directly after `]` is the destination half of `[text](url)`.
fn is_link_destination(text: &str, start: usize) -> bool {
    text.as_bytes().get(start) == Some(&b'(') && text[..start].ends_with(']')
}
