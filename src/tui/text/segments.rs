//! Message segmentation: split content into text and fenced code blocks.

/// Segment of a message: either plain text or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MessageSegment<'a> {
    Text(&'a str),
    CodeBlock { lang: &'a str, code: &'a str },
}

/// Length of the backtick run opening a fence line (3 or more), if any.
fn fence_len(line: &str) -> Option<usize> {
    let run = line.trim_start().bytes().take_while(|b| *b == b'`').count();
    (run >= 3).then_some(run)
}

/// Split content into text and code block segments. A fence opens on a line starting
/// with three or more backticks (the rest of the line is the language) and closes on a
/// line starting with at least as many. An unclosed fence runs to the end.
pub(crate) fn parse_message_segments(content: &str) -> Vec<MessageSegment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut fence: Option<(usize, &str, usize)> = None; // (run, lang, code_start)
    let mut pos = 0;

    for line in content.split_inclusive('\n') {
        let line_start = pos;
        pos += line.len();
        let bare = line.trim_end_matches(['\n', '\r']);

        match fence {
            None => {
                if let Some(run) = fence_len(bare) {
                    if line_start > text_start {
                        segments.push(MessageSegment::Text(&content[text_start..line_start]));
                    }
                    let lang = bare.trim_start()[run..].trim();
                    fence = Some((run, lang, pos));
                }
            }
            Some((run, lang, code_start)) => {
                let closes = fence_len(bare).is_some_and(|n| n >= run)
                    && bare.trim().trim_matches('`').is_empty();
                if closes {
                    let code = content[code_start..line_start].trim_end_matches(['\n', '\r']);
                    segments.push(MessageSegment::CodeBlock { lang, code });
                    fence = None;
                    text_start = pos;
                }
            }
        }
    }

    match fence {
        Some((_, lang, code_start)) => {
            let code = content[code_start.min(content.len())..].trim_end_matches(['\n', '\r']);
            segments.push(MessageSegment::CodeBlock { lang, code });
        }
        None if text_start < content.len() => {
            segments.push(MessageSegment::Text(&content[text_start..]));
        }
        None => {}
    }
    segments
}
