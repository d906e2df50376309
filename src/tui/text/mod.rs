//! Text utilities: reply segmentation, inline Markdown and math styling, wrapping.

mod markdown;
mod segments;
mod wrap;

pub(crate) use markdown::parse_markdown_inline;
pub(crate) use segments::{MessageSegment, parse_message_segments};
pub(crate) use wrap::wrap_message;
