//! Math delimiter normalization for assistant replies.
//!
//! LLM output wraps math in whatever brackets it likes: `[ ... ]`, `\[ ... \]`,
//! `( ... )`, `\( ... \)`, multi-line `$$` blocks. Renderers downstream only
//! understand `$...$` (inline) and `$$...$$` (block, on one logical line).
//! [`normalize`] rewrites the former into the latter in three passes:
//!
//! 1. bracket spans become block math, unless they are Markdown links;
//! 2. paren spans become inline math when they look mathematical;
//! 3. line breaks inside block math are folded into spaces.
//!
//! Code fences, inline code, and spans already in canonical delimiters are
//! never rewritten by passes 1 and 2. Matching is regex-style and best effort:
//! nested or unbalanced brackets may be misclassified, and the function never fails.

mod rules;
mod spans;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How eagerly bracket and paren spans are treated as math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathPolicy {
    /// Links are preserved; parens need one of `= ^ _ \` inside.
    #[default]
    Strict,
    /// Every bracket span is block math and every paren span inline math.
    Permissive,
}

impl fmt::Display for MathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathPolicy::Strict => write!(f, "strict"),
            MathPolicy::Permissive => write!(f, "permissive"),
        }
    }
}

/// Unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown math policy '{0}' (expected 'strict' or 'permissive')")]
pub struct ParsePolicyError(pub String);

impl FromStr for MathPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(MathPolicy::Strict),
            "permissive" => Ok(MathPolicy::Permissive),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Normalize math delimiters with the default [`MathPolicy::Strict`].
pub fn normalize(text: &str) -> String {
    run_passes(text, MathPolicy::Strict)
}

/// Normalize math delimiters under `policy`.
pub fn normalize_with(text: &str, policy: MathPolicy) -> String {
    match policy {
        MathPolicy::Strict => normalize(text),
        MathPolicy::Permissive => run_passes(text, policy),
    }
}

/// Brackets, then parens, then block-math folding.
fn run_passes(text: &str, policy: MathPolicy) -> String {
    let text = rules::convert_brackets(text, policy);
    let text = rules::convert_parens(&text, policy);
    rules::fold_block_math(&text)
}

#[cfg(test)]
mod tests;
