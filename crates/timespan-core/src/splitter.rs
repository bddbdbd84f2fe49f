//! Splitting an expression into one token or a `left`/`right` range pair.

use crate::error::{Result, TimespanError};
use crate::separator::Separator;

/// The shape of an expression after looking for the range separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    SingleToken(&'a str),
    RangeTokens(&'a str, &'a str),
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let (hay, pat) = (haystack.as_bytes(), needle.as_bytes());
    if pat.is_empty() || pat.len() > hay.len() {
        return None;
    }
    // Non-ASCII bytes must match exactly, so a hit starting on a char
    // boundary also ends on one.
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| i + pat.len() <= hay.len())
        .find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// Split `expression` at the first occurrence of `separator`, ignoring case.
///
/// Both sides are trimmed. Without a separator the whole (trimmed) expression
/// is a single token.
///
/// # Errors
///
/// Returns [`TimespanError::MissingRangeEnd`] when the separator is present
/// but nothing except whitespace follows it.
pub fn split<'a>(expression: &'a str, separator: &Separator) -> Result<Split<'a>> {
    let sep = separator.as_str();
    let Some(at) = find_ignore_case(expression, sep) else {
        return Ok(Split::SingleToken(expression.trim()));
    };

    let left = expression[..at].trim();
    let right = expression[at + sep.len()..].trim();
    tracing::trace!(left, right, separator = sep, "split range expression");

    if right.is_empty() {
        return Err(TimespanError::MissingRangeEnd {
            separator: sep.to_string(),
        });
    }
    Ok(Split::RangeTokens(left, right))
}
