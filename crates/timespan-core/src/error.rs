//! Error types for time expression resolution.

use thiserror::Error;

/// Errors that can occur while resolving a time expression.
///
/// All of these are local, deterministic parse failures. Retrying with the
/// same input always yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimespanError {
    /// The range separator collides with duration designators or ISO tokens.
    #[error("Invalid range separator '{0}': it must not contain digits or reserved characters (Y y M D d H h m S s - + P p T t)")]
    InvalidSeparator(String),

    /// A separator was found but nothing follows it.
    #[error("Range separator found ('{separator}'), but there's nothing behind it")]
    MissingRangeEnd { separator: String },

    /// A duration used as the end of a range has no leading `+` or `-`.
    #[error("Duration must start with '+' or '-' when used as end of range ('{0}')")]
    AmbiguousDurationSign(String),

    /// The token matched no absolute format, duration grammar or human phrase.
    #[error("Unable to interpret time expression '{0}'")]
    UnrecognizedFormat(String),

    /// Calendar arithmetic left the representable datetime range.
    #[error("Datetime out of range: {0}")]
    OutOfRange(String),
}

/// Convenience alias used throughout timespan-core.
pub type Result<T> = std::result::Result<T, TimespanError>;
