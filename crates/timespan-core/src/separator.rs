//! Range separator validation.
//!
//! Duration tokens use letters such as `M`, `d` or `s` as component
//! designators, and ISO-8601 reserves `P`, `T`, `+` and `-`. A separator made
//! of those characters would leave a range expression without a well-defined
//! split point, so it is rejected before any parsing happens.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TimespanError};

/// Designators used by the duration grammar (`M` months, `m` minutes, ...).
pub const DURATION_DESIGNATORS: [char; 10] = ['Y', 'y', 'M', 'D', 'd', 'H', 'h', 'm', 'S', 's'];

/// ISO-8601 tokens that may prefix or split a duration.
pub const ISO_RESERVED: [char; 6] = ['-', '+', 'P', 'p', 'T', 't'];

/// The separator used when neither the CLI nor the config file provide one.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Returns `true` if `c` belongs to the reserved character set.
pub fn is_reserved(c: char) -> bool {
    DURATION_DESIGNATORS.contains(&c) || ISO_RESERVED.contains(&c)
}

/// Check that `separator` can split a range expression unambiguously.
///
/// Rejected separators:
/// - empty or whitespace-only strings
/// - anything containing a digit, `+` or `-`
/// - anything containing a run of letters made only of reserved characters
///   (`T`, `ms`, `/D`), since such a run reads as part of a duration
///
/// Words that merely contain a reserved letter next to ordinary letters, such
/// as `TO`, are accepted.
///
/// # Errors
///
/// Returns [`TimespanError::InvalidSeparator`] when the separator is rejected.
pub fn validate(separator: &str) -> Result<()> {
    let invalid = || TimespanError::InvalidSeparator(separator.to_string());

    if separator.trim().is_empty() {
        return Err(invalid());
    }
    if separator
        .chars()
        .any(|c| c.is_ascii_digit() || c == '+' || c == '-')
    {
        return Err(invalid());
    }

    let reserved_run = separator
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
        .any(|run| run.chars().all(is_reserved));
    if reserved_run {
        return Err(invalid());
    }

    Ok(())
}

/// A validated range separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator(String);

impl Separator {
    /// Validate and wrap a separator string.
    pub fn new(separator: &str) -> Result<Self> {
        validate(separator)?;
        Ok(Separator(separator.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Separator(DEFAULT_SEPARATOR.to_string())
    }
}

impl FromStr for Separator {
    type Err = TimespanError;

    fn from_str(s: &str) -> Result<Self> {
        Separator::new(s)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_set_is_complete() {
        for c in "YyMDdHhmSs-+PpTt".chars() {
            assert!(is_reserved(c), "{c} should be reserved");
        }
        for c in "OoXx/.|".chars() {
            assert!(!is_reserved(c), "{c} should not be reserved");
        }
    }

    #[test]
    fn default_is_slash() {
        assert_eq!(Separator::default().as_str(), "/");
    }

    #[test]
    fn whitespace_only_is_rejected() {
        assert!(validate("   ").is_err());
        assert!(validate("").is_err());
    }
}
