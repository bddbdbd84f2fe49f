//! Relative duration tokens: `2h30m8s`, `+1y2M88d`, `P1DT4H`, `-30`.
//!
//! Grammar, every group optional and in this order:
//!
//! ```text
//! [+|-][P] [N(Y|y)] [N M] [N(D|d)] [T|t] [N(H|h)] [N m] [N(S|s)]
//! ```
//!
//! Uppercase `M` is months, lowercase `m` is minutes. A token made only of
//! digits (optionally signed) is a number of minutes.
//!
//! The minutes group has one lookahead rule: a number followed by `m` is
//! minutes, and a bare number with no designator is minutes only when it
//! ends the token. A bare number followed by more digits and `s` belongs to
//! the seconds group and is never counted as minutes.

use std::fmt;

use chrono::{DateTime, Days, Months, Utc};

use crate::error::{Result, TimespanError};
use crate::separator::DURATION_DESIGNATORS;
use crate::zone::CivilZone;

/// Explicit direction written in front of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSign {
    Plus,
    Minus,
}

/// A duration as written by the user.
///
/// Groups absent from the token stay `None`. Arithmetic treats them as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedDuration {
    pub sign: Option<DurationSign>,
    pub years: Option<u64>,
    pub months: Option<u64>,
    pub days: Option<u64>,
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,
}

/// Try to read `token` as a duration.
///
/// Rejected outright: tokens without digits, and tokens that are not pure
/// digits yet carry no duration designator.
pub fn match_duration(token: &str) -> Option<ParsedDuration> {
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let (sign, body) = match token.as_bytes().first() {
        Some(b'+') => (Some(DurationSign::Plus), &token[1..]),
        Some(b'-') => (Some(DurationSign::Minus), &token[1..]),
        _ => (None, token),
    };

    if body.bytes().all(|b| b.is_ascii_digit()) {
        let minutes = body.parse().ok()?;
        return Some(ParsedDuration {
            sign,
            minutes: Some(minutes),
            ..Default::default()
        });
    }

    if !token.chars().any(|c| DURATION_DESIGNATORS.contains(&c)) {
        return None;
    }

    let parsed = Scanner::new(body).scan(sign);
    tracing::trace!(token, ?parsed, "duration scan");
    parsed
}

/// Ordered-group scanner over the token body (sign already stripped).
struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(body: &'a str) -> Self {
        Scanner {
            input: body.as_bytes(),
            pos: 0,
        }
    }

    fn scan(mut self, sign: Option<DurationSign>) -> Option<ParsedDuration> {
        self.literal(b"P");

        let mut parsed = ParsedDuration {
            sign,
            ..Default::default()
        };
        parsed.years = self.group(b"Yy")?;
        parsed.months = self.group(b"M")?;
        parsed.days = self.group(b"Dd")?;
        self.literal(b"Tt");
        parsed.hours = self.group(b"Hh")?;
        parsed.minutes = self.minutes()?;
        parsed.seconds = self.group(b"Ss")?;

        let nothing_read = parsed.years.is_none()
            && parsed.months.is_none()
            && parsed.days.is_none()
            && parsed.hours.is_none()
            && parsed.minutes.is_none()
            && parsed.seconds.is_none();
        (self.pos == self.input.len() && !nothing_read).then_some(parsed)
    }

    /// Consume one optional character from `set`.
    fn literal(&mut self, set: &[u8]) {
        if self.peek(0).is_some_and(|b| set.contains(&b)) {
            self.pos += 1;
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    /// Number of consecutive digits starting at the cursor.
    fn digit_run(&self) -> usize {
        self.input[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }

    fn number(&self, len: usize) -> Option<u64> {
        std::str::from_utf8(&self.input[self.pos..self.pos + len])
            .ok()?
            .parse()
            .ok()
    }

    /// `N<designator>`. `Some(None)` when the group is absent, `None` when
    /// the number does not fit.
    fn group(&mut self, designators: &[u8]) -> Option<Option<u64>> {
        let len = self.digit_run();
        if len == 0 || !self.peek(len).is_some_and(|b| designators.contains(&b)) {
            return Some(None);
        }
        let value = self.number(len)?;
        self.pos += len + 1;
        Some(Some(value))
    }

    /// `N m`, or a bare `N` that ends the token.
    fn minutes(&mut self) -> Option<Option<u64>> {
        let len = self.digit_run();
        if len == 0 {
            return Some(None);
        }
        let consumed = match self.peek(len) {
            Some(b'm') => len + 1,
            None => len,
            // Digits followed by `s` or `S` (or anything else) are not minutes.
            Some(_) => return Some(None),
        };
        let value = self.number(len)?;
        self.pos += consumed;
        Some(Some(value))
    }
}

impl ParsedDuration {
    /// Whole calendar months (years folded in).
    fn calendar_months(&self) -> Option<u32> {
        let years = self.years.unwrap_or(0);
        let months = self.months.unwrap_or(0);
        years
            .checked_mul(12)?
            .checked_add(months)
            .and_then(|m| u32::try_from(m).ok())
    }

    /// Hours, minutes and seconds as exact elapsed time.
    fn clock_duration(&self) -> Option<chrono::Duration> {
        let seconds = self
            .hours
            .unwrap_or(0)
            .checked_mul(3600)?
            .checked_add(self.minutes.unwrap_or(0).checked_mul(60)?)?
            .checked_add(self.seconds.unwrap_or(0))?;
        chrono::Duration::try_seconds(i64::try_from(seconds).ok()?)
    }

    /// `base + self`, ignoring the written sign.
    ///
    /// Years, months and days move the wall clock of `zone` (months clamp to
    /// the end of the month); hours, minutes and seconds are exact.
    pub fn add_to(&self, base: DateTime<Utc>, zone: CivilZone) -> Result<DateTime<Utc>> {
        self.shift(base, zone, true)
    }

    /// `base - self`, ignoring the written sign.
    pub fn subtract_from(&self, base: DateTime<Utc>, zone: CivilZone) -> Result<DateTime<Utc>> {
        self.shift(base, zone, false)
    }

    fn shift(&self, base: DateTime<Utc>, zone: CivilZone, forward: bool) -> Result<DateTime<Utc>> {
        let op = if forward { '+' } else { '-' };
        let out_of_range = || TimespanError::OutOfRange(format!("{} {} {}", base, op, self));

        let months = self.calendar_months().ok_or_else(out_of_range)?;
        let days = self.days.unwrap_or(0);

        let mut shifted = base;
        if months != 0 || days != 0 {
            let civil = zone.to_civil(base);
            let civil = if forward {
                civil
                    .checked_add_months(Months::new(months))
                    .and_then(|c| c.checked_add_days(Days::new(days)))
            } else {
                civil
                    .checked_sub_months(Months::new(months))
                    .and_then(|c| c.checked_sub_days(Days::new(days)))
            }
            .ok_or_else(out_of_range)?;
            shifted = zone.to_instant_lenient(civil).ok_or_else(out_of_range)?;
        }

        let clock = self.clock_duration().ok_or_else(out_of_range)?;
        if forward {
            shifted.checked_add_signed(clock)
        } else {
            shifted.checked_sub_signed(clock)
        }
        .ok_or_else(out_of_range)
    }
}

/// Canonical form, e.g. `+P1Y2M3DT4H5m6S`. Parses back to the same value.
impl fmt::Display for ParsedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Some(DurationSign::Plus) => f.write_str("+")?,
            Some(DurationSign::Minus) => f.write_str("-")?,
            None => {}
        }
        f.write_str("P")?;
        for (value, designator) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if let Some(v) = value {
                write!(f, "{v}{designator}")?;
            }
        }
        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            f.write_str("T")?;
        }
        for (value, designator) in [(self.hours, 'H'), (self.minutes, 'm'), (self.seconds, 'S')] {
            if let Some(v) = value {
                write!(f, "{v}{designator}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_group_leaves_cursor_on_mismatch() {
        let mut scanner = Scanner::new("12d");
        assert_eq!(scanner.group(b"Yy"), Some(None));
        assert_eq!(scanner.pos, 0);
        assert_eq!(scanner.group(b"Dd"), Some(Some(12)));
        assert_eq!(scanner.pos, 3);
    }

    #[test]
    fn scanner_minutes_lookahead() {
        let mut bare_end = Scanner::new("45");
        assert_eq!(bare_end.minutes(), Some(Some(45)));

        let mut feeds_seconds = Scanner::new("45s");
        assert_eq!(feeds_seconds.minutes(), Some(None));
        assert_eq!(feeds_seconds.pos, 0);
    }

    #[test]
    fn overflowing_number_is_not_a_duration() {
        assert!(match_duration("99999999999999999999999h").is_none());
    }

    #[test]
    fn calendar_months_fold_years() {
        let d = match_duration("1y2M").unwrap();
        assert_eq!(d.calendar_months(), Some(14));
    }
}
