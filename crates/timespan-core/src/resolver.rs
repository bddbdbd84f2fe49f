//! Combining classified tokens into a concrete [`TimeRange`].
//!
//! | expression          | start                   | end                    |
//! |---------------------|-------------------------|------------------------|
//! | `T`                 | `T`                     | -                      |
//! | `D`                 | `now - D`               | -                      |
//! | `T1/T2`             | `T1`                    | `T2`                   |
//! | `T/+D`              | `T`                     | `T + D`                |
//! | `T/-D`              | `T - D`                 | `T`                    |
//! | `D1/+D2`            | `now - D1`              | `now - D1 + D2`        |
//! | `D1/-D2`            | `now - D1 - D2`         | `now - D1`             |
//! | `D/T`               | `now - D`               | `T`                    |
//!
//! A duration ending a range must be signed. Human phrases are only accepted
//! as a whole, single-token expression.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::duration::{match_duration, DurationSign, ParsedDuration};
use crate::error::{Result, TimespanError};
use crate::format::match_absolute;
use crate::human::{HumanInterpreter, PhraseInterpreter};
use crate::separator::Separator;
use crate::splitter::{split, Split};
use crate::types::{AbsoluteInstant, TimeRange};
use crate::zone::CivilZone;

/// What one side of an expression turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Absolute(AbsoluteInstant),
    Duration(ParsedDuration),
}

/// Resolves time expressions against an injected `now`.
///
/// Holds no mutable state: resolving the same expression with the same `now`
/// always gives the same result.
pub struct Resolver {
    separator: Separator,
    zone: CivilZone,
    human: Box<dyn HumanInterpreter + Send + Sync>,
}

impl Resolver {
    /// A resolver reading local times in `zone`, with the built-in phrase
    /// interpreter as fallback.
    pub fn new(separator: Separator, zone: CivilZone) -> Self {
        Resolver {
            separator,
            zone,
            human: Box::new(PhraseInterpreter::new(zone)),
        }
    }

    /// Replace the natural-language fallback.
    pub fn with_human<H>(mut self, human: H) -> Self
    where
        H: HumanInterpreter + Send + Sync + 'static,
    {
        self.human = Box::new(human);
        self
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    pub fn zone(&self) -> CivilZone {
        self.zone
    }

    /// Resolve `expression` into a `{start, end?}` pair.
    ///
    /// # Errors
    ///
    /// - [`TimespanError::MissingRangeEnd`] if nothing follows the separator
    /// - [`TimespanError::AmbiguousDurationSign`] if a range ends in an unsigned duration
    /// - [`TimespanError::UnrecognizedFormat`] if a token cannot be classified
    /// - [`TimespanError::OutOfRange`] if duration arithmetic overflows
    pub fn resolve(&self, expression: &str, now: DateTime<Utc>) -> Result<TimeRange> {
        tracing::debug!(expression, separator = %self.separator, "resolving time expression");
        let range = match split(expression, &self.separator)? {
            Split::SingleToken(token) => self.resolve_single(token, now),
            Split::RangeTokens(left, right) => self.resolve_range(left, right, now),
        }?;
        tracing::debug!(start = %range.start.instant, end = ?range.end.map(|e| e.instant), "resolved");
        Ok(range)
    }

    fn resolve_single(&self, token: &str, now: DateTime<Utc>) -> Result<TimeRange> {
        if let Some(duration) = match_duration(token) {
            if duration.sign == Some(DurationSign::Plus) {
                tracing::debug!(token, "standalone duration with '+' still counts back from now");
            }
            let start = duration.subtract_from(now, self.zone)?;
            return Ok(TimeRange::open(AbsoluteInstant::local(start)));
        }

        if let Some(instant) = match_absolute(token, self.zone) {
            return Ok(TimeRange::open(instant));
        }

        tracing::trace!(token, "not a datetime or duration, trying human phrase");
        self.human
            .interpret(token, now)
            .map(|instant| TimeRange::open(AbsoluteInstant::local(instant)))
            .ok_or_else(|| TimespanError::UnrecognizedFormat(token.to_string()))
    }

    /// Range sides are either absolute or durations; phrases are not allowed.
    fn classify_side(&self, token: &str) -> Result<Endpoint> {
        match_absolute(token, self.zone)
            .map(Endpoint::Absolute)
            .or_else(|| match_duration(token).map(Endpoint::Duration))
            .ok_or_else(|| TimespanError::UnrecognizedFormat(token.to_string()))
    }

    fn resolve_range(&self, left: &str, right: &str, now: DateTime<Utc>) -> Result<TimeRange> {
        let start = self.classify_side(left)?;
        let end = self.classify_side(right)?;
        tracing::trace!(?start, ?end, "classified range sides");

        let anchor = match start {
            Endpoint::Absolute(instant) => instant,
            Endpoint::Duration(duration) => {
                AbsoluteInstant::local(duration.subtract_from(now, self.zone)?)
            }
        };

        let duration = match end {
            Endpoint::Absolute(instant) => return Ok(TimeRange::closed(anchor, instant)),
            Endpoint::Duration(duration) => duration,
        };

        let zone = anchor.calendar_zone(self.zone);
        let moved = |instant| AbsoluteInstant { instant, ..anchor };
        match duration.sign {
            Some(DurationSign::Plus) => {
                let end = duration.add_to(anchor.instant, zone)?;
                Ok(TimeRange::closed(anchor, moved(end)))
            }
            Some(DurationSign::Minus) => {
                let start = duration.subtract_from(anchor.instant, zone)?;
                Ok(TimeRange::closed(moved(start), anchor))
            }
            None => Err(TimespanError::AmbiguousDurationSign(right.to_string())),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new(Separator::default(), CivilZone::default())
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("separator", &self.separator)
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

/// Validate `separator` and resolve `expression` in the host's local zone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timespan_core::resolve;
///
/// let now = Utc.with_ymd_and_hms(2016, 6, 24, 20, 0, 0).unwrap();
/// let range = resolve("2h/+1h", "/", now).unwrap();
/// assert_eq!(range.start.instant, Utc.with_ymd_and_hms(2016, 6, 24, 18, 0, 0).unwrap());
/// assert_eq!(range.end.unwrap().instant, Utc.with_ymd_and_hms(2016, 6, 24, 19, 0, 0).unwrap());
/// ```
pub fn resolve(expression: &str, separator: &str, now: DateTime<Utc>) -> Result<TimeRange> {
    let separator = Separator::new(separator)?;
    Resolver::new(separator, CivilZone::System).resolve(expression, now)
}
