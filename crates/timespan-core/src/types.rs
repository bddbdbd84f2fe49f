//! Resolved time values handed to the query builder.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::zone::CivilZone;

/// A point on the absolute timeline.
///
/// `utc` records whether the source token carried a trailing `Z` (or was
/// otherwise anchored to UTC) as opposed to local civil time. Comparisons and
/// arithmetic always go through `instant`, which is already normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbsoluteInstant {
    pub instant: DateTime<Utc>,
    pub utc: bool,
}

impl AbsoluteInstant {
    /// An instant that was written in UTC.
    pub fn utc(instant: DateTime<Utc>) -> Self {
        AbsoluteInstant { instant, utc: true }
    }

    /// An instant that was written in (or derived from) local civil time.
    pub fn local(instant: DateTime<Utc>) -> Self {
        AbsoluteInstant {
            instant,
            utc: false,
        }
    }

    /// The zone whose calendar applies when adding months or days to this instant.
    pub fn calendar_zone(&self, local: CivilZone) -> CivilZone {
        if self.utc {
            CivilZone::Utc
        } else {
            local
        }
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }
}

/// A resolved `{start, end?}` pair.
///
/// A missing `end` means the expression did not name one; what that implies
/// (usually "now") is up to the caller, see [`TimeRange::to_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: AbsoluteInstant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<AbsoluteInstant>,
}

impl TimeRange {
    pub fn open(start: AbsoluteInstant) -> Self {
        TimeRange { start, end: None }
    }

    pub fn closed(start: AbsoluteInstant, end: AbsoluteInstant) -> Self {
        TimeRange {
            start,
            end: Some(end),
        }
    }

    /// Returns `true` if the expression named both endpoints.
    pub fn is_range(&self) -> bool {
        self.end.is_some()
    }

    /// Translate into a `gte`/`lte` range filter, closing an open range at `now`.
    pub fn to_filter(&self, now: DateTime<Utc>) -> RangeFilter {
        RangeFilter {
            gte: self.start.instant,
            lte: self.end.map(|end| end.instant).unwrap_or(now),
        }
    }
}

/// An inclusive time filter in the shape search backends expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeFilter {
    pub gte: DateTime<Utc>,
    pub lte: DateTime<Utc>,
}
