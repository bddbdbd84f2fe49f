//! # timespan-core
//!
//! Resolves a single user-supplied time expression into a concrete
//! `{start, end?}` pair usable as a query time filter.
//!
//! Accepted expressions:
//!
//! - absolute datetimes in a fixed set of ISO-8601-like layouts
//!   (`2016-06-24T18:42`, `20160624 1842Z`, ...)
//! - relative durations, counted back from now (`2h30m8s`, `P1DT4H`, `90`)
//! - ranges of either, split by a configurable separator
//!   (`2016-06-24/2016-06-25`, `2h/+1h`, `2015-06-01 TO -1M`)
//! - natural-language phrases as a last resort (`last Friday at 13:30`)
//!
//! Resolution is pure: the caller injects `now` and nothing is read from the
//! system clock.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use timespan_core::{CivilZone, Resolver, Separator};
//!
//! let resolver = Resolver::new(Separator::default(), CivilZone::Utc);
//! let now = Utc.with_ymd_and_hms(2016, 6, 24, 20, 0, 0).unwrap();
//!
//! let range = resolver.resolve("2016-06-24T18:42/+10m", now).unwrap();
//! assert_eq!(range.start.instant, Utc.with_ymd_and_hms(2016, 6, 24, 18, 42, 0).unwrap());
//! assert_eq!(range.end.unwrap().instant, Utc.with_ymd_and_hms(2016, 6, 24, 18, 52, 0).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`separator`]: range separator validation
//! - [`format`]: strict absolute datetime layouts
//! - [`duration`]: duration grammar and calendar-aware arithmetic
//! - [`splitter`]: splitting an expression at the separator
//! - [`human`]: natural-language fallback
//! - [`resolver`]: sign and position rules producing a [`TimeRange`]
//! - [`zone`]: the civil time zone for local datetimes
//! - [`types`]: resolved instants, ranges and query filters
//! - [`error`]: error types

pub mod duration;
pub mod error;
pub mod format;
pub mod human;
pub mod resolver;
pub mod separator;
pub mod splitter;
pub mod types;
pub mod zone;

pub use duration::{match_duration, DurationSign, ParsedDuration};
pub use error::TimespanError;
pub use format::match_absolute;
pub use human::{HumanInterpreter, NoInterpreter, PhraseInterpreter};
pub use resolver::{resolve, Resolver};
pub use separator::{validate as validate_separator, Separator, DEFAULT_SEPARATOR};
pub use splitter::{split, Split};
pub use types::{AbsoluteInstant, RangeFilter, TimeRange};
pub use zone::CivilZone;
