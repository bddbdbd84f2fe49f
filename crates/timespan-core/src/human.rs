//! Last-resort interpretation of natural-language phrases ("yesterday",
//! "last Friday at 13:30", "3 hours ago").
//!
//! The resolver only ever asks for a single instant. Phrases are never
//! combined with duration or range arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

use crate::zone::CivilZone;

/// A natural-language date interpreter.
///
/// Implementations must be deterministic for a given `now` so resolution
/// stays a pure function of its inputs.
pub trait HumanInterpreter {
    fn interpret(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

impl<F> HumanInterpreter for F
where
    F: Fn(&str, DateTime<Utc>) -> Option<DateTime<Utc>>,
{
    fn interpret(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self(text, now)
    }
}

/// An interpreter that understands nothing. Useful to disable the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterpreter;

impl HumanInterpreter for NoInterpreter {
    fn interpret(&self, _text: &str, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        None
    }
}

/// Built-in English phrase interpreter.
///
/// Calendar phrases ("today", "next Monday", "start of month") are read on the
/// wall clock of `zone`; offsets ("in 2 hours", "3 days ago") are exact
/// elapsed time from `now`. Weeks start on Monday.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseInterpreter {
    zone: CivilZone,
}

impl PhraseInterpreter {
    pub fn new(zone: CivilZone) -> Self {
        PhraseInterpreter { zone }
    }

    fn at(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.zone.to_instant_lenient(date.and_time(time))
    }
}

impl HumanInterpreter for PhraseInterpreter {
    fn interpret(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let phrase = normalize(text);
        let today = self.zone.to_civil(now);

        let resolved = try_anchor_with_time(&phrase, &today)
            .or_else(|| try_weekday_with_time(&phrase, &today))
            .or_else(|| try_period_boundary(&phrase, &today))
            .or_else(|| try_period_relative(&phrase, &today))
            .or_else(|| try_named_time(&phrase).map(|t| (today.date(), t)))
            .or_else(|| parse_clock(&phrase).map(|t| (today.date(), t)));

        let instant = match resolved {
            Some((date, time)) => self.at(date, time),
            None if phrase == "now" => Some(now),
            None => try_offset(&phrase, now),
        };
        tracing::trace!(text, ?instant, "human phrase");
        instant
    }
}

/// Lowercase, drop "the", collapse whitespace.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w != "the")
        .collect::<Vec<_>>()
        .join(" ")
}

fn midnight() -> NaiveTime {
    NaiveTime::default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

/// "today", "tomorrow", "yesterday".
fn anchor_date(word: &str, today: &NaiveDateTime) -> Option<NaiveDate> {
    match word {
        "today" => Some(today.date()),
        "tomorrow" => today.date().succ_opt(),
        "yesterday" => today.date().pred_opt(),
        _ => None,
    }
}

/// Time part after an anchor: "at 2pm", "at noon", "morning", or nothing.
fn trailing_time(rest: Option<&str>) -> Option<NaiveTime> {
    match rest {
        None => Some(midnight()),
        Some(rest) => {
            let rest = rest.strip_prefix("at ").unwrap_or(rest);
            try_named_time(rest).or_else(|| parse_clock(rest))
        }
    }
}

/// "tomorrow", "yesterday at 13:30", "today evening".
fn try_anchor_with_time(s: &str, today: &NaiveDateTime) -> Option<(NaiveDate, NaiveTime)> {
    let mut parts = s.splitn(2, ' ');
    let date = anchor_date(parts.next()?, today)?;
    Some((date, trailing_time(parts.next())?))
}

/// "next Monday", "last Friday at 13:30", "this Tuesday morning".
fn try_weekday_with_time(s: &str, today: &NaiveDateTime) -> Option<(NaiveDate, NaiveTime)> {
    let mut parts = s.splitn(3, ' ');
    let modifier = parts.next()?;
    let weekday = parse_weekday(parts.next()?)?;
    let current = i64::from(today.weekday().num_days_from_monday());
    let target = i64::from(weekday.num_days_from_monday());

    let offset = match modifier {
        // Strictly in the future: the same weekday means a week ahead.
        "next" => match (target - current).rem_euclid(7) {
            0 => 7,
            n => n,
        },
        "this" => target - current,
        // Strictly in the past.
        "last" => -match (current - target).rem_euclid(7) {
            0 => 7,
            n => n,
        },
        _ => return None,
    };

    let date = today.date().checked_add_signed(Duration::days(offset))?;
    Some((date, trailing_time(parts.next())?))
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_monday(),
    )))
}

fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        month_start(date.year() + 1, 1)
    } else {
        month_start(date.year(), date.month() + 1)
    }
}

/// "start of week", "end of month", "start of today", "end of year".
fn try_period_boundary(s: &str, today: &NaiveDateTime) -> Option<(NaiveDate, NaiveTime)> {
    let (is_start, period) = if let Some(p) = s.strip_prefix("start of ") {
        (true, p)
    } else if let Some(p) = s.strip_prefix("end of ") {
        (false, p)
    } else {
        return None;
    };

    let date = today.date();
    let (first, last) = match period {
        "today" | "day" => (date, date),
        "week" => {
            let first = week_start(date)?;
            (first, first.checked_add_signed(Duration::days(6))?)
        }
        "month" => {
            let first = month_start(date.year(), date.month())?;
            (first, next_month_start(date)?.pred_opt()?)
        }
        "year" => (
            NaiveDate::from_ymd_opt(date.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(date.year(), 12, 31)?,
        ),
        _ => return None,
    };

    Some(if is_start {
        (first, midnight())
    } else {
        (last, end_of_day())
    })
}

/// "last week", "this month", "next year": the start of that period.
fn try_period_relative(s: &str, today: &NaiveDateTime) -> Option<(NaiveDate, NaiveTime)> {
    let (modifier, period) = s.split_once(' ')?;
    let step: i32 = match modifier {
        "last" => -1,
        "this" => 0,
        "next" => 1,
        _ => return None,
    };

    let date = today.date();
    let first = match period {
        "week" => week_start(date)?.checked_add_signed(Duration::weeks(i64::from(step)))?,
        "month" => {
            let index = date.year() * 12 + date.month0() as i32 + step;
            month_start(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)?
        }
        "year" => NaiveDate::from_ymd_opt(date.year() + step, 1, 1)?,
        _ => return None,
    };
    Some((first, midnight()))
}

/// "in 2 hours", "30 minutes ago", "an hour ago", "a week from now".
fn try_offset(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (amount, forward) = if let Some(rest) = s.strip_prefix("in ") {
        (rest, true)
    } else if let Some(rest) = s.strip_suffix(" ago") {
        (rest, false)
    } else if let Some(rest) = s.strip_suffix(" from now") {
        (rest, true)
    } else {
        return None;
    };

    let (count, unit) = amount.split_once(' ')?;
    let count: i64 = match count {
        "a" | "an" => 1,
        n => n.parse().ok()?,
    };
    let step = unit_duration(unit)?;
    let offset = Duration::try_seconds(step.num_seconds().checked_mul(count)?)?;

    if forward {
        now.checked_add_signed(offset)
    } else {
        now.checked_sub_signed(offset)
    }
}

fn unit_duration(unit: &str) -> Option<Duration> {
    match unit {
        "second" | "seconds" | "sec" | "secs" => Some(Duration::seconds(1)),
        "minute" | "minutes" | "min" | "mins" => Some(Duration::minutes(1)),
        "hour" | "hours" | "hr" | "hrs" => Some(Duration::hours(1)),
        "day" | "days" => Some(Duration::days(1)),
        "week" | "weeks" | "wk" | "wks" => Some(Duration::weeks(1)),
        _ => None,
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn try_named_time(s: &str) -> Option<NaiveTime> {
    match s {
        "morning" => NaiveTime::from_hms_opt(9, 0, 0),
        "noon" | "midday" => NaiveTime::from_hms_opt(12, 0, 0),
        "afternoon" => NaiveTime::from_hms_opt(13, 0, 0),
        "evening" => NaiveTime::from_hms_opt(18, 0, 0),
        "night" => NaiveTime::from_hms_opt(21, 0, 0),
        "midnight" => Some(midnight()),
        _ => None,
    }
}

/// "14:30", "14:30:15", "2pm", "2:30 pm", "12am".
fn parse_clock(s: &str) -> Option<NaiveTime> {
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return Some(t);
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Some(t);
    }

    let compact = s.replace(' ', "");
    let (clock, pm) = if let Some(c) = compact.strip_suffix("pm") {
        (c, true)
    } else if let Some(c) = compact.strip_suffix("am") {
        (c, false)
    } else {
        return None;
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
