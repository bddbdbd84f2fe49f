//! Civil (wall-clock) time zone used for local datetimes and calendar arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

/// The zone in which tokens without a trailing `Z` are interpreted.
///
/// This carries only the UTC/local distinction plus fixed offsets; there is
/// no time zone database behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CivilZone {
    /// The host's local time zone.
    #[default]
    System,
    /// Coordinated Universal Time.
    Utc,
    /// A fixed offset from UTC (e.g. `+02:00`).
    Fixed(FixedOffset),
}

impl CivilZone {
    /// Map a wall-clock datetime in this zone onto the absolute timeline.
    ///
    /// Returns `None` for wall-clock values that do not exist (DST gap).
    /// Ambiguous values (DST fold) map to the earlier instant.
    pub fn to_instant(&self, civil: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            CivilZone::System => Local
                .from_local_datetime(&civil)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            CivilZone::Utc => Some(Utc.from_utc_datetime(&civil)),
            CivilZone::Fixed(offset) => offset
                .from_local_datetime(&civil)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// The wall-clock reading of `instant` in this zone.
    pub fn to_civil(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            CivilZone::System => instant.with_timezone(&Local).naive_local(),
            CivilZone::Utc => instant.naive_utc(),
            CivilZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    /// Like [`to_instant`](Self::to_instant), but moves a wall-clock value
    /// that falls into a DST gap forward by one hour instead of failing.
    pub(crate) fn to_instant_lenient(&self, civil: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.to_instant(civil)
            .or_else(|| self.to_instant(civil + chrono::Duration::hours(1)))
    }
}

/// Parse a `±HH:MM`, `±HHMM` or `±HH` offset.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) || rest.matches(':').count() > 1 {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl FromStr for CivilZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "system" => Ok(CivilZone::System),
            "utc" | "z" => Ok(CivilZone::Utc),
            other => parse_offset(other)
                .map(CivilZone::Fixed)
                .ok_or_else(|| format!("invalid time zone '{s}' (expected local, utc or ±HH:MM)")),
        }
    }
}

impl fmt::Display for CivilZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CivilZone::System => f.write_str("local"),
            CivilZone::Utc => f.write_str("utc"),
            CivilZone::Fixed(offset) => {
                let secs = offset.fix().local_minus_utc();
                let sign = if secs >= 0 { '+' } else { '-' };
                let abs = secs.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn civil(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn parses_zone_names_and_offsets() {
        assert_eq!("local".parse::<CivilZone>().unwrap(), CivilZone::System);
        assert_eq!("UTC".parse::<CivilZone>().unwrap(), CivilZone::Utc);
        assert_eq!(
            "+02:00".parse::<CivilZone>().unwrap(),
            CivilZone::Fixed(FixedOffset::east_opt(7200).unwrap())
        );
        assert_eq!(
            "-0530".parse::<CivilZone>().unwrap(),
            CivilZone::Fixed(FixedOffset::east_opt(-(5 * 3600 + 30 * 60)).unwrap())
        );
        assert!("Mars/Olympus".parse::<CivilZone>().is_err());
        assert!("+25:00".parse::<CivilZone>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for s in ["local", "utc", "+02:00", "-05:30"] {
            assert_eq!(s.parse::<CivilZone>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn fixed_offset_shifts_instant() {
        let zone: CivilZone = "+02:00".parse().unwrap();
        let instant = zone.to_instant(civil(2016, 6, 24, 18, 42)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2016, 6, 24, 16, 42, 0).unwrap());
        assert_eq!(zone.to_civil(instant), civil(2016, 6, 24, 18, 42));
    }
}
