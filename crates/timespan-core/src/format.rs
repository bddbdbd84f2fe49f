//! Strict matching of absolute datetime tokens against a fixed list of layouts.
//!
//! Layouts are written with `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss` as
//! fixed-width digit fields; `Z` is a literal trailing UTC marker and every
//! other character must appear verbatim. A token must match a whole layout to
//! count as absolute. There is no lenient or partial parsing.

use chrono::NaiveDate;

use crate::types::AbsoluteInstant;
use crate::zone::CivilZone;

/// Accepted layouts, most common first.
pub const LAYOUTS: [&str; 28] = [
    "YYYY-MM-DD",
    "YYYY-MM-DD HH:mm",
    "YYYY-MM-DDTHH:mm",
    "YYYY-MM-DD HHmm",
    "YYYYMMDD HH:mm",
    "YYYYMMDD HHmm",
    "YYYYMMDD",
    "YYYY-MM-DDTHHmm",
    "YYYYMMDDTHH:mm",
    "YYYYMMDDTHHmm",
    "YYYY-MM-DD HH:mm:ss",
    "YYYY-MM-DD HHmmss",
    "YYYY-MM-DDTHH:mm:ss",
    "YYYY-MM-DDTHHmmss",
    "YYYYMMDDTHHmmss",
    "YYYY-MM-DD HH:mmZ",
    "YYYY-MM-DD HHmmZ",
    "YYYY-MM-DD HH:mm:ssZ",
    "YYYY-MM-DD HHmmssZ",
    "YYYYMMDD HH:mmZ",
    "YYYYMMDD HHmmZ",
    "YYYY-MM-DDTHH:mmZ",
    "YYYY-MM-DDTHHmmZ",
    "YYYY-MM-DDTHH:mm:ssZ",
    "YYYY-MM-DDTHHmmssZ",
    "YYYYMMDDTHH:mmZ",
    "YYYYMMDDTHHmmZ",
    "YYYYMMDDTHHmmssZ",
];

/// Raw field values extracted by a structural match.
#[derive(Debug, Default, PartialEq, Eq)]
struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    utc: bool,
}

/// Fixed-width digit fields, checked before single-character literals.
const FIELDS: [(&str, usize); 6] = [
    ("YYYY", 4),
    ("MM", 2),
    ("DD", 2),
    ("HH", 2),
    ("mm", 2),
    ("ss", 2),
];

/// Match `token` against one layout, without any calendar validation.
fn match_layout(layout: &str, token: &str) -> Option<Fields> {
    let input = token.as_bytes();
    let mut rest = layout;
    let mut pos = 0;
    let mut fields = Fields::default();

    'layout: while !rest.is_empty() {
        for (name, width) in FIELDS {
            if let Some(after) = rest.strip_prefix(name) {
                let digits = input.get(pos..pos + width)?;
                if !digits.iter().all(u8::is_ascii_digit) {
                    return None;
                }
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
                match name {
                    "YYYY" => fields.year = value as i32,
                    "MM" => fields.month = value,
                    "DD" => fields.day = value,
                    "HH" => fields.hour = value,
                    "mm" => fields.minute = value,
                    _ => fields.second = value,
                }
                pos += width;
                rest = after;
                continue 'layout;
            }
        }

        let literal = rest.as_bytes()[0];
        if input.get(pos) != Some(&literal) {
            return None;
        }
        if literal == b'Z' {
            fields.utc = true;
        }
        pos += 1;
        rest = &rest[1..];
    }

    (pos == input.len()).then_some(fields)
}

/// Try to read `token` as an absolute instant.
///
/// Local tokens are placed on the timeline through `zone`; tokens ending in
/// `Z` are UTC. The first layout that matches structurally decides the
/// outcome: a calendrically invalid value such as month 13, hour 24 or a
/// wall-clock time inside a DST gap is rejected, not coerced or retried
/// against another layout.
pub fn match_absolute(token: &str, zone: CivilZone) -> Option<AbsoluteInstant> {
    let (layout, fields) = LAYOUTS
        .iter()
        .find_map(|layout| match_layout(layout, token).map(|f| (layout, f)))?;

    let civil = NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)?
        .and_hms_opt(fields.hour, fields.minute, fields.second);
    let Some(civil) = civil else {
        tracing::trace!(token, layout, "structurally valid but not a real time");
        return None;
    };

    let matched = if fields.utc {
        CivilZone::Utc.to_instant(civil).map(AbsoluteInstant::utc)
    } else {
        zone.to_instant(civil).map(AbsoluteInstant::local)
    };
    match &matched {
        Some(at) => tracing::trace!(token, layout, instant = %at.instant, "matched absolute layout"),
        None => tracing::trace!(token, layout, "wall-clock time does not exist in zone"),
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_unique() {
        let mut sorted = LAYOUTS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), LAYOUTS.len());
    }

    #[test]
    fn match_layout_extracts_fields() {
        let fields = match_layout("YYYYMMDDTHHmmssZ", "20150731T225959Z").unwrap();
        assert_eq!(
            fields,
            Fields {
                year: 2015,
                month: 7,
                day: 31,
                hour: 22,
                minute: 59,
                second: 59,
                utc: true,
            }
        );
    }

    #[test]
    fn match_layout_is_strict() {
        assert!(match_layout("YYYY-MM-DD", "2015-7-31").is_none());
        assert!(match_layout("YYYY-MM-DD", "2015-07-31 ").is_none());
        assert!(match_layout("YYYY-MM-DD", "2015-07-3").is_none());
        assert!(match_layout("YYYY-MM-DD HH:mm", "2015-07-31T22:59").is_none());
        assert!(match_layout("YYYYMMDD", "2015073").is_none());
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        assert!(match_layout("YYYY-MM-DD", "2015-07-3é").is_none());
        assert!(match_absolute("ünïcode", CivilZone::Utc).is_none());
    }
}
