//! Property-based tests for duration parsing and resolution.
//!
//! These check invariants that hold for any generated input, not just the
//! examples in `duration_tests.rs` and `resolver_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use timespan_core::{match_duration, CivilZone, ParsedDuration, Resolver, Separator};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_field() -> impl Strategy<Value = Option<u64>> {
    prop::option::of(0u64..=5000)
}

/// Durations with at least one field set.
fn arb_duration() -> impl Strategy<Value = ParsedDuration> {
    (
        arb_field(),
        arb_field(),
        arb_field(),
        arb_field(),
        arb_field(),
        arb_field(),
    )
        .prop_filter("at least one field", |f| {
            f.0.is_some() || f.1.is_some() || f.2.is_some() || f.3.is_some() || f.4.is_some() || f.5.is_some()
        })
        .prop_map(|(years, months, days, hours, minutes, seconds)| ParsedDuration {
            sign: None,
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        })
}

/// Anchor instants between 2000 and 2030.
fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..1_893_456_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_expression() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("2h30m8s".to_string()),
        Just("2h/+1h".to_string()),
        Just("2h/-1h".to_string()),
        Just("2016-06-24T18:42/2016-06-24T18:52:30".to_string()),
        Just("2015-06-01T22:22:22/+1y2M88d11h66m88s".to_string()),
        Just("last friday at 13:30".to_string()),
        Just("1M/+P1DT4H".to_string()),
        (1u32..100_000).prop_map(|m| m.to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Each field set on its own to a distinct positive value is recovered
    /// exactly from the canonical form.
    #[test]
    fn single_field_round_trips(value in 1u64..=1_000_000, field in 0usize..6) {
        let mut d = ParsedDuration::default();
        match field {
            0 => d.years = Some(value),
            1 => d.months = Some(value),
            2 => d.days = Some(value),
            3 => d.hours = Some(value),
            4 => d.minutes = Some(value),
            _ => d.seconds = Some(value),
        }
        prop_assert_eq!(match_duration(&d.to_string()), Some(d));
    }

    /// All six fields with distinct values survive a round trip together.
    #[test]
    fn all_fields_round_trip(
        base in 1u64..=10_000,
    ) {
        let d = ParsedDuration {
            sign: None,
            years: Some(base),
            months: Some(base + 1),
            days: Some(base + 2),
            hours: Some(base + 3),
            minutes: Some(base + 4),
            seconds: Some(base + 5),
        };
        prop_assert_eq!(match_duration(&d.to_string()), Some(d));
    }

    /// Any combination of fields round trips through the canonical form.
    #[test]
    fn arbitrary_duration_round_trips(d in arb_duration()) {
        prop_assert_eq!(match_duration(&d.to_string()), Some(d));
    }

    /// Clock-only durations shift by exactly their number of seconds.
    #[test]
    fn clock_durations_are_exact(
        h in 0u64..100, m in 0u64..100, s in 0u64..100, now in arb_now(),
    ) {
        let d = match_duration(&format!("{h}h{m}m{s}s")).unwrap();
        let total = (h * 3600 + m * 60 + s) as i64;
        prop_assert_eq!(
            d.subtract_from(now, CivilZone::Utc).unwrap(),
            now - Duration::seconds(total)
        );
    }

    /// Resolving twice with the same `now` gives identical results.
    #[test]
    fn resolution_is_idempotent(expression in arb_expression(), now in arb_now()) {
        let resolver = Resolver::new(Separator::default(), CivilZone::Utc);
        let first = resolver.resolve(&expression, now);
        let second = resolver.resolve(&expression, now);
        prop_assert_eq!(first, second);
    }

    /// A `+` range ends exactly where the duration lands from its start.
    #[test]
    fn plus_range_end_follows_start(d in arb_duration(), now in arb_now()) {
        let resolver = Resolver::new(Separator::default(), CivilZone::Utc);
        let expression = format!("2016-06-24T18:42/+{d}");
        let range = resolver.resolve(&expression, now).unwrap();
        let start = range.start.instant;
        prop_assert_eq!(range.end.unwrap().instant, d.add_to(start, CivilZone::Utc).unwrap());
    }
}
