use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use timespan_core::{match_absolute, match_duration, CivilZone, Resolver, Separator};

fn bench_matchers(c: &mut Criterion) {
    c.bench_function("match_absolute_last_layout", |b| {
        b.iter(|| match_absolute(black_box("20150731T225959Z"), CivilZone::Utc))
    });
    c.bench_function("match_duration_all_fields", |b| {
        b.iter(|| match_duration(black_box("+1y2M88d11h66m88s")))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = Resolver::new(Separator::default(), CivilZone::Utc);
    let now = Utc.with_ymd_and_hms(2016, 6, 24, 20, 0, 0).unwrap();

    let mut group = c.benchmark_group("resolve");
    for expression in [
        "2h30m8s",
        "2016-06-24T18:42/2016-06-24T18:52:30",
        "2015-06-01T22:22:22/+1y2M88d11h66m88s",
        "last friday at 13:30",
    ] {
        group.bench_function(expression, |b| {
            b.iter(|| resolver.resolve(black_box(expression), now))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matchers, bench_resolve);
criterion_main!(benches);
