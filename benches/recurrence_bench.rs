// Benchmark for recurrence expansion
// Measures each expansion strategy and how cost grows with COUNT

use chrono::TimeZone;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rrule_calc::services::recurrence::{parse_rule, RecurrenceCalculator};

fn expand(rule: &str) -> Vec<String> {
    let start = chrono_tz::UTC
        .with_ymd_and_hms(1997, 9, 2, 9, 0, 0)
        .unwrap();
    RecurrenceCalculator::new(parse_rule(rule), start, None).compute()
}

fn bench_count_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("weekly_by_count");

    for count in [10, 100, 1000].iter() {
        let rule = format!("FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT={}", count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &rule, |b, rule| {
            b.iter(|| expand(black_box(rule)));
        });
    }

    group.finish();
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_comparison");

    group.bench_function("daily_fallback", |b| {
        b.iter(|| expand(black_box("FREQ=DAILY;COUNT=365")));
    });

    group.bench_function("month_day", |b| {
        b.iter(|| expand(black_box("FREQ=MONTHLY;BYMONTHDAY=1,-1;COUNT=200")));
    });

    group.bench_function("relative_byday", |b| {
        b.iter(|| expand(black_box("FREQ=MONTHLY;BYDAY=1SU,-1SU;COUNT=200")));
    });

    group.bench_function("sparse_friday_13th", |b| {
        b.iter(|| expand(black_box("FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13;COUNT=20")));
    });

    group.finish();
}

criterion_group!(benches, bench_count_growth, bench_strategies);
criterion_main!(benches);
