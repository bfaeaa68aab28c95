//! End-to-end checks of the two-phase pipeline through the public API
//!
//! Each partition is pre-aggregated on its own, partials are regrouped by key
//! and reduced, exactly as an external batch runtime would drive the core.

use proptest::prelude::*;
use sensor_rollup::core::aggregation::{
    aggregate, CountPerMinute, CountState, JobKind, MeanPerMinute, MeanState, SensorMinute,
    Statistic,
};
use sensor_rollup::core::{finalize, preaggregate, MalformedPolicy, MinuteBucket, PipelineOptions};
use sensor_rollup::error::{RecordError, RollupError};
use sensor_rollup::runtime::{self, run_local, Row, RunOptions};
use stillwater::Semigroup;

// 2015-06-30 14:05:00.000 at GMT-3
const AT_14_05: i64 = 1_435_683_900_000;

fn numbered(lines: &[&str]) -> Vec<(usize, String)> {
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| (i + 1, l.to_string()))
        .collect()
}

fn bucket(hour: u8, minute: u8) -> MinuteBucket {
    MinuteBucket::new(hour, minute).unwrap()
}

#[test]
fn test_mean_split_across_two_partitions() {
    let left = [
        format!("s1;temp;{AT_14_05};10"),
        format!("s2;temp;{};20", AT_14_05 + 1_000),
    ];
    let right = [
        format!("s3;temp;{};30", AT_14_05 + 2_000),
        format!("s4;temp;{};40", AT_14_05 + 3_000),
    ];
    let options = PipelineOptions::default();

    let a = preaggregate::<MeanPerMinute, _, _>(
        left.iter().enumerate().map(|(i, l)| (i + 1, l.as_str())),
        &options,
    )
    .unwrap();
    let b = preaggregate::<MeanPerMinute, _, _>(
        right.iter().enumerate().map(|(i, l)| (i + 3, l.as_str())),
        &options,
    )
    .unwrap();

    assert_eq!(a.partials, vec![(bucket(14, 5), MeanState { sum: 30.0, count: 2 })]);
    assert_eq!(b.partials, vec![(bucket(14, 5), MeanState { sum: 70.0, count: 2 })]);

    let merged = a.partials[0].1.combine(b.partials[0].1);
    assert_eq!(merged, MeanState { sum: 100.0, count: 4 });

    let rows = finalize::<MeanPerMinute, _>(a.partials.into_iter().chain(b.partials)).unwrap();
    assert_eq!(rows, vec![(bucket(14, 5), 25.0)]);
}

#[test]
fn test_three_records_count_three() {
    let lines = vec![
        format!("sensorA;power;{AT_14_05}"),
        format!("sensorA;power;{}", AT_14_05 + 10_000),
        format!("sensorA;power;{}", AT_14_05 + 20_000),
    ];

    let report = run_local::<CountPerMinute>(&lines, &RunOptions::default()).unwrap();
    let key = SensorMinute {
        sensor_id: "sensorA".to_string(),
        bucket: bucket(14, 5),
    };
    assert_eq!(report.rows, vec![(key, 3)]);
}

#[test]
fn test_minute_boundary_splits_buckets() {
    let lines = vec![
        format!("sensorA;power;{}", AT_14_05 + 59_999),
        format!("sensorA;power;{}", AT_14_05 + 60_000),
    ];

    let report = runtime::run(JobKind::Count, &lines, &RunOptions::default()).unwrap();
    let keys: Vec<&str> = report.rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["sensorA 14:05", "sensorA 14:06"]);
}

#[test]
fn test_two_field_line_is_fatal_by_default() {
    let lines = vec![
        format!("sensorA;power;{AT_14_05}"),
        "sensorA;power".to_string(),
        format!("sensorA;power;{AT_14_05}"),
    ];
    let options = RunOptions {
        partitions: 2,
        ..RunOptions::default()
    };

    let err = runtime::run(JobKind::Count, &lines, &options).unwrap_err();
    match err {
        RollupError::Record { line, source } => {
            assert_eq!(line, 2);
            assert_eq!(
                source,
                RecordError::MalformedRecord {
                    required: 3,
                    found: 2
                }
            );
        }
        other => panic!("expected a record error, got {other:?}"),
    }
}

#[test]
fn test_two_field_line_is_skipped_on_request() {
    let lines = vec![
        format!("sensorA;power;{AT_14_05}"),
        "sensorA;power".to_string(),
        format!("sensorA;power;{AT_14_05}"),
    ];
    let mut options = RunOptions {
        partitions: 2,
        ..RunOptions::default()
    };
    options.pipeline.on_malformed = MalformedPolicy::Skip;

    let report = runtime::run(JobKind::Count, &lines, &options).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.records, 2);
    assert_eq!(
        report.rows,
        vec![Row {
            key: "sensorA 14:05".to_string(),
            value: Statistic::Count(2)
        }]
    );
}

#[test]
fn test_re_reducing_reduced_set_is_unchanged() {
    let lines = [
        "a;t;1435683900000",
        "b;t;1435683900000",
        "a;t;1435683960000",
        "a;t;1435683900000",
    ];
    let out =
        preaggregate::<CountPerMinute, _, _>(numbered(&lines), &PipelineOptions::default()).unwrap();
    let reduced = aggregate(out.partials.clone());
    let again = aggregate(reduced.clone());

    assert_eq!(reduced, again);
    assert_eq!(reduced.len(), 3);
    assert!(reduced.values().any(|s| *s == CountState { count: 2 }));
}

#[test]
fn test_mean_ignores_sensor_identity() {
    let lines = vec![
        format!("north;temp;{AT_14_05};1"),
        format!("south;temp;{AT_14_05};3"),
    ];

    let report = runtime::run(JobKind::Mean, &lines, &RunOptions::default()).unwrap();
    assert_eq!(
        report.rows,
        vec![Row {
            key: "14:05".to_string(),
            value: Statistic::Mean(2.0)
        }]
    );
}

fn reading_line() -> impl Strategy<Value = String> {
    (0usize..4, 0i64..180, -50i32..50).prop_map(|(sensor, second, value)| {
        format!(
            "sensor{sensor};temp;{};{value}",
            AT_14_05 + second * 1_000
        )
    })
}

proptest! {
    #[test]
    fn prop_layout_never_changes_counts(
        lines in prop::collection::vec(reading_line(), 0..120),
        partitions in 1usize..9,
        reducers in 1usize..5,
        combine in any::<bool>(),
    ) {
        let baseline = runtime::run(JobKind::Count, &lines, &RunOptions::default()).unwrap();
        let mut options = RunOptions { partitions, reducers, ..RunOptions::default() };
        options.pipeline.combine = combine;

        let report = runtime::run(JobKind::Count, &lines, &options).unwrap();
        prop_assert_eq!(report.rows, baseline.rows);
        prop_assert_eq!(report.records, lines.len());
    }

    #[test]
    fn prop_layout_never_changes_means(
        lines in prop::collection::vec(reading_line(), 1..120),
        partitions in 1usize..9,
        reducers in 1usize..5,
        combine in any::<bool>(),
    ) {
        // Integer-valued readings keep every partial sum exact
        let baseline = runtime::run(JobKind::Mean, &lines, &RunOptions::default()).unwrap();
        let mut options = RunOptions { partitions, reducers, ..RunOptions::default() };
        options.pipeline.combine = combine;

        let report = runtime::run(JobKind::Mean, &lines, &options).unwrap();
        prop_assert_eq!(report.rows, baseline.rows);
    }
}
