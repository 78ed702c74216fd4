//! Property-based tests for binning, date ranges, resampling and group-by.

mod common;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use framekit::column::Int64Column;
use framekit::temporal::{bin_counts, generate_bins};
use framekit::{concat, datetime_range, Axis, Column, DataFrame, JoinType, RangeBound, ResampleOptions};

use common::{base_time, minute_frame};

// ---------------------------------------------------------------------------
// Strategy generators
// ---------------------------------------------------------------------------

/// Sorted values inside `[0, 1000]`
fn arb_sorted_values() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0i64..=1000, 1..60).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

/// Strictly increasing edges from 0 to 1000 with interior cut points
fn arb_edges() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::btree_set(1i64..1000, 0..12).prop_map(|cuts| {
        let mut edges = vec![0];
        edges.extend(cuts);
        edges.push(1000);
        edges
    })
}

/// Sorted, distinct minute offsets with at least 3 rows
fn arb_offsets() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::btree_set(0i64..500, 3..40).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_bins_partition_every_value(
        values in arb_sorted_values(),
        edges in arb_edges(),
        closed_right in any::<bool>(),
    ) {
        let bins = generate_bins(
            &Int64Column::new(values.clone()),
            &Int64Column::new(edges.clone()),
            closed_right,
        )
        .unwrap();

        prop_assert_eq!(bins.len(), edges.len() - 1);
        prop_assert!(bins.windows(2).all(|w| w[0] <= w[1]));

        // closed-left では最後の境界と等しい値はどの区間にも入らない
        let counts = bin_counts(&bins).unwrap();
        let dropped = if closed_right { 0 } else { values.iter().filter(|&&v| v == 1000).count() };
        prop_assert_eq!(counts.iter().sum::<usize>() + dropped, values.len());
        for (i, &end) in bins.iter().enumerate() {
            let right = edges[i + 1];
            let expected = values
                .iter()
                .filter(|&&v| if closed_right { v <= right } else { v < right })
                .count();
            prop_assert_eq!(end, expected);
        }
    }

    #[test]
    fn prop_datetime_range_is_strictly_increasing(
        step in 1i64..180,
        span in 0i64..5000,
    ) {
        let start = base_time();
        let end = start + Duration::minutes(span);
        let freq = format!("{}min", step);
        let range = datetime_range(start, RangeBound::End(end), &freq, "").unwrap();

        let nanos = range.nanos().values();
        prop_assert_eq!(nanos.len() as i64, span / step + 1);
        prop_assert!(nanos.windows(2).all(|w| w[1] - w[0] == step * 60_000_000_000));
        prop_assert_eq!(range.datetime(0).unwrap(), Some(start));
    }

    #[test]
    fn prop_date_range_periods_count(periods in 0usize..40, day in 1u32..28) {
        let start = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
        let range = framekit::date_range(start, RangeBound::Periods(periods), "M", "").unwrap();
        prop_assert_eq!(range.len(), periods);
        let nanos = range.nanos().values();
        prop_assert!(nanos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_resample_covers_every_row(
        offsets in arb_offsets(),
        step in 1i64..60,
        closed_right in any::<bool>(),
        label_right in any::<bool>(),
    ) {
        let values: Vec<i64> = (0..offsets.len() as i64).collect();
        let df = minute_frame(&offsets, values);
        let options = ResampleOptions::new(closed_right, label_right);
        let grouped = df.resample(&format!("{}min", step), &options).unwrap();

        let total: usize = grouped.partition().sizes().iter().sum();
        prop_assert_eq!(total, df.row_count());

        let keys: Vec<i64> = grouped.keys().scalars().filter_map(|s| s.as_i64()).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_groupby_count_matches_rows(keys in proptest::collection::vec(0i64..8, 1..80)) {
        let df = DataFrame::from_columns(vec![
            ("k", Column::from(keys.clone())),
            ("v", Column::from(vec![1i64; keys.len()])),
        ])
        .unwrap();
        let grouped = df.groupby("k").unwrap();
        let sums = grouped.sum_series("v").unwrap();
        let total: i64 = sums.column().scalars().filter_map(|s| s.as_i64()).sum();
        prop_assert_eq!(total as usize, keys.len());
        prop_assert_eq!(grouped.group_count(), sums.len());
    }

    #[test]
    fn prop_outer_row_concat_row_count(left in 0usize..20, right in 0usize..20) {
        let a = DataFrame::from_columns(vec![("a", Column::from(vec![1i64; left]))]).unwrap();
        let b = DataFrame::from_columns(vec![("b", Column::from(vec![2i64; right]))]).unwrap();
        let out = concat(&[&a, &b], Axis::Index, JoinType::Outer, true, false).unwrap();
        prop_assert_eq!(out.row_count(), left + right);
        prop_assert_eq!(out.column("a").unwrap().null_count(), right);
        prop_assert_eq!(out.column("b").unwrap().null_count(), left);
    }
}
