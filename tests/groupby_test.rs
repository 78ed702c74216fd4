mod common;

use framekit::{Column, ColumnType, DataFrame, Error, ReduceOp, Scalar};

use common::sales_frame;

#[test]
fn test_groupby_creation() {
    // GroupByの基本的な作成
    let df = sales_frame();
    let grouped = df.groupby("region").unwrap();
    assert_eq!(grouped.group_count(), 3);
    assert!(grouped
        .keys()
        .equals(&Column::from(vec!["east", "west", "north"])));
}

#[test]
fn test_groupby_size() {
    let df = sales_frame();
    let sizes = df.groupby("region").unwrap().size().unwrap();
    assert_eq!(sizes.get_by_label(&Scalar::from("east")), Some(Scalar::Int64(3)));
    assert_eq!(sizes.get_by_label(&Scalar::from("west")), Some(Scalar::Int64(2)));
    assert_eq!(sizes.get_by_label(&Scalar::from("north")), Some(Scalar::Int64(1)));
}

#[test]
fn test_groupby_sum_frame() {
    // グループごとの合計
    let df = sales_frame();
    let sums = df.groupby("region").unwrap().sum(&[]).unwrap();

    assert_eq!(sums.row_count(), 3);
    assert_eq!(sums.column_names(), vec!["units", "price", "region"]);
    assert!(sums
        .column("units")
        .unwrap()
        .equals(&Column::from(vec![100i64, 70, 40])));
    assert!(sums
        .column("price")
        .unwrap()
        .equals(&Column::from(vec![8.0f64, 5.5, 3.0])));
    assert!(sums
        .column("region")
        .unwrap()
        .equals(&Column::from(vec!["east", "west", "north"])));
}

#[test]
fn test_groupby_mean_series() {
    let df = sales_frame();
    let means = df.groupby("region").unwrap().mean_series("units").unwrap();
    assert_eq!(means.name(), "units");
    assert_eq!(means.data_type(), ColumnType::Float64);
    assert_eq!(means.get_by_label(&Scalar::from("east")), Some(Scalar::Float64(100.0 / 3.0)));
    assert_eq!(means.index().name(), Some("region"));
}

#[test]
fn test_sorted_keys_fix_output_order() {
    let df = sales_frame();
    let grouped = df.groupby_with_sort("region", true).unwrap();
    let maxes = grouped.max(&["units"]).unwrap();
    assert!(maxes
        .column("region")
        .unwrap()
        .equals(&Column::from(vec!["east", "north", "west"])));
    assert!(maxes
        .column("units")
        .unwrap()
        .equals(&Column::from(vec![60i64, 40, 50])));
}

#[test]
fn test_repeated_aggregation_is_deterministic() {
    let df = sales_frame();
    let grouped = df.groupby("region").unwrap();
    let first = grouped.agg(ReduceOp::Sum, &["units", "price"]).unwrap();
    for _ in 0..5 {
        let again = grouped.agg(ReduceOp::Sum, &["units", "price"]).unwrap();
        assert!(again.equals(&first));
    }
}

#[test]
fn test_count_skips_nulls() {
    let values = framekit::column::Int64Column::from_options(vec![Some(1), None, Some(3), None]);
    let df = DataFrame::from_columns(vec![
        ("k", Column::from(vec!["a", "a", "b", "b"])),
        ("v", Column::Int64(values)),
    ])
    .unwrap();
    let grouped = df.groupby("k").unwrap();

    let counts = grouped.count(&["v"]).unwrap();
    assert!(counts.column("v").unwrap().equals(&Column::from(vec![1i64, 1])));

    let sums = grouped.sum_series("v").unwrap();
    assert_eq!(sums.get(0).unwrap(), Scalar::Int64(1));
    assert_eq!(sums.get(1).unwrap(), Scalar::Int64(3));
}

#[test]
fn test_get_group() {
    let df = sales_frame();
    let grouped = df.groupby("region").unwrap();
    let west = grouped.get_group(&Scalar::from("west")).unwrap();
    assert_eq!(west.row_count(), 2);
    assert!(west.column("units").unwrap().equals(&Column::from(vec![20i64, 50])));
    assert!(grouped.get_group(&Scalar::from("south")).is_err());
}

#[test]
fn test_unsupported_aggregation_fails_whole_call() {
    let df = sales_frame();
    let grouped = df.groupby("units").unwrap();
    match grouped.sum(&["region"]) {
        Err(Error::AggregationFailed { function, column, .. }) => {
            assert_eq!(function, "sum");
            assert_eq!(column, "region");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_variance_and_std() {
    let df = DataFrame::from_columns(vec![
        ("k", Column::from(vec![1i64, 1, 1, 2, 2])),
        ("v", Column::from(vec![2.0f64, 4.0, 6.0, 1.0, 3.0])),
    ])
    .unwrap();
    let grouped = df.groupby("k").unwrap();
    let var = grouped.var_series("v").unwrap();
    assert_eq!(var.get(0).unwrap(), Scalar::Float64(4.0));
    assert_eq!(var.get(1).unwrap(), Scalar::Float64(2.0));
    let std = grouped.std_series("v").unwrap();
    assert_eq!(std.get(0).unwrap(), Scalar::Float64(2.0));
}

#[test]
fn test_missing_column() {
    let df = sales_frame();
    assert!(matches!(df.groupby("nope"), Err(Error::ColumnNotFound(_))));
}

#[test]
fn test_aggregating_the_key_column_renames_the_key() {
    let df = DataFrame::from_columns(vec![
        ("k", Column::from(vec![1i64, 2, 1, 2])),
        ("v", Column::from(vec![10i64, 20, 30, 40])),
    ])
    .unwrap();
    let maxes = df.groupby("k").unwrap().max(&["k", "v"]).unwrap();

    assert_eq!(maxes.column_names(), vec!["k", "v", "k_1"]);
    assert!(maxes.column("k").unwrap().equals(&Column::from(vec![1i64, 2])));
    assert!(maxes.column("v").unwrap().equals(&Column::from(vec![30i64, 40])));
    assert!(maxes.column("k_1").unwrap().equals(&Column::from(vec![1i64, 2])));
}
