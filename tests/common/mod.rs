//! Common test utilities module
//!
//! Shared frame fixtures and temporary configuration files.

#![allow(dead_code)]

use std::io::Write;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use framekit::{Column, DataFrame, Index, TimestampColumn};
use tempfile::NamedTempFile;

/// 地域ごとの売上データ
pub fn sales_frame() -> DataFrame {
    DataFrame::from_columns(vec![
        ("region", Column::from(vec!["east", "west", "east", "north", "west", "east"])),
        ("units", Column::from(vec![10i64, 20, 30, 40, 50, 60])),
        ("price", Column::from(vec![1.5f64, 2.0, 2.5, 3.0, 3.5, 4.0])),
    ])
    .unwrap()
}

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Frame with one Int64 column `v` indexed by `base_time() + offsets` minutes
pub fn minute_frame(offsets: &[i64], values: Vec<i64>) -> DataFrame {
    let stamps: Vec<NaiveDateTime> = offsets
        .iter()
        .map(|&m| base_time() + Duration::minutes(m))
        .collect();
    let index = TimestampColumn::from_datetimes(&stamps, "").unwrap();
    DataFrame::from_columns(vec![("v", Column::from(values))])
        .unwrap()
        .with_index(Index::new(Column::Timestamp(index)))
        .unwrap()
}

/// Frame indexed by Int64 labels
pub fn labelled_frame(labels: Vec<i64>, columns: Vec<(&str, Column)>) -> DataFrame {
    DataFrame::from_columns(columns)
        .unwrap()
        .with_index(Index::new(Column::from(labels)))
        .unwrap()
}

/// Temporary file with the given extension holding `contents`
pub fn config_file(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("framekit_test_")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
