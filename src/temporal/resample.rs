use chrono::DateTime;
use log::debug;

use crate::column::{Column, ColumnBuilder, ColumnType, Int64Column, Scalar};
use crate::compute::kernels;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::groupby::GroupBy;
use crate::temporal::bins::generate_bins;
use crate::temporal::date_range::{datetime_range, RangeBound};

/// Minimum number of rows a frame needs to be resampled
pub const MIN_RESAMPLE_ROWS: usize = 3;

/// Name of the key column produced by resampling
pub const RESAMPLE_KEY: &str = "key";

/// リサンプリングの設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResampleOptions {
    /// A timestamp equal to a bin edge falls into the bin on its left
    pub closed_right: bool,
    /// Label each bin with its right edge instead of its left edge
    pub label_right: bool,
    /// Timezone tag of the bin labels; empty keeps the index's own tag
    pub tz: String,
}

impl ResampleOptions {
    pub fn new(closed_right: bool, label_right: bool) -> Self {
        Self {
            closed_right,
            label_right,
            tz: String::new(),
        }
    }

    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.tz = tz.into();
        self
    }
}

/// Nanosecond view of the frame's index
fn index_nanos(frame: &DataFrame) -> Result<(Int64Column, Option<String>)> {
    match frame.index().labels() {
        Column::Timestamp(ts) => Ok((ts.nanos().clone(), ts.timezone().map(str::to_string))),
        Column::Int64(values) => Ok((values.clone(), None)),
        other => Err(Error::TypeMismatch {
            expected: ColumnType::Timestamp(None),
            found: other.column_type(),
        }),
    }
}

/// 時刻インデックスを固定幅の区間にまとめ、区間ごとのGroupByを作る
///
/// Bin edges run from the first index timestamp in steps of `freq`, one step
/// past the last timestamp when needed so that every row falls inside a bin.
/// Each row is keyed by the label of its bin; bins that receive no rows do not
/// appear as groups.
pub fn resample<'a>(frame: &'a DataFrame, freq: &str, options: &ResampleOptions) -> Result<GroupBy<'a>> {
    let rows = frame.row_count();
    if rows < MIN_RESAMPLE_ROWS {
        return Err(Error::InsufficientRows {
            rows,
            required: MIN_RESAMPLE_ROWS,
        });
    }

    let (values, index_tz) = index_nanos(frame)?;
    let tz = if options.tz.is_empty() {
        index_tz.unwrap_or_default()
    } else {
        options.tz.clone()
    };
    if values.values().windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::InvalidInput("index is not sorted ascending".to_string()));
    }
    let first_ns = *values
        .get(0)?
        .ok_or_else(|| Error::InvalidInput("index contains nulls".to_string()))?;
    let last_ns = *values
        .get(rows - 1)?
        .ok_or_else(|| Error::InvalidInput("index contains nulls".to_string()))?;
    let first = DateTime::from_timestamp_nanos(first_ns).naive_utc();
    let last = DateTime::from_timestamp_nanos(last_ns).naive_utc();

    let mut edges = datetime_range(first, RangeBound::End(last), freq, &tz)?;
    // at least one full bin whose right edge reaches the last timestamp
    let covered = |edges: &Int64Column| {
        edges.len() >= 2
            && edges.values().last().map_or(false, |&edge| {
                edge > last_ns || (options.closed_right && edge == last_ns)
            })
    };
    if !covered(edges.nanos()) {
        edges = datetime_range(first, RangeBound::Periods(edges.len() + 1), freq, &tz)?;
    }

    let bins = generate_bins(&values, edges.nanos(), options.closed_right)?;

    // closed_right and closed_left label the same way: right labels skip the first edge
    let mut labels: Vec<i64> = edges.nanos().values().to_vec();
    if options.label_right {
        labels.remove(0);
    }
    labels.truncate(bins.len());
    debug!(
        "resample {} rows at {}: {} edges, {} bins",
        rows,
        freq,
        edges.len(),
        bins.len()
    );

    let mut keys = ColumnBuilder::with_capacity(ColumnType::Int64, rows)?;
    let mut left = 0;
    for (&right, &label) in bins.iter().zip(&labels) {
        keys.append_scalar_n(&Scalar::Int64(label), right - left)
            .map_err(|e| Error::BuildError(e.to_string()))?;
        left = right;
    }
    let keys = kernels::cast(&keys.finish(), &ColumnType::timestamp(&tz))?;

    GroupBy::from_keys(frame, &keys, RESAMPLE_KEY, false)
}

impl DataFrame {
    /// 時刻インデックスでリサンプリングする
    pub fn resample(&self, freq: &str, options: &ResampleOptions) -> Result<GroupBy<'_>> {
        resample(self, freq, options)
    }
}
