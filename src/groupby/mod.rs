//! グループ化と並列集計
//!
//! A [`GroupBy`] pairs a frame with a [`GroupPartition`]. Every aggregation
//! fans out over the requested columns and, inside each column, over the
//! groups; each task fills its own output slot, so the result order is the key
//! enumeration order no matter which worker finishes first.

mod partition;

pub use partition::GroupPartition;

use std::collections::HashSet;

use log::debug;

use crate::column::{Column, ColumnBuilder, Scalar};
use crate::compute::{self, kernels, Datum, ReduceOp};
use crate::dataframe::concat::unique_name;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::parallel;
use crate::series::Series;

/// グループ化した結果を表す構造体
#[derive(Debug, Clone)]
pub struct GroupBy<'a> {
    /// 元のDataFrame
    frame: &'a DataFrame,

    /// キーによる行の分割
    partition: GroupPartition,

    /// 出力のキー列の名前
    key_name: String,

    /// キーが元のDataFrameの列であればその名前（既定の集計対象から外す）
    key_column: Option<String>,
}

impl<'a> GroupBy<'a> {
    /// 列の値でグループ化する
    pub fn new(frame: &'a DataFrame, by: &str, sort: bool) -> Result<Self> {
        let keys = frame.column(by)?;
        let partition = GroupPartition::from_keys(keys, sort)?;
        debug!(
            "groupby '{}': {} rows into {} groups",
            by,
            frame.row_count(),
            partition.len()
        );
        Ok(Self {
            frame,
            partition,
            key_name: by.to_string(),
            key_column: Some(by.to_string()),
        })
    }

    /// 行ごとのキー配列でグループ化する（キーは DataFrame の列でなくてもよい）
    pub fn from_keys(frame: &'a DataFrame, keys: &Column, key_name: &str, sort: bool) -> Result<Self> {
        if keys.len() != frame.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: frame.row_count(),
                found: keys.len(),
            });
        }
        Ok(Self {
            frame,
            partition: GroupPartition::from_keys(keys, sort)?,
            key_name: key_name.to_string(),
            key_column: None,
        })
    }

    /// グループ数を取得
    pub fn group_count(&self) -> usize {
        self.partition.len()
    }

    pub fn partition(&self) -> &GroupPartition {
        &self.partition
    }

    /// Unique keys in output order
    pub fn keys(&self) -> &Column {
        self.partition.keys()
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    fn key_index(&self) -> Index {
        Index::with_name(self.partition.keys().clone(), Some(self.key_name.clone()))
    }

    /// 各グループのサイズ（キーをインデックスとするSeries）
    pub fn size(&self) -> Result<Series> {
        let sizes: Vec<i64> = self.partition.sizes().into_iter().map(|n| n as i64).collect();
        Series::with_index("size", Column::from(sizes), self.key_index())
    }

    /// キーに属する行だけのDataFrame
    pub fn get_group(&self, key: &Scalar) -> Result<DataFrame> {
        let group = self
            .partition
            .position(key)
            .ok_or_else(|| Error::InvalidInput(format!("no group for key {}", key)))?;
        self.frame.take_rows(self.partition.rows(group))
    }

    /// Names aggregated when the caller passes no column list
    fn default_columns(&self) -> Vec<&str> {
        self.frame
            .column_names()
            .into_iter()
            .filter(|name| self.key_column.as_deref() != Some(*name))
            .collect()
    }

    /// Reduces one column group by group
    fn aggregate_column(&self, op: ReduceOp, name: &str, column: &Column) -> Result<Column> {
        let failed = |e: Error| Error::AggregationFailed {
            function: op.name().to_string(),
            column: name.to_string(),
            message: e.to_string(),
        };
        let output_type = compute::output_type(op, &column.column_type()).map_err(failed)?;

        let slots = parallel::for_each_slot(self.partition.len(), |group| {
            let subset = kernels::take(column, self.partition.rows(group))?;
            compute::call(op.name(), &[Datum::Column(subset)])?
                .into_scalar()
                .ok_or_else(|| Error::compute(op.name(), "expected a scalar result"))
        });
        let values = parallel::try_collect(slots).map_err(failed)?;

        let mut builder = ColumnBuilder::with_capacity(output_type, values.len()).map_err(failed)?;
        for value in &values {
            builder.append_value(value).map_err(failed)?;
        }
        Ok(builder.finish())
    }

    /// 指定した集計を各列に適用する
    ///
    /// Returns one column per requested input column (all non-key columns when
    /// `columns` is empty) followed by the key column; one row per group. The
    /// key column takes a `_1`, `_2` suffix when an aggregated column already
    /// has its name.
    pub fn agg(&self, op: ReduceOp, columns: &[&str]) -> Result<DataFrame> {
        let names = if columns.is_empty() {
            self.default_columns()
        } else {
            columns.to_vec()
        };
        let sources = names
            .iter()
            .map(|name| self.frame.column(name))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "{} over {} columns x {} groups",
            op.name(),
            sources.len(),
            self.partition.len()
        );

        let slots = parallel::for_each_slot(sources.len(), |i| {
            self.aggregate_column(op, names[i], sources[i])
        });
        let results = parallel::try_collect(slots)?;

        let mut used: HashSet<String> = names.iter().map(|name| name.to_string()).collect();
        // 集計列と名前が重なるキー列は `key_1` のように付け替える
        let key_name = unique_name(&self.key_name, &mut used);
        let mut named: Vec<(String, Column)> = names
            .iter()
            .map(|name| name.to_string())
            .zip(results)
            .collect();
        named.push((key_name, self.partition.keys().clone()));
        DataFrame::from_columns(named)
    }

    /// 指定した集計を1列に適用し、キーをインデックスとするSeriesを返す
    pub fn agg_series(&self, op: ReduceOp, column: &str) -> Result<Series> {
        let source = self.frame.column(column)?;
        let result = self.aggregate_column(op, column, source)?;
        Series::with_index(column, result, self.key_index())
    }

    /// 各グループの合計を計算
    pub fn sum(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Sum, columns)
    }

    pub fn sum_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Sum, column)
    }

    /// 各グループの平均を計算
    pub fn mean(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Mean, columns)
    }

    pub fn mean_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Mean, column)
    }

    pub fn min(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Min, columns)
    }

    pub fn min_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Min, column)
    }

    pub fn max(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Max, columns)
    }

    pub fn max_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Max, column)
    }

    /// 各グループの非NULL件数
    pub fn count(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Count, columns)
    }

    pub fn count_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Count, column)
    }

    pub fn first(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::First, columns)
    }

    pub fn first_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::First, column)
    }

    pub fn last(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Last, columns)
    }

    pub fn last_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Last, column)
    }

    pub fn product(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Product, columns)
    }

    pub fn product_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Product, column)
    }

    /// 不偏分散
    pub fn var(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::Variance, columns)
    }

    pub fn var_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::Variance, column)
    }

    /// 標準偏差
    pub fn std(&self, columns: &[&str]) -> Result<DataFrame> {
        self.agg(ReduceOp::StdDev, columns)
    }

    pub fn std_series(&self, column: &str) -> Result<Series> {
        self.agg_series(ReduceOp::StdDev, column)
    }
}

impl DataFrame {
    /// 列の値でグループ化する（キーは初出順）
    pub fn groupby(&self, by: &str) -> Result<GroupBy<'_>> {
        GroupBy::new(self, by, false)
    }

    /// 列の値でグループ化する。`sort` ならキーを昇順に並べる
    pub fn groupby_with_sort(&self, by: &str, sort: bool) -> Result<GroupBy<'_>> {
        GroupBy::new(self, by, sort)
    }
}
