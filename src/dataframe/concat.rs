//! DataFrame concatenation operations
//!
//! Combines several frames either by stacking rows (with schema reconciliation)
//! or by aligning them on their row index and stacking columns.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::column::{Column, ColumnBuilder, Field};
use crate::compute::kernels;
use crate::dataframe::base::DataFrame;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::parallel;

/// Axis for concatenation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Stack rows (axis=0 in pandas)
    Index,
    /// Align on the row index and stack columns (axis=1 in pandas)
    Columns,
}

/// How column sets (row axis) or row indexes (column axis) are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Keep only what every input has
    Inner,
    /// Keep everything any input has, filling gaps with nulls
    Outer,
}

/// Concatenate DataFrames along an axis
///
/// # Arguments
/// * `frames` - DataFrames to concatenate, in order
/// * `axis` - `Axis::Index` stacks rows, `Axis::Columns` stacks columns
/// * `join` - Inner (intersection) or Outer (union) reconciliation
/// * `ignore_index` - Rows: replace the index with `0..n`. Columns: name the
///   output columns by their ordinal position
/// * `sort` - Rows: order the output fields by name. Columns: sort the combined index
///
/// # Example
/// ```ignore
/// use framekit::dataframe::{concat, Axis, JoinType};
///
/// let combined = concat(&[&df1, &df2], Axis::Index, JoinType::Outer, true, false)?;
/// ```
pub fn concat(
    frames: &[&DataFrame],
    axis: Axis,
    join: JoinType,
    ignore_index: bool,
    sort: bool,
) -> Result<DataFrame> {
    match frames {
        [] => Err(Error::EmptyInput("concat needs at least one frame".to_string())),
        [single] if !ignore_index && !sort => Ok((*single).clone()),
        _ => {
            debug!(
                "concat {} frames along {:?} ({:?} join)",
                frames.len(),
                axis,
                join
            );
            match axis {
                Axis::Index => concat_rows(frames, join, ignore_index, sort),
                Axis::Columns => concat_columns(frames, join, ignore_index, sort),
            }
        }
    }
}

/// Field list being reconciled across frames, plus the first-seen position of
/// every name encountered so far
struct SchemaFold {
    fields: Vec<Field>,
    order: HashMap<String, usize>,
}

impl SchemaFold {
    fn new(fields: &[Field]) -> Self {
        let order = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.clone(), i))
            .collect();
        Self {
            fields: fields.to_vec(),
            order,
        }
    }

    fn merge(self, other: &[Field], join: JoinType) -> Self {
        let mut order = self.order;
        for field in other {
            let next = order.len();
            order.entry(field.name.clone()).or_insert(next);
        }

        let fields = match join {
            JoinType::Inner => {
                let names: HashSet<&str> = other.iter().map(|f| f.name.as_str()).collect();
                self.fields
                    .into_iter()
                    .filter(|field| names.contains(field.name.as_str()))
                    .collect()
            }
            JoinType::Outer => {
                let mut fields = self.fields;
                let names: HashSet<String> = fields.iter().map(|f| f.name.clone()).collect();
                fields.extend(other.iter().filter(|f| !names.contains(&f.name)).cloned());
                fields
            }
        };
        Self { fields, order }
    }

    fn into_fields(self) -> Vec<Field> {
        let order = self.order;
        let mut fields = self.fields;
        fields.sort_by_key(|field| order.get(&field.name).copied().unwrap_or(usize::MAX));
        fields
    }
}

/// 列スキーマの調整（Inner は共通部分、Outer は和集合、初出順）
pub(crate) fn merge_fields(frames: &[&DataFrame], join: JoinType) -> Vec<Field> {
    let Some((first, rest)) = frames.split_first() else {
        return Vec::new();
    };
    rest.iter()
        .fold(SchemaFold::new(first.fields()), |fold, df| {
            fold.merge(df.fields(), join)
        })
        .into_fields()
}

/// Concatenate DataFrames vertically (row-wise)
fn concat_rows(
    frames: &[&DataFrame],
    join: JoinType,
    ignore_index: bool,
    sort: bool,
) -> Result<DataFrame> {
    let mut fields = merge_fields(frames, join);
    if sort {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let slots = parallel::for_each_slot(fields.len(), |i| {
        let field = &fields[i];
        let pieces = frames
            .iter()
            .map(|df| match df.column(&field.name) {
                Ok(column) => kernels::cast(column, &field.data_type),
                Err(_) => Column::new_null(&field.data_type, df.row_count()),
            })
            .collect::<Result<Vec<Column>>>()?;
        let refs: Vec<&Column> = pieces.iter().collect();
        kernels::concat(&refs)
    });
    let columns = parallel::try_collect(slots)?;

    let total_rows: usize = frames.iter().map(|df| df.row_count()).sum();
    let index = if ignore_index {
        Index::range(total_rows)
    } else {
        let labels: Vec<&Column> = frames.iter().map(|df| df.index().labels()).collect();
        Index::with_name(
            kernels::concat(&labels)?,
            frames[0].index().name().map(str::to_string),
        )
    };

    let named = fields
        .into_iter()
        .map(|field| field.name)
        .zip(columns)
        .collect();
    DataFrame::from_parts(named, index)
}

/// 行インデックスの調整（Inner は共通部分、Outer は重複なしの和集合）
pub(crate) fn merge_indexes(frames: &[&DataFrame], join: JoinType) -> Result<Index> {
    let Some((first, rest)) = frames.split_first() else {
        return Ok(Index::range(0));
    };
    match join {
        JoinType::Inner => rest
            .iter()
            .try_fold(first.index().clone(), |acc, df| acc.intersection(df.index())),
        JoinType::Outer => {
            let indexes: Vec<&Index> = frames.iter().map(|df| df.index()).collect();
            Index::union_unique(&indexes)
        }
    }
}

/// Rebuilds `column` (labelled by `source`) so that it follows `target`:
/// a label found in `source` copies the value, a missing label becomes null.
fn align_column(column: &Column, source: &Index, target: &Index) -> Result<Column> {
    if source.equals(target) {
        return Ok(column.clone());
    }
    let mut builder = ColumnBuilder::with_capacity(column.column_type(), target.len())?;
    for label in target.labels().scalars() {
        match source.get_loc(&label) {
            Some(position) => builder.append_value(&column.get(position)?)?,
            None => builder.append_null(),
        }
    }
    Ok(builder.finish())
}

/// `name`, or `name_1`, `name_2`, ... when the name is taken
pub(crate) fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut suffix = 1;
    while used.contains(&candidate) {
        candidate = format!("{}_{}", name, suffix);
        suffix += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Concatenate DataFrames horizontally (column-wise)
fn concat_columns(
    frames: &[&DataFrame],
    join: JoinType,
    ignore_index: bool,
    sort: bool,
) -> Result<DataFrame> {
    let mut combined = merge_indexes(frames, join)?;
    if sort {
        combined = combined.sort_values()?;
    }

    let mut tasks = Vec::new();
    for df in frames {
        for (field, column) in df.fields().iter().zip(df.columns()) {
            let column = column.clone();
            let source = df.index().clone();
            let target = combined.clone();
            let name = field.name.clone();
            let handle = parallel::spawn(move || {
                align_column(&column, &source, &target).map_err(|e| Error::ColumnAlignmentFailed {
                    column: name,
                    message: e.to_string(),
                })
            });
            tasks.push((field.name.clone(), handle));
        }
    }
    debug!(
        "aligning {} columns onto an index of {} rows",
        tasks.len(),
        combined.len()
    );

    let mut used = HashSet::new();
    let mut named = Vec::with_capacity(tasks.len());
    for (position, (name, handle)) in tasks.into_iter().enumerate() {
        let column = handle.join()?;
        let name = if ignore_index {
            position.to_string()
        } else {
            unique_name(&name, &mut used)
        };
        named.push((name, column));
    }
    DataFrame::from_parts(named, combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnType, Int64Column, Scalar, TimestampColumn};

    fn frame(columns: Vec<(&str, Column)>) -> DataFrame {
        DataFrame::from_columns(columns).unwrap()
    }

    #[test]
    fn test_merge_fields_first_seen_order() {
        let a = frame(vec![
            ("z", Column::from(vec![1i64])),
            ("b", Column::from(vec![1i64])),
        ]);
        let b = frame(vec![
            ("c", Column::from(vec![1i64])),
            ("b", Column::from(vec![1i64])),
            ("a", Column::from(vec![1i64])),
        ]);
        let outer: Vec<String> = merge_fields(&[&a, &b], JoinType::Outer)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(outer, vec!["z", "b", "c", "a"]);

        let inner: Vec<String> = merge_fields(&[&a, &b], JoinType::Inner)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(inner, vec!["b"]);
    }

    #[test]
    fn test_outer_row_concat_fills_nulls() {
        let a = frame(vec![
            ("a", Column::from(vec![1i64, 2])),
            ("b", Column::from(vec![10i64, 20])),
        ]);
        let b = frame(vec![
            ("b", Column::from(vec![30i64])),
            ("c", Column::from(vec!["x"])),
        ]);
        let out = concat(&[&a, &b], Axis::Index, JoinType::Outer, true, false).unwrap();
        assert_eq!(out.column_names(), vec!["a", "b", "c"]);
        assert_eq!(out.row_count(), 3);
        assert!(out.column("a").unwrap().is_null(2));
        assert!(out.column("c").unwrap().is_null(0));
        assert_eq!(out.column("c").unwrap().get(2).unwrap(), Scalar::from("x"));
        assert!(out.index().equals(&Index::range(3)));
    }

    #[test]
    fn test_row_concat_casts_to_first_seen_type() {
        let a = frame(vec![("v", Column::from(vec![1.5f64]))]);
        let b = frame(vec![("v", Column::from(vec![2i64]))]);
        let out = concat(&[&a, &b], Axis::Index, JoinType::Inner, true, false).unwrap();
        assert_eq!(out.column_type("v").unwrap(), ColumnType::Float64);
        assert_eq!(out.column("v").unwrap().get(1).unwrap(), Scalar::Float64(2.0));
    }

    #[test]
    fn test_row_concat_keeps_raw_index() {
        let a = frame(vec![("v", Column::from(vec![1i64, 2]))]);
        let b = frame(vec![("v", Column::from(vec![3i64]))]);
        let out = concat(&[&a, &b], Axis::Index, JoinType::Outer, false, false).unwrap();
        assert!(out
            .index()
            .labels()
            .equals(&Column::from(vec![0i64, 1, 0])));
    }

    #[test]
    fn test_column_concat_inner_and_outer() {
        let a = frame(vec![("x", Column::from(vec![1i64, 2, 3]))])
            .with_index(Index::new(Column::from(vec!["a", "b", "c"])))
            .unwrap();
        let b = frame(vec![("y", Column::from(vec![20i64, 40]))])
            .with_index(Index::new(Column::from(vec!["b", "d"])))
            .unwrap();

        let inner = concat(&[&a, &b], Axis::Columns, JoinType::Inner, false, false).unwrap();
        assert!(inner.index().labels().equals(&Column::from(vec!["b"])));
        assert_eq!(inner.column("x").unwrap().get(0).unwrap(), Scalar::Int64(2));
        assert_eq!(inner.column("y").unwrap().get(0).unwrap(), Scalar::Int64(20));

        let outer = concat(&[&a, &b], Axis::Columns, JoinType::Outer, false, false).unwrap();
        assert!(outer
            .index()
            .labels()
            .equals(&Column::from(vec!["a", "b", "c", "d"])));
        assert!(outer.column("x").unwrap().is_null(3));
        assert!(outer.column("y").unwrap().is_null(0));
        assert_eq!(outer.column("y").unwrap().get(3).unwrap(), Scalar::Int64(40));
    }

    #[test]
    fn test_column_concat_renames_duplicates() {
        let a = frame(vec![("value", Column::from(vec![1i64]))]);
        let b = frame(vec![("value", Column::from(vec![2i64]))]);
        let out = concat(&[&a, &b], Axis::Columns, JoinType::Outer, false, false).unwrap();
        assert_eq!(out.column_names(), vec!["value", "value_1"]);

        let ordinal = concat(&[&a, &b], Axis::Columns, JoinType::Outer, true, false).unwrap();
        assert_eq!(ordinal.column_names(), vec!["0", "1"]);
    }

    #[test]
    fn test_failed_alignment_names_the_column() {
        let broken = TimestampColumn {
            values: Int64Column::new(vec![0, 1]),
            tz: Some("Not/AZone".to_string()),
        };
        let a = frame(vec![("ts", Column::Timestamp(broken))]);
        let b = frame(vec![("v", Column::from(vec![1i64, 2, 3]))]);
        match concat(&[&a, &b], Axis::Columns, JoinType::Outer, false, false) {
            Err(Error::ColumnAlignmentFailed { column, .. }) => assert_eq!(column, "ts"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_aligned_column_is_reused() {
        let a = frame(vec![("x", Column::from(vec![1i64, 2]))]);
        let b = frame(vec![("y", Column::from(vec![3i64, 4]))]);
        let out = concat(&[&a, &b], Axis::Columns, JoinType::Inner, false, false).unwrap();
        assert!(out.column("x").unwrap().shares_storage(a.column("x").unwrap()));
        assert!(out.column("y").unwrap().shares_storage(b.column("y").unwrap()));
    }

    #[test]
    fn test_concat_of_nothing_fails() {
        assert!(matches!(
            concat(&[], Axis::Index, JoinType::Outer, false, false),
            Err(Error::EmptyInput(_))
        ));
    }
}
