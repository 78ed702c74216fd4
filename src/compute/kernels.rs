//! Array-level kernels: concatenation, casting, sorting, gathering and deduplication

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::column::{Column, ColumnBuilder, ColumnType, PrimitiveColumn, Scalar, TimestampColumn};
use crate::error::{Error, Result};

/// 複数の列を1つに連結する。すべて同じ型でなければならない
pub fn concat(columns: &[&Column]) -> Result<Column> {
    let first = columns
        .first()
        .ok_or_else(|| Error::EmptyInput("concat needs at least one column".to_string()))?;
    let data_type = first.column_type();
    if let Some(other) = columns.iter().find(|c| c.column_type() != data_type) {
        return Err(Error::TypeMismatch {
            expected: data_type,
            found: other.column_type(),
        });
    }
    if columns.len() == 1 {
        return Ok((*first).clone());
    }

    Ok(match first {
        Column::Int64(_) => Column::Int64(concat_primitive(columns, Column::as_int64)),
        Column::Float64(_) => Column::Float64(concat_primitive(columns, Column::as_float64)),
        Column::String(_) => Column::String(concat_primitive(columns, Column::as_string)),
        Column::Boolean(_) => Column::Boolean(concat_primitive(columns, Column::as_boolean)),
        Column::Timestamp(ts) => Column::Timestamp(TimestampColumn {
            values: concat_primitive(columns, |c| c.as_timestamp().map(TimestampColumn::nanos)),
            tz: ts.tz.clone(),
        }),
    })
}

fn concat_primitive<T, F>(columns: &[&Column], view: F) -> PrimitiveColumn<T>
where
    T: Clone + Default,
    F: Fn(&Column) -> Option<&PrimitiveColumn<T>>,
{
    let total: usize = columns.iter().map(|c| c.len()).sum();
    let mut data = Vec::with_capacity(total);
    let mut nulls = Vec::with_capacity(total);
    for col in columns.iter().filter_map(|c| view(c)) {
        for value in col.iter() {
            nulls.push(value.is_none());
            data.push(value.cloned().unwrap_or_default());
        }
    }
    PrimitiveColumn::from_parts(data, &nulls)
}

/// 列を別の型に変換する
///
/// Supported conversions: numeric to numeric (Float64 to Int64 truncates and rejects
/// NaN or out-of-range values), any type to String, Int64 to Timestamp and back,
/// Boolean to numeric, String to numeric and Timestamp by parsing, and retagging a
/// Timestamp with another timezone.
pub fn cast(column: &Column, target: &ColumnType) -> Result<Column> {
    if column.column_type() == *target {
        return Ok(column.clone());
    }

    match (column, target) {
        (Column::Int64(col), ColumnType::Timestamp(tz)) => Ok(Column::Timestamp(TimestampColumn::new(
            col.clone(),
            tz.as_deref().unwrap_or(""),
        )?)),
        (Column::Timestamp(col), ColumnType::Int64) => Ok(Column::Int64(col.values.clone())),
        (Column::Timestamp(col), ColumnType::Timestamp(tz)) => Ok(Column::Timestamp(
            TimestampColumn::new(col.values.clone(), tz.as_deref().unwrap_or(""))?,
        )),
        _ => {
            let mut builder = ColumnBuilder::with_capacity(target.clone(), column.len())?;
            for value in column.scalars() {
                builder.append_value(&cast_scalar(&value, target)?)?;
            }
            Ok(builder.finish())
        }
    }
}

fn cast_scalar(value: &Scalar, target: &ColumnType) -> Result<Scalar> {
    let fail = || Error::Cast(format!("cannot cast {} to {}", value, target));
    Ok(match (value, target) {
        (Scalar::Null, _) => Scalar::Null,
        (v, ColumnType::String) => Scalar::String(v.to_string()),
        (Scalar::Int64(v), ColumnType::Float64) => Scalar::Float64(*v as f64),
        (Scalar::Boolean(b), ColumnType::Float64) => Scalar::Float64(if *b { 1.0 } else { 0.0 }),
        (Scalar::Boolean(b), ColumnType::Int64) => Scalar::Int64(*b as i64),
        (Scalar::Float64(v), ColumnType::Int64) => {
            if !v.is_finite() || *v < i64::MIN as f64 || *v >= i64::MAX as f64 {
                return Err(fail());
            }
            Scalar::Int64(v.trunc() as i64)
        }
        (Scalar::Int64(v), ColumnType::Boolean) => Scalar::Boolean(*v != 0),
        (Scalar::Float64(v), ColumnType::Boolean) => Scalar::Boolean(*v != 0.0),
        (Scalar::String(s), ColumnType::Int64) => Scalar::Int64(s.trim().parse().map_err(|_| fail())?),
        (Scalar::String(s), ColumnType::Float64) => {
            Scalar::Float64(s.trim().parse().map_err(|_| fail())?)
        }
        (Scalar::String(s), ColumnType::Boolean) => Scalar::Boolean(s.trim().parse().map_err(|_| fail())?),
        (Scalar::String(s), ColumnType::Timestamp(tz)) => {
            let dt = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%.f").map_err(|_| fail())?;
            Scalar::Timestamp {
                value: dt.and_utc().timestamp_nanos_opt().ok_or_else(fail)?,
                tz: tz.clone(),
            }
        }
        (Scalar::Int64(v), ColumnType::Timestamp(tz)) => Scalar::Timestamp {
            value: *v,
            tz: tz.clone(),
        },
        (Scalar::Timestamp { value, .. }, ColumnType::Int64) => Scalar::Int64(*value),
        _ => return Err(fail()),
    })
}

/// Stable ascending permutation; NULLs go last
pub fn sort_indices(column: &Column) -> Vec<usize> {
    let values: Vec<Scalar> = column.scalars().collect();
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].cmp(&values[b]));
    indices
}

/// Gathers the values at `indices`
pub fn take(column: &Column, indices: &[usize]) -> Result<Column> {
    Ok(match column {
        Column::Int64(col) => Column::Int64(col.take(indices)?),
        Column::Float64(col) => Column::Float64(col.take(indices)?),
        Column::String(col) => Column::String(col.take(indices)?),
        Column::Boolean(col) => Column::Boolean(col.take(indices)?),
        Column::Timestamp(col) => Column::Timestamp(TimestampColumn {
            values: col.values.take(indices)?,
            tz: col.tz.clone(),
        }),
    })
}

/// Distinct values in first-seen order (NULL counts as one value)
pub fn unique(column: &Column) -> Result<Column> {
    let mut seen = HashSet::new();
    let positions: Vec<usize> = column
        .scalars()
        .enumerate()
        .filter_map(|(i, value)| seen.insert(value).then_some(i))
        .collect();
    take(column, &positions)
}
