use num_traits::{One, ToPrimitive, Zero};

use crate::column::{Column, ColumnType, Scalar};
use crate::compute::Datum;
use crate::error::{Error, Result};

/// 集計操作を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// 合計
    Sum,
    /// 平均
    Mean,
    /// 最小値
    Min,
    /// 最大値
    Max,
    /// 件数（NULLを除く）
    Count,
    /// 最初の非NULL値
    First,
    /// 最後の非NULL値
    Last,
    /// 積
    Product,
    /// 不偏分散
    Variance,
    /// 標準偏差
    StdDev,
}

impl ReduceOp {
    pub fn all() -> [ReduceOp; 10] {
        [
            ReduceOp::Sum,
            ReduceOp::Mean,
            ReduceOp::Min,
            ReduceOp::Max,
            ReduceOp::Count,
            ReduceOp::First,
            ReduceOp::Last,
            ReduceOp::Product,
            ReduceOp::Variance,
            ReduceOp::StdDev,
        ]
    }

    /// Registered function name
    pub fn name(&self) -> &'static str {
        match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
            ReduceOp::Count => "count",
            ReduceOp::First => "first",
            ReduceOp::Last => "last",
            ReduceOp::Product => "product",
            ReduceOp::Variance => "variance",
            ReduceOp::StdDev => "stddev",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|op| op.name() == name)
    }
}

/// Type of the value `op` produces for a column of type `input`
pub fn output_type(op: ReduceOp, input: &ColumnType) -> Result<ColumnType> {
    let unsupported = || {
        Error::compute(
            op.name(),
            format!("reduction is not defined for {} columns", input),
        )
    };
    match op {
        ReduceOp::Count => Ok(ColumnType::Int64),
        ReduceOp::First | ReduceOp::Last => Ok(input.clone()),
        ReduceOp::Min | ReduceOp::Max => Ok(input.clone()),
        ReduceOp::Sum | ReduceOp::Product => match input {
            ColumnType::Int64 | ColumnType::Boolean => Ok(ColumnType::Int64),
            ColumnType::Float64 => Ok(ColumnType::Float64),
            _ => Err(unsupported()),
        },
        ReduceOp::Mean | ReduceOp::Variance | ReduceOp::StdDev => match input {
            ColumnType::Int64 | ColumnType::Float64 | ColumnType::Boolean => Ok(ColumnType::Float64),
            _ => Err(unsupported()),
        },
    }
}

/// Numeric element types the reductions are generic over
trait NumericValue: Copy + PartialOrd + Zero + One + ToPrimitive {
    fn checked_add_value(self, other: Self) -> Option<Self>;
    fn checked_mul_value(self, other: Self) -> Option<Self>;
    fn into_scalar(self) -> Scalar;
}

impl NumericValue for i64 {
    fn checked_add_value(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }

    fn checked_mul_value(self, other: Self) -> Option<Self> {
        self.checked_mul(other)
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Int64(self)
    }
}

impl NumericValue for f64 {
    fn checked_add_value(self, other: Self) -> Option<Self> {
        Some(self + other)
    }

    fn checked_mul_value(self, other: Self) -> Option<Self> {
        Some(self * other)
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Float64(self)
    }
}

/// One reduction over the valid values of a numeric column.
/// NaN values are skipped by min/max the same way NULLs are.
fn reduce_numeric<T, I>(op: ReduceOp, mut values: I) -> Result<Scalar>
where
    T: NumericValue,
    I: Iterator<Item = T> + Clone,
{
    let overflow = || Error::compute(op.name(), "integer overflow");
    let count = values.clone().count();
    if count == 0 {
        return Ok(match op {
            ReduceOp::Count => Scalar::Int64(0),
            _ => Scalar::Null,
        });
    }
    let as_f64 = |v: T| v.to_f64().unwrap_or(f64::NAN);

    Ok(match op {
        ReduceOp::Count => Scalar::Int64(count as i64),
        ReduceOp::Sum => values
            .try_fold(T::zero(), |acc, v| acc.checked_add_value(v))
            .ok_or_else(overflow)?
            .into_scalar(),
        ReduceOp::Product => values
            .try_fold(T::one(), |acc, v| acc.checked_mul_value(v))
            .ok_or_else(overflow)?
            .into_scalar(),
        ReduceOp::Mean => Scalar::Float64(values.map(as_f64).sum::<f64>() / count as f64),
        ReduceOp::Min | ReduceOp::Max => {
            let best = values.filter(|v| v == v).fold(None, |best: Option<T>, v| match best {
                None => Some(v),
                Some(b) if op == ReduceOp::Min && v < b => Some(v),
                Some(b) if op == ReduceOp::Max && v > b => Some(v),
                keep => keep,
            });
            best.map_or(Scalar::Null, NumericValue::into_scalar)
        }
        ReduceOp::First => values.clone().next().map_or(Scalar::Null, T::into_scalar),
        ReduceOp::Last => values.last().map_or(Scalar::Null, T::into_scalar),
        ReduceOp::Variance | ReduceOp::StdDev => {
            if count < 2 {
                return Ok(Scalar::Null);
            }
            let mean = values.clone().map(as_f64).sum::<f64>() / count as f64;
            let var = values.map(|v| (as_f64(v) - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Scalar::Float64(if op == ReduceOp::StdDev { var.sqrt() } else { var })
        }
    })
}

/// Reduction over scalars that only need ordering (strings, booleans, timestamps)
fn reduce_ordered(op: ReduceOp, column: &Column) -> Result<Scalar> {
    let mut valid = column.scalars().filter(|s| !s.is_null());
    Ok(match op {
        ReduceOp::Count => Scalar::Int64(valid.count() as i64),
        ReduceOp::First => valid.next().unwrap_or(Scalar::Null),
        ReduceOp::Last => valid.last().unwrap_or(Scalar::Null),
        ReduceOp::Min => valid.min().unwrap_or(Scalar::Null),
        ReduceOp::Max => valid.max().unwrap_or(Scalar::Null),
        _ => {
            return Err(Error::compute(
                op.name(),
                format!("reduction is not defined for {} columns", column.column_type()),
            ))
        }
    })
}

/// Applies one reduction to a whole column
pub fn reduce(op: ReduceOp, column: &Column) -> Result<Scalar> {
    match column {
        Column::Int64(col) => reduce_numeric(op, col.valid_values().copied()),
        Column::Float64(col) => reduce_numeric(op, col.valid_values().copied()),
        Column::Boolean(col)
            if matches!(
                op,
                ReduceOp::Sum | ReduceOp::Product | ReduceOp::Mean | ReduceOp::Variance | ReduceOp::StdDev
            ) =>
        {
            reduce_numeric(op, col.valid_values().map(|&b| b as i64))
        }
        _ => reduce_ordered(op, column),
    }
}

pub(crate) fn reduce_kernel(name: &str, args: &[Datum]) -> Result<Datum> {
    let op = ReduceOp::from_name(name).ok_or_else(|| Error::FunctionNotFound(name.to_string()))?;
    match &args[0] {
        Datum::Column(column) => reduce(op, column).map(Datum::Scalar),
        Datum::Scalar(_) => Err(Error::compute(name, "reductions take a column operand")),
    }
}
