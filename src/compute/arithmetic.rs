use std::cmp::Ordering;

use crate::column::{ColumnBuilder, ColumnType, Scalar};
use crate::compute::Datum;
use crate::error::{Error, Result};

/// 二項演算子（算術・比較）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub fn all() -> [BinaryOp; 11] {
        [
            BinaryOp::Add,
            BinaryOp::Subtract,
            BinaryOp::Multiply,
            BinaryOp::Divide,
            BinaryOp::Modulo,
            BinaryOp::Equal,
            BinaryOp::NotEqual,
            BinaryOp::Less,
            BinaryOp::LessEqual,
            BinaryOp::Greater,
            BinaryOp::GreaterEqual,
        ]
    }

    /// Registered function name
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Modulo => "modulo",
            BinaryOp::Equal => "equal",
            BinaryOp::NotEqual => "not_equal",
            BinaryOp::Less => "less",
            BinaryOp::LessEqual => "less_equal",
            BinaryOp::Greater => "greater",
            BinaryOp::GreaterEqual => "greater_equal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|op| op.name() == name)
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }

    /// Output type for operands of the given types
    pub fn result_type(&self, left: &ColumnType, right: &ColumnType) -> Result<ColumnType> {
        use ColumnType::*;
        let unsupported = || {
            Error::compute(
                self.name(),
                format!("unsupported operand types {} and {}", left, right),
            )
        };

        if self.is_comparison() {
            let comparable = (left.is_numeric() && right.is_numeric()) || left == right;
            return if comparable { Ok(Boolean) } else { Err(unsupported()) };
        }

        match (self, left, right) {
            (BinaryOp::Divide, l, r) if l.is_numeric() && r.is_numeric() => Ok(Float64),
            (_, Int64, Int64) => Ok(Int64),
            (_, l, r) if l.is_numeric() && r.is_numeric() => Ok(Float64),
            (BinaryOp::Add, Timestamp(tz), Int64)
            | (BinaryOp::Add, Int64, Timestamp(tz))
            | (BinaryOp::Subtract, Timestamp(tz), Int64) => Ok(Timestamp(tz.clone())),
            (BinaryOp::Subtract, Timestamp(a), Timestamp(b)) if a == b => Ok(Int64),
            _ => Err(unsupported()),
        }
    }

    /// Applies the operator to one pair of values. NULL on either side yields NULL.
    pub fn apply(&self, left: &Scalar, right: &Scalar) -> Result<Scalar> {
        if left.is_null() || right.is_null() {
            return Ok(Scalar::Null);
        }
        if self.is_comparison() {
            return Ok(match compare(left, right) {
                Some(ordering) => Scalar::Boolean(self.matches(ordering)),
                None => Scalar::Boolean(*self == BinaryOp::NotEqual),
            });
        }

        let overflow = || Error::compute(self.name(), "integer overflow or division by zero");
        match (left, right) {
            (Scalar::Int64(a), Scalar::Int64(b)) => {
                let (a, b) = (*a, *b);
                let value = match self {
                    BinaryOp::Add => a.checked_add(b),
                    BinaryOp::Subtract => a.checked_sub(b),
                    BinaryOp::Multiply => a.checked_mul(b),
                    BinaryOp::Modulo => a.checked_rem(b),
                    _ => return Ok(Scalar::Float64(a as f64 / b as f64)),
                };
                value.map(Scalar::Int64).ok_or_else(overflow)
            }
            (Scalar::Timestamp { value, tz }, Scalar::Int64(delta)) => {
                let shifted = match self {
                    BinaryOp::Add => value.checked_add(*delta),
                    BinaryOp::Subtract => value.checked_sub(*delta),
                    _ => return Err(self.unsupported_values(left, right)),
                };
                shifted
                    .map(|value| Scalar::Timestamp {
                        value,
                        tz: tz.clone(),
                    })
                    .ok_or_else(overflow)
            }
            (Scalar::Int64(delta), Scalar::Timestamp { value, tz }) if *self == BinaryOp::Add => value
                .checked_add(*delta)
                .map(|value| Scalar::Timestamp {
                    value,
                    tz: tz.clone(),
                })
                .ok_or_else(overflow),
            (Scalar::Timestamp { value: a, .. }, Scalar::Timestamp { value: b, .. })
                if *self == BinaryOp::Subtract =>
            {
                a.checked_sub(*b).map(Scalar::Int64).ok_or_else(overflow)
            }
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Scalar::Float64(match self {
                    BinaryOp::Add => a + b,
                    BinaryOp::Subtract => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide => a / b,
                    _ => a % b,
                })),
                _ => Err(self.unsupported_values(left, right)),
            },
        }
    }

    fn matches(&self, ordering: Ordering) -> bool {
        match self {
            BinaryOp::Equal => ordering == Ordering::Equal,
            BinaryOp::NotEqual => ordering != Ordering::Equal,
            BinaryOp::Less => ordering == Ordering::Less,
            BinaryOp::LessEqual => ordering != Ordering::Greater,
            BinaryOp::Greater => ordering == Ordering::Greater,
            BinaryOp::GreaterEqual => ordering != Ordering::Less,
            _ => false,
        }
    }

    fn unsupported_values(&self, left: &Scalar, right: &Scalar) -> Error {
        Error::compute(
            self.name(),
            format!("cannot apply to values {} and {}", left, right),
        )
    }
}

/// Numeric values compare across Int64/Float64; NaN compares as unordered
fn compare(left: &Scalar, right: &Scalar) -> Option<Ordering> {
    match (left, right) {
        (Scalar::Int64(a), Scalar::Int64(b)) => Some(a.cmp(b)),
        (Scalar::Int64(_) | Scalar::Float64(_), Scalar::Int64(_) | Scalar::Float64(_)) => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        _ => Some(left.cmp(right)),
    }
}

fn operand_type(operand: &Datum) -> Option<ColumnType> {
    match operand {
        Datum::Column(col) => Some(col.column_type()),
        Datum::Scalar(s) => s.data_type(),
    }
}

fn value_at(operand: &Datum, i: usize) -> Result<Scalar> {
    match operand {
        Datum::Column(col) => col.get(i),
        Datum::Scalar(s) => Ok(s.clone()),
    }
}

pub(crate) fn binary_kernel(name: &str, args: &[Datum]) -> Result<Datum> {
    let op = BinaryOp::from_name(name).ok_or_else(|| Error::FunctionNotFound(name.to_string()))?;
    let (left, right) = (&args[0], &args[1]);

    let len = match (left, right) {
        (Datum::Scalar(a), Datum::Scalar(b)) => return op.apply(a, b).map(Datum::Scalar),
        (Datum::Column(a), Datum::Column(b)) if a.len() != b.len() => {
            return Err(Error::compute(
                name,
                format!("operand lengths differ: {} vs {}", a.len(), b.len()),
            ))
        }
        (Datum::Column(a), _) => a.len(),
        (_, Datum::Column(b)) => b.len(),
    };

    // An untyped NULL scalar takes the type of the column it is paired with
    let (left_type, right_type) = match (operand_type(left), operand_type(right)) {
        (Some(l), Some(r)) => (l, r),
        (Some(t), None) | (None, Some(t)) => (t.clone(), t),
        (None, None) => return Err(Error::compute(name, "operands carry no type")),
    };
    let output = op.result_type(&left_type, &right_type)?;

    let mut builder = ColumnBuilder::with_capacity(output, len)?;
    for i in 0..len {
        let value = op.apply(&value_at(left, i)?, &value_at(right, i)?)?;
        builder
            .append_value(&value)
            .map_err(|e| Error::compute(name, e.to_string()))?;
    }
    Ok(Datum::Column(builder.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, Float64Column, Int64Column};

    fn apply_columns(op: BinaryOp, left: &Column, right: &Column) -> Result<Column> {
        binary_kernel(
            op.name(),
            &[Datum::Column(left.clone()), Datum::Column(right.clone())],
        )
        .map(|d| d.into_column().unwrap())
    }

    #[test]
    fn test_int_arithmetic_stays_int() {
        let a = Column::from(vec![1i64, 2, 3]);
        let b = Column::from(vec![10i64, 20, 30]);
        let sum = apply_columns(BinaryOp::Add, &a, &b).unwrap();
        assert!(sum.equals(&Column::from(vec![11i64, 22, 33])));

        let quotient = apply_columns(BinaryOp::Divide, &b, &a).unwrap();
        assert_eq!(quotient.column_type(), ColumnType::Float64);
        assert_eq!(quotient.get(2).unwrap(), Scalar::Float64(10.0));
    }

    #[test]
    fn test_mixed_numeric_promotes_to_float() {
        let a = Column::from(vec![1i64, 2]);
        let b = Column::from(vec![0.5f64, 1.5]);
        let out = apply_columns(BinaryOp::Multiply, &a, &b).unwrap();
        assert!(out.equals(&Column::from(vec![0.5f64, 3.0])));
    }

    #[test]
    fn test_nulls_propagate() {
        let a = Column::Int64(Int64Column::from_options(vec![Some(1), None]));
        let out = binary_kernel("add", &[Datum::Column(a), Datum::Scalar(Scalar::Int64(1))])
            .unwrap()
            .into_column()
            .unwrap();
        assert_eq!(out.get(0).unwrap(), Scalar::Int64(2));
        assert!(out.is_null(1));
    }

    #[test]
    fn test_comparison_yields_boolean() {
        let a = Column::Float64(Float64Column::new(vec![1.0, f64::NAN, 3.0]));
        let out = binary_kernel("less", &[Datum::Column(a), Datum::Scalar(Scalar::Int64(2))])
            .unwrap()
            .into_column()
            .unwrap();
        assert!(out.equals(&Column::from(vec![true, false, false])));
    }

    #[test]
    fn test_integer_modulo_by_zero_fails() {
        let a = Column::from(vec![4i64]);
        let b = Column::from(vec![0i64]);
        assert!(apply_columns(BinaryOp::Modulo, &a, &b).is_err());
    }

    #[test]
    fn test_string_arithmetic_is_rejected() {
        let a = Column::from(vec!["x"]);
        let b = Column::from(vec![1i64]);
        assert!(apply_columns(BinaryOp::Add, &a, &b).is_err());
    }

    #[test]
    fn test_length_mismatch_fails() {
        let a = Column::from(vec![1i64, 2]);
        let b = Column::from(vec![1i64]);
        assert!(apply_columns(BinaryOp::Add, &a, &b).is_err());
    }
}
