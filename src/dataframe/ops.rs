//! Elementwise arithmetic and comparison between frames

use log::debug;

use crate::column::{Column, Scalar};
use crate::compute::{self, BinaryOp, Datum};
use crate::dataframe::base::DataFrame;
use crate::error::{Error, Result};
use crate::parallel;
use crate::series::Series;

/// 演算の右辺
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Frame of the same shape; columns are paired by position
    Frame(&'a DataFrame),
    /// One column applied to every column of the frame
    Series(&'a Series),
    /// One value broadcast over every cell
    Scalar(Scalar),
}

impl<'a> From<&'a DataFrame> for Operand<'a> {
    fn from(df: &'a DataFrame) -> Self {
        Operand::Frame(df)
    }
}

impl<'a> From<&'a Series> for Operand<'a> {
    fn from(series: &'a Series) -> Self {
        Operand::Series(series)
    }
}

impl From<Scalar> for Operand<'_> {
    fn from(value: Scalar) -> Self {
        Operand::Scalar(value)
    }
}

impl From<i64> for Operand<'_> {
    fn from(value: i64) -> Self {
        Operand::Scalar(Scalar::Int64(value))
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(Scalar::Float64(value))
    }
}

impl DataFrame {
    /// 全列に二項演算を並列に適用する
    ///
    /// One task per column; task `i` writes output column `i`. Any failure aborts
    /// the whole call with [`Error::OperatorFailed`] naming the first failing column.
    pub fn binary_op<'a>(&self, op: BinaryOp, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        let other = other.into();
        match &other {
            Operand::Frame(rhs) => {
                if rhs.column_count() != self.column_count() {
                    return Err(Error::LengthMismatch {
                        expected: self.column_count(),
                        actual: rhs.column_count(),
                    });
                }
                if rhs.row_count() != self.row_count() {
                    return Err(Error::InconsistentRowCount {
                        expected: self.row_count(),
                        found: rhs.row_count(),
                    });
                }
            }
            Operand::Series(rhs) if rhs.len() != self.row_count() => {
                return Err(Error::InconsistentRowCount {
                    expected: self.row_count(),
                    found: rhs.len(),
                });
            }
            _ => {}
        }
        debug!(
            "{} over {} columns x {} rows",
            op.name(),
            self.column_count(),
            self.row_count()
        );

        let columns = self.columns();
        let slots = parallel::for_each_slot(columns.len(), |i| {
            let rhs = match &other {
                Operand::Frame(df) => Datum::Column(df.columns()[i].clone()),
                Operand::Series(series) => Datum::Column(series.column().clone()),
                Operand::Scalar(value) => Datum::Scalar(value.clone()),
            };
            compute::call(op.name(), &[Datum::Column(columns[i].clone()), rhs])
                .and_then(|result| {
                    result
                        .into_column()
                        .ok_or_else(|| Error::compute(op.name(), "expected a column result"))
                })
                .map_err(|e| Error::OperatorFailed {
                    function: op.name().to_string(),
                    column_index: i,
                    message: e.to_string(),
                })
        });
        let results: Vec<Column> = parallel::try_collect(slots)?;

        let named = self
            .column_names()
            .into_iter()
            .map(str::to_string)
            .zip(results)
            .collect();
        DataFrame::from_parts(named, self.index().clone())
    }

    pub fn add<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Add, other)
    }

    pub fn sub<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Subtract, other)
    }

    pub fn mul<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Multiply, other)
    }

    pub fn div<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Divide, other)
    }

    pub fn rem<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Modulo, other)
    }

    pub fn eq_elem<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Equal, other)
    }

    pub fn ne_elem<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::NotEqual, other)
    }

    pub fn lt<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Less, other)
    }

    pub fn le<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::LessEqual, other)
    }

    pub fn gt<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::Greater, other)
    }

    pub fn ge<'a>(&self, other: impl Into<Operand<'a>>) -> Result<DataFrame> {
        self.binary_op(BinaryOp::GreaterEqual, other)
    }
}

macro_rules! impl_frame_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<'a> std::ops::$trait<&'a DataFrame> for &'a DataFrame {
            type Output = Result<DataFrame>;

            fn $method(self, rhs: &'a DataFrame) -> Self::Output {
                self.binary_op($op, rhs)
            }
        }

        impl std::ops::$trait<Scalar> for &DataFrame {
            type Output = Result<DataFrame>;

            fn $method(self, rhs: Scalar) -> Self::Output {
                self.binary_op($op, rhs)
            }
        }
    };
}

impl_frame_operator!(Add, add, BinaryOp::Add);
impl_frame_operator!(Sub, sub, BinaryOp::Subtract);
impl_frame_operator!(Mul, mul, BinaryOp::Multiply);
impl_frame_operator!(Div, div, BinaryOp::Divide);
