mod builder;
mod common;
mod primitive;
mod scalar;
mod timestamp_column;

pub use builder::ColumnBuilder;
pub use common::{validate_timezone, BitMask, Column, ColumnType, Field};
pub use primitive::PrimitiveColumn;
pub use scalar::Scalar;
pub use timestamp_column::TimestampColumn;

/// Int64型の列
pub type Int64Column = PrimitiveColumn<i64>;
/// Float64型の列
pub type Float64Column = PrimitiveColumn<f64>;
/// 文字列型の列
pub type StringColumn = PrimitiveColumn<String>;
/// ブール型の列
pub type BooleanColumn = PrimitiveColumn<bool>;
