//! framekit: 列指向DataFrameの関係演算エンジン
//!
//! Time-series resampling with configurable bin conventions, parallel group-by
//! aggregation, row and column concatenation with inner/outer join semantics,
//! and elementwise operators over frames.
//!
//! ```no_run
//! use framekit::{Column, DataFrame};
//!
//! # fn main() -> framekit::Result<()> {
//! let df = DataFrame::from_columns(vec![
//!     ("k", Column::from(vec!["a", "b", "a"])),
//!     ("v", Column::from(vec![1i64, 2, 3])),
//! ])?;
//! let sums = df.groupby("k")?.sum(&["v"])?;
//! println!("{}", sums);
//! # Ok(())
//! # }
//! ```

// 特定の警告を無効化
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_lifetimes)]

pub mod column;
pub mod compute;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod index;
pub mod parallel;
pub mod series;
pub mod temporal;

// Re-export commonly used types
pub use column::{Column, ColumnBuilder, ColumnType, Field, Scalar, TimestampColumn};
pub use compute::{BinaryOp, ReduceOp};
pub use config::EngineConfig;
pub use dataframe::{concat, Axis, DataFrame, JoinType, Operand};
pub use error::{Error, Result};
pub use groupby::{GroupBy, GroupPartition};
pub use index::Index;
pub use series::Series;
pub use temporal::{date_range, datetime_range, Frequency, RangeBound, ResampleOptions};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
