use thiserror::Error;

use crate::column::ColumnType;

/// Error type shared by every operation in the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid frequency string: {0}")]
    InvalidFrequency(String),

    #[error("Unsupported frequency unit '{unit}': {reason}")]
    UnsupportedFrequencyUnit { unit: String, reason: String },

    #[error("Array construction failed: {0}")]
    BuildError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Values fall before first bin: first value {value}, first edge {edge}")]
    ValueBeforeFirstBin { value: i64, edge: i64 },

    #[error("Values fall after last bin: last value {value}, last edge {edge}")]
    ValueAfterLastBin { value: i64, edge: i64 },

    #[error("Cannot resample a frame of {rows} rows, at least {required} are needed")]
    InsufficientRows { rows: usize, required: usize },

    #[error("Aggregation '{function}' failed on column '{column}': {message}")]
    AggregationFailed {
        function: String,
        column: String,
        message: String,
    },

    #[error("Failed to align column '{column}': {message}")]
    ColumnAlignmentFailed { column: String, message: String },

    #[error("Operator '{function}' failed on column {column_index}: {message}")]
    OperatorFailed {
        function: String,
        column_index: usize,
        message: String,
    },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("Cast error: {0}")]
    Cast(String),

    #[error("Compute error in '{function}': {message}")]
    Compute { function: String, message: String },

    #[error("Function not registered: {0}")]
    FunctionNotFound(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Parallel execution error: {0}")]
    Parallel(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// Shorthand for a kernel failure raised by a named compute function
    pub(crate) fn compute(function: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Compute {
            function: function.into(),
            message: message.into(),
        }
    }
}
