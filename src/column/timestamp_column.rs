use chrono::{DateTime, NaiveDateTime};

use crate::column::common::validate_timezone;
use crate::column::Int64Column;
use crate::error::{Error, Result};

/// Nanosecond timestamps tagged with an optional timezone name
#[derive(Debug, Clone)]
pub struct TimestampColumn {
    pub(crate) values: Int64Column,
    pub(crate) tz: Option<String>,
}

impl TimestampColumn {
    /// Wraps epoch nanoseconds; an empty `tz` means no timezone tag
    pub fn new(values: Int64Column, tz: &str) -> Result<Self> {
        validate_timezone(tz)?;
        Ok(Self {
            values,
            tz: if tz.is_empty() { None } else { Some(tz.to_string()) },
        })
    }

    pub fn from_datetimes(values: &[NaiveDateTime], tz: &str) -> Result<Self> {
        let nanos = values
            .iter()
            .map(|dt| {
                dt.and_utc().timestamp_nanos_opt().ok_or_else(|| {
                    Error::BuildError(format!("{} is outside the nanosecond timestamp range", dt))
                })
            })
            .collect::<Result<Vec<i64>>>()?;
        Self::new(Int64Column::new(nanos), tz)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.values.is_null(index)
    }

    pub fn null_count(&self) -> usize {
        self.values.null_count()
    }

    pub fn get(&self, index: usize) -> Result<Option<&i64>> {
        self.values.get(index)
    }

    pub fn timezone(&self) -> Option<&str> {
        self.tz.as_deref()
    }

    /// Numeric nanosecond view sharing the same storage
    pub fn nanos(&self) -> &Int64Column {
        &self.values
    }

    /// Converts one slot back to a naive datetime
    pub fn datetime(&self, index: usize) -> Result<Option<NaiveDateTime>> {
        Ok(self
            .values
            .get(index)?
            .map(|&ns| DateTime::from_timestamp_nanos(ns).naive_utc()))
    }
}
