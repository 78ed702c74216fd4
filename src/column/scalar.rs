use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::DateTime;

use crate::column::ColumnType;

/// 単一の値（NULLを含む）
///
/// Scalars double as group keys and index labels, so they are hashable and
/// totally ordered: floats compare by IEEE total order and `Null` sorts last.
#[derive(Debug, Clone)]
pub enum Scalar {
    Null,
    Int64(i64),
    Float64(f64),
    String(String),
    Boolean(bool),
    Timestamp { value: i64, tz: Option<String> },
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// `None` for the untyped `Null`
    pub fn data_type(&self) -> Option<ColumnType> {
        match self {
            Scalar::Null => None,
            Scalar::Int64(_) => Some(ColumnType::Int64),
            Scalar::Float64(_) => Some(ColumnType::Float64),
            Scalar::String(_) => Some(ColumnType::String),
            Scalar::Boolean(_) => Some(ColumnType::Boolean),
            Scalar::Timestamp { tz, .. } => Some(ColumnType::Timestamp(tz.clone())),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int64(v) => Some(*v),
            Scalar::Timestamp { value, .. } => Some(*value),
            Scalar::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn timestamp(value: i64, tz: &str) -> Self {
        Scalar::Timestamp {
            value,
            tz: if tz.is_empty() { None } else { Some(tz.to_string()) },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Boolean(_) => 0,
            Scalar::Int64(_) => 1,
            Scalar::Float64(_) => 2,
            Scalar::Timestamp { .. } => 3,
            Scalar::String(_) => 4,
            Scalar::Null => 5,
        }
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => Ordering::Equal,
            (Scalar::Int64(a), Scalar::Int64(b)) => a.cmp(b),
            (Scalar::Float64(a), Scalar::Float64(b)) => {
                if canonical_bits(*a) == canonical_bits(*b) {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            (Scalar::String(a), Scalar::String(b)) => a.cmp(b),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a.cmp(b),
            (
                Scalar::Timestamp { value: a, tz: ta },
                Scalar::Timestamp { value: b, tz: tb },
            ) => a.cmp(b).then_with(|| ta.cmp(tb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Scalar::Null => {}
            Scalar::Int64(v) => v.hash(state),
            Scalar::Float64(v) => canonical_bits(*v).hash(state),
            Scalar::String(s) => s.hash(state),
            Scalar::Boolean(b) => b.hash(state),
            Scalar::Timestamp { value, tz } => {
                value.hash(state);
                tz.hash(state);
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Timestamp { value, .. } => {
                write!(f, "{}", DateTime::from_timestamp_nanos(*value).naive_utc())
            }
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float64(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}
