use std::fmt;
use std::sync::Arc;

use crate::column::{
    BooleanColumn, ColumnBuilder, Float64Column, Int64Column, Scalar, StringColumn,
    TimestampColumn,
};
use crate::error::{Error, Result};

/// 列の型を識別するための列挙型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Boolean,
    /// Nanoseconds since the Unix epoch, tagged with an optional IANA timezone
    Timestamp(Option<String>),
}

impl ColumnType {
    /// Timestamp type with the given timezone tag (empty string means no tag)
    pub fn timestamp(tz: &str) -> Self {
        if tz.is_empty() {
            ColumnType::Timestamp(None)
        } else {
            ColumnType::Timestamp(Some(tz.to_string()))
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, ColumnType::Timestamp(_))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int64 => write!(f, "int64"),
            ColumnType::Float64 => write!(f, "float64"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Boolean => write!(f, "bool"),
            ColumnType::Timestamp(None) => write!(f, "timestamp[ns]"),
            ColumnType::Timestamp(Some(tz)) => write!(f, "timestamp[ns, {}]", tz),
        }
    }
}

/// Rejects timezone names that chrono-tz does not know
pub fn validate_timezone(tz: &str) -> Result<()> {
    if tz.is_empty() {
        return Ok(());
    }
    tz.parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| Error::InvalidTimezone(tz.to_string()))
}

/// 列名と型の組。データとは独立に列を識別する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub data_type: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// NULL値を追跡するビットマスク（ビットが1の位置がNULL）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    pub(crate) data: Arc<[u8]>,
    pub(crate) len: usize,
}

impl BitMask {
    /// ブール値のスライスからビットマスクを作成する。どのビットも立っていなければ None
    pub fn from_bools(bools: &[bool]) -> Option<Self> {
        if !bools.iter().any(|&b| b) {
            return None;
        }
        let mut data = vec![0u8; (bools.len() + 7) / 8];
        for (i, &is_set) in bools.iter().enumerate() {
            if is_set {
                data[i / 8] |= 1 << (i % 8);
            }
        }
        Some(Self {
            data: data.into(),
            len: bools.len(),
        })
    }

    /// すべてのビットが1のビットマスク
    pub fn ones(len: usize) -> Self {
        let mut data = vec![0xFFu8; (len + 7) / 8];
        let remaining_bits = len % 8;
        if remaining_bits != 0 {
            if let Some(last) = data.last_mut() {
                *last &= (1u8 << remaining_bits) - 1;
            }
        }
        Self {
            data: data.into(),
            len,
        }
    }

    pub fn get(&self, index: usize) -> bool {
        index < self.len && (self.data[index / 8] & (1 << (index % 8))) != 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// 列を表す列挙型
#[derive(Debug, Clone)]
pub enum Column {
    Int64(Int64Column),
    Float64(Float64Column),
    String(StringColumn),
    Boolean(BooleanColumn),
    Timestamp(TimestampColumn),
}

macro_rules! dispatch {
    ($self:expr, $col:ident => $body:expr) => {
        match $self {
            Column::Int64($col) => $body,
            Column::Float64($col) => $body,
            Column::String($col) => $body,
            Column::Boolean($col) => $body,
            Column::Timestamp($col) => $body,
        }
    };
}

impl Column {
    /// All-null column of the given type
    pub fn new_null(data_type: &ColumnType, len: usize) -> Result<Self> {
        let mut builder = ColumnBuilder::with_capacity(data_type.clone(), len)?;
        builder.append_nulls(len);
        Ok(builder.finish())
    }

    /// Column built from scalars of a single type; nulls are allowed anywhere
    pub fn from_scalars(data_type: &ColumnType, values: &[Scalar]) -> Result<Self> {
        let mut builder = ColumnBuilder::with_capacity(data_type.clone(), values.len())?;
        for value in values {
            builder.append_value(value)?;
        }
        Ok(builder.finish())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, col => col.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Boolean(_) => ColumnType::Boolean,
            Column::Timestamp(col) => ColumnType::Timestamp(col.tz.clone()),
        }
    }

    pub fn null_count(&self) -> usize {
        dispatch!(self, col => col.null_count())
    }

    pub fn is_null(&self, index: usize) -> bool {
        dispatch!(self, col => col.is_null(index))
    }

    /// 位置から値をスカラーとして取得する
    pub fn get(&self, index: usize) -> Result<Scalar> {
        Ok(match self {
            Column::Int64(col) => col.get(index)?.map_or(Scalar::Null, |v| Scalar::Int64(*v)),
            Column::Float64(col) => col
                .get(index)?
                .map_or(Scalar::Null, |v| Scalar::Float64(*v)),
            Column::String(col) => col
                .get(index)?
                .map_or(Scalar::Null, |v| Scalar::String(v.clone())),
            Column::Boolean(col) => col
                .get(index)?
                .map_or(Scalar::Null, |v| Scalar::Boolean(*v)),
            Column::Timestamp(col) => col.get(index)?.map_or(Scalar::Null, |v| Scalar::Timestamp {
                value: *v,
                tz: col.tz.clone(),
            }),
        })
    }

    /// 値を順に走査する
    pub fn scalars(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).map(move |i| self.get(i).unwrap_or(Scalar::Null))
    }

    /// Type, length, null positions and valid values all match
    pub fn equals(&self, other: &Column) -> bool {
        match (self, other) {
            (Column::Int64(a), Column::Int64(b)) => a.equals(b),
            (Column::Float64(a), Column::Float64(b)) => a.equals(b),
            (Column::String(a), Column::String(b)) => a.equals(b),
            (Column::Boolean(a), Column::Boolean(b)) => a.equals(b),
            (Column::Timestamp(a), Column::Timestamp(b)) => a.tz == b.tz && a.values.equals(&b.values),
            _ => false,
        }
    }

    /// 同じバッファを共有しているか（ゼロコピーの確認用）
    pub fn shares_storage(&self, other: &Column) -> bool {
        match (self, other) {
            (Column::Int64(a), Column::Int64(b)) => a.shares_storage(b),
            (Column::Float64(a), Column::Float64(b)) => a.shares_storage(b),
            (Column::String(a), Column::String(b)) => a.shares_storage(b),
            (Column::Boolean(a), Column::Boolean(b)) => a.shares_storage(b),
            (Column::Timestamp(a), Column::Timestamp(b)) => a.values.shares_storage(&b.values),
            _ => false,
        }
    }

    pub fn as_int64(&self) -> Option<&Int64Column> {
        match self {
            Column::Int64(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_float64(&self) -> Option<&Float64Column> {
        match self {
            Column::Float64(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&BooleanColumn> {
        match self {
            Column::Boolean(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&TimestampColumn> {
        match self {
            Column::Timestamp(col) => Some(col),
            _ => None,
        }
    }
}

impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}

impl From<TimestampColumn> for Column {
    fn from(col: TimestampColumn) -> Self {
        Column::Timestamp(col)
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int64(Int64Column::new(values))
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float64(Float64Column::new(values))
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::String(StringColumn::new(values))
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::String(StringColumn::new(
            values.into_iter().map(str::to_string).collect(),
        ))
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Column::Boolean(BooleanColumn::new(values))
    }
}
