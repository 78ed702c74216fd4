use crate::column::common::validate_timezone;
use crate::column::{Column, ColumnType, PrimitiveColumn, Scalar, TimestampColumn};
use crate::error::{Error, Result};

#[derive(Debug)]
enum BuilderValues {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Boolean(Vec<bool>),
    Timestamp(Vec<i64>),
}

/// 列を1要素ずつ組み立てるビルダー
///
/// A builder accepts only scalars of its own type (or `Null`) and is consumed by
/// [`ColumnBuilder::finish`], which freezes the buffers into an immutable column.
#[derive(Debug)]
pub struct ColumnBuilder {
    data_type: ColumnType,
    values: BuilderValues,
    nulls: Vec<bool>,
}

impl ColumnBuilder {
    pub fn new(data_type: ColumnType) -> Result<Self> {
        Self::with_capacity(data_type, 0)
    }

    pub fn with_capacity(data_type: ColumnType, capacity: usize) -> Result<Self> {
        let values = match &data_type {
            ColumnType::Int64 => BuilderValues::Int64(Vec::with_capacity(capacity)),
            ColumnType::Float64 => BuilderValues::Float64(Vec::with_capacity(capacity)),
            ColumnType::String => BuilderValues::String(Vec::with_capacity(capacity)),
            ColumnType::Boolean => BuilderValues::Boolean(Vec::with_capacity(capacity)),
            ColumnType::Timestamp(tz) => {
                validate_timezone(tz.as_deref().unwrap_or(""))?;
                BuilderValues::Timestamp(Vec::with_capacity(capacity))
            }
        };
        Ok(Self {
            data_type,
            values,
            nulls: Vec::with_capacity(capacity),
        })
    }

    pub fn data_type(&self) -> &ColumnType {
        &self.data_type
    }

    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.nulls.reserve(additional);
        match &mut self.values {
            BuilderValues::Int64(v) | BuilderValues::Timestamp(v) => v.reserve(additional),
            BuilderValues::Float64(v) => v.reserve(additional),
            BuilderValues::String(v) => v.reserve(additional),
            BuilderValues::Boolean(v) => v.reserve(additional),
        }
    }

    pub fn append_null(&mut self) {
        self.nulls.push(true);
        match &mut self.values {
            BuilderValues::Int64(v) | BuilderValues::Timestamp(v) => v.push(0),
            BuilderValues::Float64(v) => v.push(0.0),
            BuilderValues::String(v) => v.push(String::new()),
            BuilderValues::Boolean(v) => v.push(false),
        }
    }

    pub fn append_nulls(&mut self, n: usize) {
        for _ in 0..n {
            self.append_null();
        }
    }

    /// Appends one value; `Scalar::Null` appends a NULL slot
    pub fn append_value(&mut self, value: &Scalar) -> Result<()> {
        if value.is_null() {
            self.append_null();
            return Ok(());
        }
        let expected_tz = timezone_of(&self.data_type);
        match (&mut self.values, value) {
            (BuilderValues::Int64(v), Scalar::Int64(x)) => v.push(*x),
            (BuilderValues::Float64(v), Scalar::Float64(x)) => v.push(*x),
            (BuilderValues::String(v), Scalar::String(x)) => v.push(x.clone()),
            (BuilderValues::Boolean(v), Scalar::Boolean(x)) => v.push(*x),
            (BuilderValues::Timestamp(v), Scalar::Timestamp { value: x, tz })
                if *tz == expected_tz =>
            {
                v.push(*x)
            }
            (_, other) => {
                return Err(Error::TypeMismatch {
                    expected: self.data_type.clone(),
                    found: other.data_type().unwrap_or(ColumnType::Int64),
                })
            }
        }
        self.nulls.push(false);
        Ok(())
    }

    /// Appends the same value `n` times
    pub fn append_scalar_n(&mut self, value: &Scalar, n: usize) -> Result<()> {
        self.reserve(n);
        for _ in 0..n {
            self.append_value(value)?;
        }
        Ok(())
    }

    /// バッファを凍結して不変の列にする
    pub fn finish(self) -> Column {
        let nulls = self.nulls;
        match self.values {
            BuilderValues::Int64(v) => Column::Int64(freeze(v, &nulls)),
            BuilderValues::Float64(v) => Column::Float64(freeze(v, &nulls)),
            BuilderValues::String(v) => Column::String(freeze(v, &nulls)),
            BuilderValues::Boolean(v) => Column::Boolean(freeze(v, &nulls)),
            BuilderValues::Timestamp(v) => Column::Timestamp(TimestampColumn {
                values: freeze(v, &nulls),
                tz: timezone_of(&self.data_type),
            }),
        }
    }
}

fn timezone_of(data_type: &ColumnType) -> Option<String> {
    match data_type {
        ColumnType::Timestamp(tz) => tz.clone(),
        _ => None,
    }
}

fn freeze<T: Clone + Default>(data: Vec<T>, nulls: &[bool]) -> PrimitiveColumn<T> {
    PrimitiveColumn::from_parts(data, nulls)
}
