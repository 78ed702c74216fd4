use std::sync::Arc;

use crate::column::common::BitMask;
use crate::error::{Error, Result};

/// 固定型の値を保持する列
///
/// Storage is shared between clones; every operation that changes values
/// builds a new column instead of writing through the `Arc`.
#[derive(Debug, Clone)]
pub struct PrimitiveColumn<T> {
    pub(crate) data: Arc<[T]>,
    pub(crate) null_mask: Option<BitMask>,
}

impl<T: Clone + Default> PrimitiveColumn<T> {
    /// NULLを含まない列を作成する
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
        }
    }

    /// NULL値を含む列を作成する
    pub fn with_nulls(data: Vec<T>, nulls: &[bool]) -> Result<Self> {
        if data.len() != nulls.len() {
            return Err(Error::LengthMismatch {
                expected: data.len(),
                actual: nulls.len(),
            });
        }
        Ok(Self {
            data: data.into(),
            null_mask: BitMask::from_bools(nulls),
        })
    }

    /// Option の並びから列を作成する。None は NULL になる
    pub fn from_options<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let mut data = Vec::new();
        let mut nulls = Vec::new();
        for value in values {
            nulls.push(value.is_none());
            data.push(value.unwrap_or_default());
        }
        Self {
            data: data.into(),
            null_mask: BitMask::from_bools(&nulls),
        }
    }

    pub(crate) fn from_parts(data: Vec<T>, nulls: &[bool]) -> Self {
        Self {
            data: data.into(),
            null_mask: BitMask::from_bools(nulls),
        }
    }

    /// すべてNULLの列
    pub fn nulls(len: usize) -> Self {
        Self {
            data: vec![T::default(); len].into(),
            null_mask: if len == 0 { None } else { Some(BitMask::ones(len)) },
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.null_mask.as_ref().map_or(false, |mask| mask.get(index))
    }

    pub fn null_count(&self) -> usize {
        self.null_mask.as_ref().map_or(0, BitMask::count_set)
    }

    /// インデックスでデータを取得する
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }
        if self.is_null(index) {
            return Ok(None);
        }
        Ok(Some(&self.data[index]))
    }

    /// Raw storage; slots that are NULL hold `T::default()`
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// True when both columns read the same value buffer
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + Clone + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| if self.is_null(i) { None } else { Some(v) })
    }

    /// NULLを除いた値
    pub fn valid_values(&self) -> impl Iterator<Item = &T> + Clone + '_ {
        self.iter().flatten()
    }

    /// 指定位置の値を集めた新しい列
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let mut data = Vec::with_capacity(indices.len());
        let mut nulls = Vec::with_capacity(indices.len());
        for &i in indices {
            let value = self.get(i)?;
            nulls.push(value.is_none());
            data.push(value.cloned().unwrap_or_default());
        }
        Ok(Self {
            data: data.into(),
            null_mask: BitMask::from_bools(&nulls),
        })
    }
}

impl<T: Clone + Default + PartialEq> PrimitiveColumn<T> {
    /// Same length, same NULL positions and equal valid values
    pub fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
