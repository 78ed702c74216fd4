use std::fmt;

use crate::column::{Column, ColumnType, Scalar};
use crate::error::{Error, Result};
use crate::index::Index;

/// Series構造体: 名前付きの一次元列とそのインデックス
#[derive(Debug, Clone)]
pub struct Series {
    /// 名前
    name: String,

    /// データ値
    column: Column,

    /// インデックスラベル
    index: Index,
}

impl Series {
    /// 0..len のインデックスで Series を作成
    pub fn new(name: impl Into<String>, column: Column) -> Self {
        let index = Index::range(column.len());
        Self {
            name: name.into(),
            column,
            index,
        }
    }

    /// カスタムインデックス付きでSeriesを作成
    pub fn with_index(name: impl Into<String>, column: Column, index: Index) -> Result<Self> {
        if column.len() != index.len() {
            return Err(Error::LengthMismatch {
                expected: index.len(),
                actual: column.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            column,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn data_type(&self) -> ColumnType {
        self.column.column_type()
    }

    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    pub fn get(&self, position: usize) -> Result<Scalar> {
        self.column.get(position)
    }

    /// インデックスラベルから値を取得
    pub fn get_by_label(&self, label: &Scalar) -> Option<Scalar> {
        self.index
            .get_loc(label)
            .and_then(|pos| self.column.get(pos).ok())
    }

    pub fn into_column(self) -> Column {
        self.column
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_ROWS: usize = 10;
        for i in 0..self.len().min(MAX_ROWS) {
            let label = self.index.get(i).unwrap_or(Scalar::Null);
            let value = self.column.get(i).unwrap_or(Scalar::Null);
            writeln!(f, "{:<12} {}", label.to_string(), value)?;
        }
        if self.len() > MAX_ROWS {
            writeln!(f, "... ({} rows total)", self.len())?;
        }
        write!(f, "Name: {}, dtype: {}", self.name, self.data_type())
    }
}
