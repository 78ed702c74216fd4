use std::collections::HashMap;

use crate::column::{Column, ColumnType, Field};
use crate::compute::kernels;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::series::Series;

/// DataFrame構造体: 名前付きの列の集合と行インデックス
///
/// Columns are immutable and shared between frames by reference counting;
/// every relational operation returns a new frame.
#[derive(Debug, Clone)]
pub struct DataFrame {
    /// 列のメタデータ（名前と型）
    fields: Vec<Field>,

    /// 列データ
    columns: Vec<Column>,

    /// 列名から位置へのマッピング
    lookup: HashMap<String, usize>,

    /// 行インデックス
    index: Index,

    /// 行数
    row_count: usize,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFrame {
    /// 空のDataFrameを作成
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            columns: Vec::new(),
            lookup: HashMap::new(),
            index: Index::range(0),
            row_count: 0,
        }
    }

    /// 名前と列の組からDataFrameを作成（インデックスは 0..n）
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut df = Self::new();
        for (name, column) in columns {
            df.add_column(name, column)?;
        }
        Ok(df)
    }

    /// Frame with an explicit index; used by operators that already validated their output
    pub(crate) fn from_parts(columns: Vec<(String, Column)>, index: Index) -> Result<Self> {
        let mut df = Self::from_columns(columns)?;
        if df.columns.is_empty() {
            df.row_count = index.len();
        }
        df.with_index(index)
    }

    /// インデックスを置き換える
    pub fn with_index(mut self, index: Index) -> Result<Self> {
        if index.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    /// 列を追加する（構築時のみ）
    ///
    /// The first column fixes the row count; a frame without columns gets a
    /// `0..n` index at that point.
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.lookup.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if self.columns.is_empty() && self.row_count == 0 {
            self.row_count = column.len();
            self.index = Index::range(column.len());
        } else if column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        self.lookup.insert(name.clone(), self.columns.len());
        self.fields.push(Field::new(name, column.column_type()));
        self.columns.push(column);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Position of a column by name
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// 名前で列を取得
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.lookup
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// 位置で列を取得
    pub fn column_at(&self, position: usize) -> Result<&Column> {
        self.columns.get(position).ok_or(Error::IndexOutOfBounds {
            index: position,
            size: self.columns.len(),
        })
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        self.column(name).map(Column::column_type)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// 列をインデックス付きのSeriesとして取得
    pub fn series(&self, name: &str) -> Result<Series> {
        Series::with_index(name, self.column(name)?.clone(), self.index.clone())
    }

    /// 指定した列だけを持つ新しいDataFrame
    pub fn select(&self, names: &[&str]) -> Result<DataFrame> {
        let columns = names
            .iter()
            .map(|&name| Ok((name.to_string(), self.column(name)?.clone())))
            .collect::<Result<Vec<_>>>()?;
        Self::from_parts(columns, self.index.clone())
    }

    /// 指定した行位置だけを持つ新しいDataFrame（インデックスも同様に取り出す）
    pub fn take_rows(&self, positions: &[usize]) -> Result<DataFrame> {
        let columns = self
            .fields
            .iter()
            .zip(&self.columns)
            .map(|(field, column)| Ok((field.name.clone(), kernels::take(column, positions)?)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_parts(columns, self.index.take(positions)?)
    }

    /// Frame equality: same names, same column values and the same index labels
    pub fn equals(&self, other: &DataFrame) -> bool {
        self.fields == other.fields
            && self.index.equals(&other.index)
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.equals(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Scalar;

    #[test]
    fn test_construction() {
        let df = DataFrame::from_columns(vec![
            ("a", Column::from(vec![1i64, 2, 3])),
            ("b", Column::from(vec!["x", "y", "z"])),
        ])
        .unwrap();
        assert_eq!(df.row_count(), 3);
        assert_eq!(df.column_count(), 2);
        assert_eq!(df.column_names(), vec!["a", "b"]);
        assert_eq!(df.index().get(2).unwrap(), Scalar::Int64(2));
    }

    #[test]
    fn test_construction_errors() {
        let dup = DataFrame::from_columns(vec![
            ("a", Column::from(vec![1i64])),
            ("a", Column::from(vec![2i64])),
        ]);
        assert!(matches!(dup, Err(Error::DuplicateColumnName(_))));

        let ragged = DataFrame::from_columns(vec![
            ("a", Column::from(vec![1i64])),
            ("b", Column::from(vec![2i64, 3])),
        ]);
        assert!(matches!(ragged, Err(Error::InconsistentRowCount { .. })));
    }

    #[test]
    fn test_select_and_take_rows() {
        let df = DataFrame::from_columns(vec![
            ("a", Column::from(vec![1i64, 2, 3])),
            ("b", Column::from(vec![1.5f64, 2.5, 3.5])),
        ])
        .unwrap();
        let b = df.select(&["b"]).unwrap();
        assert_eq!(b.column_names(), vec!["b"]);
        assert!(matches!(df.select(&["zz"]), Err(Error::ColumnNotFound(_))));

        let rows = df.take_rows(&[2, 0]).unwrap();
        assert!(rows.column("a").unwrap().equals(&Column::from(vec![3i64, 1])));
        assert_eq!(rows.index().get(0).unwrap(), Scalar::Int64(2));
    }
}
