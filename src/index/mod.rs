use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use crate::column::{Column, ColumnType, Int64Column, Scalar};
use crate::compute::kernels;
use crate::error::{Error, Result};

/// インデックス構造体
///
/// DataFrameやSeriesの行ラベルを表現する。Labels may repeat; lookups return the
/// first matching position.
#[derive(Debug, Clone)]
pub struct Index {
    /// インデックス値
    labels: Column,

    /// インデックスの名前（オプション）
    name: Option<String>,

    /// 値から最初の位置へのマッピング（初回検索時に構築し、クローン間で共有）
    positions: Arc<OnceLock<HashMap<Scalar, usize>>>,
}

impl Index {
    /// 新しいインデックスを作成
    pub fn new(labels: Column) -> Self {
        Self::with_name(labels, None)
    }

    /// 名前付きの新しいインデックスを作成
    pub fn with_name(labels: Column, name: Option<String>) -> Self {
        Self {
            labels,
            name,
            positions: Arc::new(OnceLock::new()),
        }
    }

    /// `0..len` の整数インデックス
    pub fn range(len: usize) -> Self {
        Self::new(Column::Int64(Int64Column::new((0..len as i64).collect())))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rename(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn labels(&self) -> &Column {
        &self.labels
    }

    pub fn data_type(&self) -> ColumnType {
        self.labels.column_type()
    }

    /// 位置からラベルを取得
    pub fn get(&self, position: usize) -> Result<Scalar> {
        self.labels.get(position)
    }

    fn positions(&self) -> &HashMap<Scalar, usize> {
        self.positions.get_or_init(|| {
            let mut map = HashMap::with_capacity(self.labels.len());
            for (i, label) in self.labels.scalars().enumerate() {
                map.entry(label).or_insert(i);
            }
            map
        })
    }

    /// ラベルから最初の位置を取得する。見つからなければ None
    pub fn get_loc(&self, label: &Scalar) -> Option<usize> {
        self.positions().get(label).copied()
    }

    pub fn contains(&self, label: &Scalar) -> bool {
        self.get_loc(label).is_some()
    }

    pub fn is_unique(&self) -> bool {
        self.positions().len() == self.labels.len()
    }

    /// Same labels in the same order (names are ignored)
    pub fn equals(&self, other: &Index) -> bool {
        Arc::ptr_eq(&self.positions, &other.positions) || self.labels.equals(&other.labels)
    }

    pub fn take(&self, positions: &[usize]) -> Result<Index> {
        Ok(Index::with_name(
            kernels::take(&self.labels, positions)?,
            self.name.clone(),
        ))
    }

    /// 共通するラベル（self の順序、重複なし）
    pub fn intersection(&self, other: &Index) -> Result<Index> {
        if self.data_type() != other.data_type() {
            return Err(Error::TypeMismatch {
                expected: self.data_type(),
                found: other.data_type(),
            });
        }
        let mut seen = HashSet::new();
        let keep: Vec<usize> = self
            .labels
            .scalars()
            .enumerate()
            .filter(|(_, label)| other.contains(label) && seen.insert(label.clone()))
            .map(|(i, _)| i)
            .collect();
        self.take(&keep)
    }

    /// すべてのインデックスを連結して重複を除いたもの（初出順）
    pub fn union_unique(indexes: &[&Index]) -> Result<Index> {
        let labels: Vec<&Column> = indexes.iter().map(|idx| &idx.labels).collect();
        let combined = kernels::concat(&labels)?;
        let name = indexes.first().and_then(|idx| idx.name.clone());
        Ok(Index::with_name(kernels::unique(&combined)?, name))
    }

    /// 昇順に並べ替えたインデックス（NULLは末尾）
    pub fn sort_values(&self) -> Result<Index> {
        self.take(&kernels::sort_indices(&self.labels))
    }
}

impl From<Column> for Index {
    fn from(labels: Column) -> Self {
        Index::new(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_index() {
        let idx = Index::range(3);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.get_loc(&Scalar::Int64(2)), Some(2));
        assert_eq!(idx.get_loc(&Scalar::Int64(5)), None);
        assert!(idx.is_unique());
    }

    #[test]
    fn test_duplicate_labels_return_first_position() {
        let idx = Index::new(Column::from(vec!["a", "b", "a"]));
        assert_eq!(idx.get_loc(&Scalar::from("a")), Some(0));
        assert!(!idx.is_unique());
    }

    #[test]
    fn test_intersection_keeps_left_order() {
        let left = Index::new(Column::from(vec![4i64, 1, 3, 1]));
        let right = Index::new(Column::from(vec![1i64, 3, 9]));
        let both = left.intersection(&right).unwrap();
        assert!(both.labels().equals(&Column::from(vec![1i64, 3])));
    }

    #[test]
    fn test_union_unique_then_sort() {
        let a = Index::new(Column::from(vec![3i64, 1]));
        let b = Index::new(Column::from(vec![2i64, 3]));
        let union = Index::union_unique(&[&a, &b]).unwrap();
        assert!(union.labels().equals(&Column::from(vec![3i64, 1, 2])));
        let sorted = union.sort_values().unwrap();
        assert!(sorted.labels().equals(&Column::from(vec![1i64, 2, 3])));
    }
}
