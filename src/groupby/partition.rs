use std::collections::HashMap;

use crate::column::{Column, Scalar};
use crate::compute::kernels;
use crate::error::Result;

/// グループキーから行位置への分割
///
/// Keys are enumerated in first-seen order (or ascending order when sorted);
/// that enumeration fixes the row order of every aggregation. Rows whose key
/// is null belong to no group.
#[derive(Debug, Clone)]
pub struct GroupPartition {
    /// 一意なキー（列挙順）
    keys: Column,

    /// キーごとの行位置（keys と同じ順序）
    rows: Vec<Vec<usize>>,

    /// キーから列挙位置へのマッピング
    lookup: HashMap<Scalar, usize>,
}

impl GroupPartition {
    /// Partitions rows by the per-row `keys`
    pub fn from_keys(keys: &Column, sort: bool) -> Result<Self> {
        let mut lookup: HashMap<Scalar, usize> = HashMap::new();
        let mut first_rows = Vec::new();
        let mut rows: Vec<Vec<usize>> = Vec::new();

        for (i, key) in keys.scalars().enumerate() {
            if key.is_null() {
                continue;
            }
            match lookup.get(&key) {
                Some(&group) => rows[group].push(i),
                None => {
                    lookup.insert(key, rows.len());
                    first_rows.push(i);
                    rows.push(vec![i]);
                }
            }
        }

        let mut unique = kernels::take(keys, &first_rows)?;
        if sort {
            let order = kernels::sort_indices(&unique);
            unique = kernels::take(&unique, &order)?;
            let mut sorted_rows = Vec::with_capacity(rows.len());
            for &group in &order {
                sorted_rows.push(std::mem::take(&mut rows[group]));
            }
            rows = sorted_rows;
            lookup = unique
                .scalars()
                .enumerate()
                .map(|(i, key)| (key, i))
                .collect();
        }

        Ok(Self {
            keys: unique,
            rows,
            lookup,
        })
    }

    /// グループ数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unique keys in enumeration order
    pub fn keys(&self) -> &Column {
        &self.keys
    }

    /// Row positions of the `group`-th key
    pub fn rows(&self, group: usize) -> &[usize] {
        &self.rows[group]
    }

    /// Enumeration position of a key
    pub fn position(&self, key: &Scalar) -> Option<usize> {
        self.lookup.get(key).copied()
    }

    /// Number of rows per key, in enumeration order
    pub fn sizes(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }
}
