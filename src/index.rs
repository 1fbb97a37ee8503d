use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::ast::ComparisonOp;
use crate::value::Value;

/// The two index representations a table can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Unordered buckets, O(1) average key lookup.
    Hash,
    /// Keys traversable in ascending order.
    Ordered,
}

impl IndexKind {
    /// Resolves the generate-command keyword. `hash` selects the hash
    /// representation; any other keyword selects the ordered one.
    pub fn from_keyword(token: &str) -> Self {
        if token == "hash" {
            Self::Hash
        } else {
            Self::Ordered
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Ordered => write!(f, "bst"),
        }
    }
}

/// The secondary index of a table: a multi-valued mapping from cell value to
/// the row ids sharing that value, keyed on exactly one column.
///
/// A single tagged enum rather than two optional maps, so a table can never
/// hold both representations at once. Buckets keep row ids in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub enum TableIndex {
    /// No index is active.
    #[default]
    None,
    /// Hash representation over the column at the stored ordinal.
    Hash {
        column: usize,
        map: HashMap<Value, Vec<usize>>,
    },
    /// Ordered representation over the column at the stored ordinal.
    Ordered {
        column: usize,
        map: BTreeMap<Value, Vec<usize>>,
    },
}

impl TableIndex {
    /// Builds a fresh index of `kind` over `column`, visiting every current
    /// row in row-id order.
    pub fn build(kind: IndexKind, column: usize, rows: &[Vec<Value>]) -> Self {
        match kind {
            IndexKind::Hash => {
                let mut map: HashMap<Value, Vec<usize>> = HashMap::new();
                for (id, row) in rows.iter().enumerate() {
                    map.entry(row[column].clone()).or_default().push(id);
                }
                Self::Hash { column, map }
            }
            IndexKind::Ordered => {
                let mut map: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
                for (id, row) in rows.iter().enumerate() {
                    map.entry(row[column].clone()).or_default().push(id);
                }
                Self::Ordered { column, map }
            }
        }
    }

    /// Returns the active representation, if any.
    pub fn kind(&self) -> Option<IndexKind> {
        match self {
            Self::None => None,
            Self::Hash { .. } => Some(IndexKind::Hash),
            Self::Ordered { .. } => Some(IndexKind::Ordered),
        }
    }

    /// Returns the ordinal of the indexed column, if an index is active.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Hash { column, .. } | Self::Ordered { column, .. } => Some(*column),
        }
    }

    /// Returns `true` if no index is active.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Appends a freshly assigned row id to the bucket for `value`.
    ///
    /// Appended ids are never reused or shifted, so this keeps the index
    /// exact without a rebuild. No-op when no index is active.
    pub fn insert(&mut self, value: &Value, row_id: usize) {
        match self {
            Self::None => {}
            Self::Hash { map, .. } => map.entry(value.clone()).or_default().push(row_id),
            Self::Ordered { map, .. } => map.entry(value.clone()).or_default().push(row_id),
        }
    }

    /// Visits the bucket of every distinct key satisfying `key <op> value`,
    /// testing the operator once per key. Hash keys arrive in arbitrary
    /// order, ordered keys in ascending order.
    pub fn matching_buckets(&self, op: ComparisonOp, value: &Value, mut visit: impl FnMut(&[usize])) {
        match self {
            Self::None => {}
            Self::Hash { map, .. } => {
                for (key, bucket) in map {
                    if op.compare(key, value) {
                        visit(bucket);
                    }
                }
            }
            Self::Ordered { map, .. } => {
                for (key, bucket) in map {
                    if op.compare(key, value) {
                        visit(bucket);
                    }
                }
            }
        }
    }

    /// Direct access to the hash buckets when the hash representation is
    /// active on `column`; used by the join engine to probe in place.
    pub fn hash_buckets_on(&self, column: usize) -> Option<&HashMap<Value, Vec<usize>>> {
        match self {
            Self::Hash { column: c, map } if *c == column => Some(map),
            _ => None,
        }
    }

    /// Every row id currently present across all buckets, sorted.
    pub fn row_ids(&self) -> Vec<usize> {
        let mut ids = Vec::new();
        match self {
            Self::None => {}
            Self::Hash { map, .. } => {
                for bucket in map.values() {
                    ids.extend_from_slice(bucket);
                }
            }
            Self::Ordered { map, .. } => {
                for bucket in map.values() {
                    ids.extend_from_slice(bucket);
                }
            }
        }
        ids.sort_unstable();
        ids
    }
}
