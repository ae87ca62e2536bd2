//! Secondary indices: key → rid multi-maps over a B+-tree.
//!
//! A [`BPlusIndex`] pairs a [`BPlusTree`] holding each distinct key once
//! with an ordered multi-map from key to rids; the tree answers ordering
//! questions, the map carries the multiplicity. [`AnyIndex`] is the tagged
//! sum of the three concrete key types a column can have — dispatch on the
//! tag happens once at the boundary and everything behind it is
//! monomorphic.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::RangeBounds;

use crate::datum::{DataType, Value};

use super::btree::BPlusTree;
use super::tuple::Rid;

/// A key type usable by a secondary index.
///
/// Implementations tie a Rust key type to its [`DataType`] tag and define
/// how keys are pulled out of [`Value`]s and how typed indices are stored
/// in (and borrowed back out of) [`AnyIndex`].
pub trait IndexKey: Ord + Clone {
    /// Column type this key type indexes.
    const DATA_TYPE: DataType;

    /// Extracts a key from a value of the matching variant.
    fn from_value(value: &Value) -> Option<Self>;

    /// Wraps a typed index into the corresponding [`AnyIndex`] variant.
    fn into_any(index: BPlusIndex<Self>) -> AnyIndex;

    /// Borrows the typed index out of an [`AnyIndex`], if the variant
    /// matches.
    fn from_any(index: &AnyIndex) -> Option<&BPlusIndex<Self>>;
}

impl IndexKey for i64 {
    const DATA_TYPE: DataType = DataType::Integer;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    fn into_any(index: BPlusIndex<Self>) -> AnyIndex {
        AnyIndex::Integer(index)
    }

    fn from_any(index: &AnyIndex) -> Option<&BPlusIndex<Self>> {
        match index {
            AnyIndex::Integer(index) => Some(index),
            _ => None,
        }
    }
}

/// An `f64` index key ordered by [`f64::total_cmp`], so doubles carry the
/// total order the tree and the multi-map require.
#[derive(Debug, Clone, Copy)]
pub struct DoubleKey(pub f64);

impl PartialEq for DoubleKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for DoubleKey {}

impl PartialOrd for DoubleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DoubleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl IndexKey for DoubleKey {
    const DATA_TYPE: DataType = DataType::Double;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(n) => Some(DoubleKey(*n)),
            _ => None,
        }
    }

    fn into_any(index: BPlusIndex<Self>) -> AnyIndex {
        AnyIndex::Double(index)
    }

    fn from_any(index: &AnyIndex) -> Option<&BPlusIndex<Self>> {
        match index {
            AnyIndex::Double(index) => Some(index),
            _ => None,
        }
    }
}

impl IndexKey for String {
    const DATA_TYPE: DataType = DataType::Varchar;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Varchar(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn into_any(index: BPlusIndex<Self>) -> AnyIndex {
        AnyIndex::Varchar(index)
    }

    fn from_any(index: &AnyIndex) -> Option<&BPlusIndex<Self>> {
        match index {
            AnyIndex::Varchar(index) => Some(index),
            _ => None,
        }
    }
}

/// An ordered multi-map from column key to rids.
#[derive(Debug)]
pub struct BPlusIndex<K: IndexKey> {
    tree: BPlusTree<K>,
    rids: BTreeMap<K, Vec<Rid>>,
}

impl<K: IndexKey> BPlusIndex<K> {
    /// Creates an empty index whose tree has the given minimum degree.
    pub fn new(degree: usize) -> Self {
        Self {
            tree: BPlusTree::new(degree),
            rids: BTreeMap::new(),
        }
    }

    /// Associates `rid` with `key`. The key enters the tree on its first
    /// occurrence.
    pub fn insert(&mut self, key: K, rid: Rid) {
        let entry = self.rids.entry(key.clone()).or_default();
        if entry.is_empty() {
            self.tree.insert(key);
        }
        entry.push(rid);
    }

    /// Removes one `(key, rid)` pair; the key leaves the tree when its last
    /// rid goes. Removing an absent pair is a silent no-op.
    pub fn remove(&mut self, key: &K, rid: Rid) {
        let Some(entry) = self.rids.get_mut(key) else {
            return;
        };
        if let Some(pos) = entry.iter().position(|r| *r == rid) {
            entry.remove(pos);
        }
        if entry.is_empty() {
            self.rids.remove(key);
            self.tree.remove(key);
        }
    }

    /// Returns the rids associated with `key`.
    pub fn search(&self, key: &K) -> Vec<Rid> {
        self.rids.get(key).cloned().unwrap_or_default()
    }

    /// Returns the rids of every key within `range`, in ascending key
    /// order.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Vec<Rid> {
        let mut rids = Vec::new();
        for key in self.tree.range(range) {
            if let Some(entry) = self.rids.get(&key) {
                rids.extend_from_slice(entry);
            }
        }
        rids
    }

    /// Returns the rids of every key `k` with `lo <= k <= hi`, in
    /// ascending key order.
    pub fn range_query(&self, lo: &K, hi: &K) -> Vec<Rid> {
        self.range(lo..=hi)
    }

    /// All `(key, rid)` pairs in ascending key order.
    pub fn entries(&self) -> Vec<(K, Rid)> {
        self.rids
            .iter()
            .flat_map(|(key, rids)| rids.iter().map(move |rid| (key.clone(), *rid)))
            .collect()
    }

    /// Number of `(key, rid)` pairs.
    pub fn len(&self) -> usize {
        self.rids.values().map(Vec::len).sum()
    }

    /// Returns true if the index holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.rids.is_empty()
    }
}

/// A secondary index over any supported key type.
#[derive(Debug)]
pub enum AnyIndex {
    Integer(BPlusIndex<i64>),
    Double(BPlusIndex<DoubleKey>),
    Varchar(BPlusIndex<String>),
}

impl AnyIndex {
    /// Creates an empty index for keys of the given column type.
    pub fn for_data_type(data_type: DataType, degree: usize) -> Self {
        match data_type {
            DataType::Integer => AnyIndex::Integer(BPlusIndex::new(degree)),
            DataType::Double => AnyIndex::Double(BPlusIndex::new(degree)),
            DataType::Varchar => AnyIndex::Varchar(BPlusIndex::new(degree)),
        }
    }

    /// Key type of this index.
    pub fn data_type(&self) -> DataType {
        match self {
            AnyIndex::Integer(_) => DataType::Integer,
            AnyIndex::Double(_) => DataType::Double,
            AnyIndex::Varchar(_) => DataType::Varchar,
        }
    }

    /// Adds the pair `(value, rid)`. Returns false if the value's variant
    /// does not match the index key type.
    pub(crate) fn insert_value(&mut self, value: &Value, rid: Rid) -> bool {
        match self {
            AnyIndex::Integer(index) => match i64::from_value(value) {
                Some(key) => {
                    index.insert(key, rid);
                    true
                }
                None => false,
            },
            AnyIndex::Double(index) => match DoubleKey::from_value(value) {
                Some(key) => {
                    index.insert(key, rid);
                    true
                }
                None => false,
            },
            AnyIndex::Varchar(index) => match String::from_value(value) {
                Some(key) => {
                    index.insert(key, rid);
                    true
                }
                None => false,
            },
        }
    }

    /// Removes the pair `(value, rid)`. A variant mismatch means the pair
    /// cannot exist, so it falls under the silent no-op rule.
    pub(crate) fn remove_value(&mut self, value: &Value, rid: Rid) {
        match self {
            AnyIndex::Integer(index) => {
                if let Some(key) = i64::from_value(value) {
                    index.remove(&key, rid);
                }
            }
            AnyIndex::Double(index) => {
                if let Some(key) = DoubleKey::from_value(value) {
                    index.remove(&key, rid);
                }
            }
            AnyIndex::Varchar(index) => {
                if let Some(key) = String::from_value(value) {
                    index.remove(&key, rid);
                }
            }
        }
    }
}
