//! Items and canonical item pairs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic categorical value appearing in transactions.
///
/// Every value is canonicalized to its string form when it is loaded, so
/// items from different columns are always comparable. The ordering is the
/// lexicographic byte order of that string and is used only to canonicalize
/// pair keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
    /// Creates an item from its canonical string form.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the item value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An unordered pair of two distinct items, stored in canonical order.
///
/// `{A, B}` and `{B, A}` produce the same key, so a pair is counted once no
/// matter which order its items were encountered in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPair {
    first: Item,
    second: Item,
}

impl ItemPair {
    /// Builds the canonical key for two items. Returns `None` when both items
    /// are equal, since a pair needs two distinct items.
    pub fn new(a: Item, b: Item) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The smaller item under the canonical order.
    pub fn first(&self) -> &Item {
        &self.first
    }

    /// The larger item under the canonical order.
    pub fn second(&self) -> &Item {
        &self.second
    }
}

impl fmt::Display for ItemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.first, self.second)
    }
}
