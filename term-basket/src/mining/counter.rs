//! Single-pass item and pair frequency counting.

use super::item::{Item, ItemPair};
use super::transaction::Transaction;
use crate::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, instrument};

/// The only supported combination size: rules relate pairs of items.
pub const PAIR_SIZE: usize = 2;

/// A counter that remembers the order in which keys were first seen.
///
/// Rules are emitted in pair discovery order, so pair counts cannot live in
/// a plain `HashMap`.
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

// Two counters are equal when they hold the same counts in the same order;
// the index is derived from the entries.
impl<K: PartialEq> PartialEq for OrderedCounter<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq> Eq for OrderedCounter<K> {}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Adds `by` to the count of `key`.
    pub fn add(&mut self, key: K, by: u64) {
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].1 += by,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, by));
            }
        }
    }

    /// Adds one to the count of `key`.
    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Returns the count of `key`, zero if it was never seen.
    pub fn get(&self, key: &K) -> u64 {
        self.index
            .get(key)
            .map(|&idx| self.entries[idx].1)
            .unwrap_or(0)
    }

    /// Iterates over `(key, count)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(k, c)| (k, *c))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Item and pair tallies over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyCounts {
    items: OrderedCounter<Item>,
    pairs: OrderedCounter<ItemPair>,
    transactions: u64,
    degenerate: u64,
}

impl FrequencyCounts {
    /// Number of transactions containing `item`.
    pub fn item_count(&self, item: &Item) -> u64 {
        self.items.get(item)
    }

    /// Number of transactions containing both items of `pair`.
    pub fn pair_count(&self, pair: &ItemPair) -> u64 {
        self.pairs.get(pair)
    }

    /// Item counts in first-seen order.
    pub fn items(&self) -> &OrderedCounter<Item> {
        &self.items
    }

    /// Pair counts in first-seen order.
    pub fn pairs(&self) -> &OrderedCounter<ItemPair> {
        &self.pairs
    }

    /// Total number of transactions scanned (`N`).
    pub fn transactions(&self) -> u64 {
        self.transactions
    }

    /// Number of transactions with fewer than two distinct items.
    pub fn degenerate_transactions(&self) -> u64 {
        self.degenerate
    }

    fn observe(&mut self, transaction: &Transaction) {
        self.transactions += 1;
        if transaction.is_degenerate() {
            self.degenerate += 1;
        }
        for item in transaction.items() {
            self.items.increment(item.clone());
        }
        for pair in transaction.pairs() {
            self.pairs.increment(pair);
        }
    }

    /// Merges counts computed over disjoint partitions of the transactions.
    ///
    /// Counts are summed; key order follows the order of `states`, then the
    /// first-seen order inside each state, which matches a single scan over
    /// the concatenated partitions.
    pub fn merge(states: Vec<Self>) -> Result<Self> {
        if states.is_empty() {
            return Err(BasketError::Internal(
                "Cannot merge an empty list of frequency counts".to_string(),
            ));
        }

        let mut merged = Self::default();
        for state in states {
            merged.transactions += state.transactions;
            merged.degenerate += state.degenerate;
            for (item, count) in state.items.entries {
                merged.items.add(item, count);
            }
            for (pair, count) in state.pairs.entries {
                merged.pairs.add(pair, count);
            }
        }
        Ok(merged)
    }
}

/// Counts items and pairs over `transactions` in one pass.
///
/// Every transaction adds one to each of its items and one to each canonical
/// pair of its items. `combo_size` must be [`PAIR_SIZE`].
#[instrument(skip(transactions), fields(transactions = transactions.len()))]
pub fn count_frequencies(transactions: &[Transaction], combo_size: usize) -> Result<FrequencyCounts> {
    if combo_size != PAIR_SIZE {
        return Err(BasketError::Configuration(format!(
            "Only pairs are supported (combination size {PAIR_SIZE}), got {combo_size}"
        )));
    }

    let mut counts = FrequencyCounts::default();
    for transaction in transactions {
        counts.observe(transaction);
    }

    debug!(
        items.distinct = counts.items.len(),
        pairs.distinct = counts.pairs.len(),
        transactions.degenerate = counts.degenerate,
        "Counted item frequencies"
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> Vec<Transaction> {
        vec![
            Transaction::from_items(["A", "B"]),
            Transaction::from_items(["A", "B"]),
            Transaction::from_items(["A", "C"]),
        ]
    }

    fn pair(a: &str, b: &str) -> ItemPair {
        ItemPair::new(a.into(), b.into()).unwrap()
    }

    #[test]
    fn test_counts_for_reference_transactions() {
        let counts = count_frequencies(&scenario_a(), PAIR_SIZE).unwrap();
        assert_eq!(counts.transactions(), 3);
        assert_eq!(counts.item_count(&"A".into()), 3);
        assert_eq!(counts.item_count(&"B".into()), 2);
        assert_eq!(counts.item_count(&"C".into()), 1);
        assert_eq!(counts.pair_count(&pair("A", "B")), 2);
        assert_eq!(counts.pair_count(&pair("C", "A")), 1);
        assert_eq!(counts.pair_count(&pair("B", "C")), 0);
    }

    #[test]
    fn test_single_item_transaction_adds_no_pairs() {
        let transactions = vec![Transaction::from_items(["A"])];
        let counts = count_frequencies(&transactions, PAIR_SIZE).unwrap();
        assert_eq!(counts.item_count(&"A".into()), 1);
        assert!(counts.pairs().is_empty());
        assert_eq!(counts.degenerate_transactions(), 1);
    }

    #[test]
    fn test_pairs_keep_discovery_order() {
        let transactions = vec![
            Transaction::from_items(["Y", "Z"]),
            Transaction::from_items(["A", "B"]),
            Transaction::from_items(["Y", "Z"]),
        ];
        let counts = count_frequencies(&transactions, PAIR_SIZE).unwrap();
        let order: Vec<_> = counts.pairs().iter().map(|(p, c)| (p.to_string(), c)).collect();
        assert_eq!(
            order,
            vec![("{Y, Z}".to_string(), 2), ("{A, B}".to_string(), 1)]
        );
    }

    #[test]
    fn test_other_combination_sizes_are_rejected() {
        let err = count_frequencies(&scenario_a(), 3).unwrap_err();
        assert!(matches!(err, BasketError::Configuration(_)));
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let transactions = scenario_a();
        let whole = count_frequencies(&transactions, PAIR_SIZE).unwrap();
        let parts = vec![
            count_frequencies(&transactions[..1], PAIR_SIZE).unwrap(),
            count_frequencies(&transactions[1..], PAIR_SIZE).unwrap(),
        ];
        assert_eq!(FrequencyCounts::merge(parts).unwrap(), whole);
    }

    #[test]
    fn test_counter_equality_follows_entry_order() {
        let mut ab = OrderedCounter::new();
        ab.increment("a");
        ab.add("b", 2);

        let mut same = OrderedCounter::default();
        same.add("a", 1);
        same.increment("b");
        same.increment("b");
        assert_eq!(ab, same);

        let mut ba = OrderedCounter::new();
        ba.add("b", 2);
        ba.increment("a");
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_merge_of_nothing_fails() {
        assert!(FrequencyCounts::merge(vec![]).is_err());
    }
}
