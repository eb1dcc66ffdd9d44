//! Transactions: the set of distinct values of one record.

use super::item::{Item, ItemPair};
use crate::loader::Record;
use std::collections::BTreeSet;
use tracing::warn;

/// The distinct items of one record.
///
/// Duplicate values across columns collapse into a single item. That is the
/// intended set semantics, not an error: a row whose description equals its
/// business unit simply carries one item fewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    items: BTreeSet<Item>,
}

impl Transaction {
    /// Builds the transaction of a record.
    pub fn from_record(record: &Record) -> Self {
        Self::from_items(record.values().iter().cloned())
    }

    /// Builds a transaction from arbitrary items, dropping duplicates.
    pub fn from_items<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the transaction holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when fewer than two distinct items remain, so the transaction
    /// cannot contribute any pair.
    pub fn is_degenerate(&self) -> bool {
        self.items.len() < 2
    }

    /// True if the transaction contains `item`.
    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    /// Iterates over the items in canonical order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Iterates over every canonical 2-combination of the items.
    ///
    /// A transaction with `k` items yields `k * (k - 1) / 2` pairs, each
    /// already in canonical order since the items are iterated sorted.
    pub fn pairs(&self) -> impl Iterator<Item = ItemPair> + '_ {
        self.items.iter().enumerate().flat_map(move |(i, first)| {
            self.items.iter().skip(i + 1).filter_map(move |second| {
                ItemPair::new(first.clone(), second.clone())
            })
        })
    }
}

/// Converts records into transactions, one per record, in order.
///
/// Degenerate transactions are kept (they still count toward item totals
/// and `N`) and reported once as a warning.
pub fn build_transactions(records: &[Record]) -> Vec<Transaction> {
    let transactions: Vec<Transaction> = records.iter().map(Transaction::from_record).collect();

    let degenerate = transactions.iter().filter(|t| t.is_degenerate()).count();
    if degenerate > 0 {
        warn!(
            transactions.total = transactions.len(),
            transactions.degenerate = degenerate,
            "Some transactions have fewer than two distinct items and contribute no pairs"
        );
    }

    transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RecordSchema;

    #[test]
    fn test_duplicates_collapse() {
        let schema = RecordSchema::new(["descripcion", "negocio", "linea"]).unwrap();
        let record = Record::new(
            &schema,
            vec!["pan".into(), "panaderia".into(), "pan".into()],
        )
        .unwrap();

        let transaction = Transaction::from_record(&record);
        assert_eq!(transaction.len(), 2);
        assert!(transaction.contains(&Item::from("pan")));
        assert!(!transaction.is_degenerate());
    }

    #[test]
    fn test_pairs_are_all_canonical_combinations() {
        let transaction = Transaction::from_items(["C", "A", "B"]);
        let pairs: Vec<String> = transaction.pairs().map(|p| p.to_string()).collect();
        assert_eq!(pairs, vec!["{A, B}", "{A, C}", "{B, C}"]);
    }

    #[test]
    fn test_single_item_transaction_has_no_pairs() {
        let transaction = Transaction::from_items(["A", "A"]);
        assert_eq!(transaction.len(), 1);
        assert!(transaction.is_degenerate());
        assert_eq!(transaction.pairs().count(), 0);
    }

    #[test]
    fn test_build_transactions_keeps_order_and_degenerates() {
        let schema = RecordSchema::new(["a", "b"]).unwrap();
        let records = vec![
            Record::new(&schema, vec!["x".into(), "y".into()]).unwrap(),
            Record::new(&schema, vec!["z".into(), "z".into()]).unwrap(),
        ];
        let transactions = build_transactions(&records);
        assert_eq!(transactions.len(), 2);
        assert!(transactions[1].is_degenerate());
        assert!(transactions[0].contains(&Item::from("y")));
    }
}
