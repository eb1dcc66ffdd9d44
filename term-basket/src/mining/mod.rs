//! Pairwise association rule mining.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`transaction`]: each record becomes the set of its distinct values.
//! 2. [`counter`]: one pass tallies item and canonical pair occurrences.
//! 3. [`metrics`]: every observed pair yields two directional rules with
//!    support, confidence and lift.
//! 4. [`filter`]: rules below any threshold are dropped.
//!
//! ```rust
//! use term_basket::mining::{
//!     compute_rules, count_frequencies, filter_rules, RuleThresholds, Transaction, PAIR_SIZE,
//! };
//!
//! let transactions = vec![
//!     Transaction::from_items(["A", "B"]),
//!     Transaction::from_items(["A", "B"]),
//!     Transaction::from_items(["A", "C"]),
//! ];
//! let counts = count_frequencies(&transactions, PAIR_SIZE).unwrap();
//! let rules = compute_rules(&counts).unwrap();
//! assert_eq!(rules.len(), 4);
//!
//! let kept = filter_rules(&rules, &RuleThresholds::none().with_min_confidence(1.0));
//! assert_eq!(kept[0].to_string(), "B -> A: Support=0.67, Confidence=1.00, Lift=1.00");
//! ```

pub mod counter;
pub mod filter;
pub mod item;
pub mod metrics;
pub mod transaction;

pub use counter::{count_frequencies, FrequencyCounts, OrderedCounter, PAIR_SIZE};
pub use filter::{filter_rules, RuleThresholds};
pub use item::{Item, ItemPair};
pub use metrics::{compute_rules, Rule};
pub use transaction::{build_transactions, Transaction};
