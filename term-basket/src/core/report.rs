//! Mining report types.

use crate::mining::{Rule, RuleThresholds};
use serde::{Deserialize, Serialize};

/// Counters collected during a mining run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiningStats {
    /// Rows present in the source table (zero when mining in-memory data)
    pub rows_read: usize,
    /// Rows discarded for missing values
    pub rows_dropped: usize,
    /// Transactions analyzed (`N`)
    pub transactions: u64,
    /// Transactions with fewer than two distinct items
    pub degenerate_transactions: u64,
    /// Distinct items seen
    pub distinct_items: usize,
    /// Distinct co-occurring pairs seen
    pub distinct_pairs: usize,
    /// Rules generated before filtering (two per pair)
    pub rules_generated: usize,
    /// Rules that met every threshold
    pub rules_retained: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
}

/// The outcome of a completed mining run.
///
/// An empty `rules` list means the run finished and nothing met the
/// thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningReport {
    /// Name of the miner that produced the report
    pub miner_name: String,
    /// Timestamp when the run finished (ISO 8601 format)
    pub timestamp: String,
    /// Columns the transactions were built from
    pub columns: Vec<String>,
    /// Thresholds applied to the rules
    pub thresholds: RuleThresholds,
    /// Run counters
    pub stats: MiningStats,
    /// Retained rules in pair discovery order
    pub rules: Vec<Rule>,
}

impl MiningReport {
    /// Creates a report with no rules and zeroed stats.
    pub fn new(miner_name: impl Into<String>, thresholds: RuleThresholds) -> Self {
        Self {
            miner_name: miner_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            columns: Vec::new(),
            thresholds,
            stats: MiningStats::default(),
            rules: Vec::new(),
        }
    }

    /// True when no rule met the thresholds.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Formats the report as pretty-printed JSON.
    pub fn to_json(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{JsonFormatter, RuleFormatter};
        JsonFormatter::new().format(self)
    }
}
