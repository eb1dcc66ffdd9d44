//! The end-to-end rule mining run.

use super::report::{MiningReport, MiningStats};
use crate::loader::{RecordLoader, RecordSchema};
use crate::logging::{truncate_field, LogConfig};
use crate::mining::{
    build_transactions, compute_rules, count_frequencies, filter_rules, RuleThresholds,
    Transaction, PAIR_SIZE,
};
use crate::prelude::*;
use crate::security::SqlSecurity;
use crate::sources::DataSource;
use crate::{log_data_op, log_rule};
use datafusion::prelude::{SessionConfig, SessionContext};
use std::time::Instant;
use tracing::{info, instrument};

/// Mines pairwise association rules from a table.
///
/// # Examples
///
/// ```rust,no_run
/// use datafusion::prelude::SessionContext;
/// use term_basket::core::RuleMiner;
/// use term_basket::mining::RuleThresholds;
///
/// # async fn example(ctx: &SessionContext) -> term_basket::prelude::Result<()> {
/// let miner = RuleMiner::builder("store_losses")
///     .columns(["descripcion", "negocio", "mes", "linea"])
///     .thresholds(RuleThresholds::default().with_min_lift(1.5))
///     .build()?;
///
/// let report = miner.run(ctx).await?;
/// for rule in &report.rules {
///     println!("{rule}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RuleMiner {
    name: String,
    description: Option<String>,
    schema: RecordSchema,
    thresholds: RuleThresholds,
    combo_size: usize,
    table_name: String,
    log_config: LogConfig,
}

impl RuleMiner {
    /// Creates a new builder for constructing a miner.
    pub fn builder(name: impl Into<String>) -> RuleMinerBuilder {
        RuleMinerBuilder::new(name)
    }

    /// Returns the name of the miner.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description of the miner if available.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the selected columns.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Returns the rule thresholds.
    pub fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    /// Returns the table the miner reads from.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Loads records from the miner's table in `ctx` and mines them.
    ///
    /// Fails without partial results if the table cannot be read, lacks a
    /// selected column, or has no complete rows.
    #[instrument(skip(self, ctx), fields(
        miner.name = %self.name,
        table.name = %self.table_name,
        columns = self.schema.len()
    ))]
    pub async fn run(&self, ctx: &SessionContext) -> Result<MiningReport> {
        info!(
            miner.name = %self.name,
            miner.columns = ?self.schema.columns(),
            thresholds.support = self.thresholds.min_support,
            thresholds.confidence = self.thresholds.min_confidence,
            thresholds.lift = self.thresholds.min_lift,
            "Starting rule mining"
        );
        let start_time = Instant::now();

        let loaded = RecordLoader::new(self.schema.clone())
            .with_log_config(self.log_config.clone())
            .load(ctx, &self.table_name)
            .await?;
        let transactions = build_transactions(&loaded.records);

        let mut report = self.mine_transactions(&transactions)?;
        report.stats.rows_read = loaded.rows_read;
        report.stats.rows_dropped = loaded.rows_dropped;
        report.stats.execution_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            miner.name = %self.name,
            rows.read = report.stats.rows_read,
            rows.dropped = report.stats.rows_dropped,
            transactions = report.stats.transactions,
            rules.generated = report.stats.rules_generated,
            rules.retained = report.stats.rules_retained,
            duration_ms = report.stats.execution_time_ms,
            "Rule mining completed"
        );

        Ok(report)
    }

    /// Registers `source` in a fresh context under the miner's table name,
    /// then runs.
    ///
    /// The context scans with a single partition so rows arrive in file
    /// order and rules come out in the order their pairs first appear.
    pub async fn run_source(&self, source: &dyn DataSource) -> Result<MiningReport> {
        log_data_op!(
            self.log_config,
            source = %source.description(),
            table.name = %self.table_name,
            "Registering source for mining"
        );
        let ctx = SessionContext::new_with_config(SessionConfig::new().with_target_partitions(1));
        source.register(&ctx, &self.table_name).await?;
        self.run(&ctx).await
    }

    /// Mines already-built transactions. No I/O is involved.
    pub fn mine(&self, transactions: &[Transaction]) -> Result<MiningReport> {
        let start_time = Instant::now();
        let mut report = self.mine_transactions(transactions)?;
        report.stats.execution_time_ms = start_time.elapsed().as_millis() as u64;
        Ok(report)
    }

    fn mine_transactions(&self, transactions: &[Transaction]) -> Result<MiningReport> {
        if transactions.is_empty() {
            return Err(BasketError::EmptyInput);
        }

        let counts = count_frequencies(transactions, self.combo_size)?;
        let rules = compute_rules(&counts)?;
        for rule in &rules {
            log_rule!(
                self.log_config,
                rule.antecedent = %truncate_field(rule.antecedent.as_str(), self.log_config.max_field_length),
                rule.consequent = %truncate_field(rule.consequent.as_str(), self.log_config.max_field_length),
                rule.support = rule.support,
                rule.confidence = rule.confidence,
                rule.lift = rule.lift,
                "Generated rule"
            );
        }
        let retained = filter_rules(&rules, &self.thresholds);

        let mut report = MiningReport::new(&self.name, self.thresholds);
        report.columns = self.schema.columns().to_vec();
        report.stats = MiningStats {
            transactions: counts.transactions(),
            degenerate_transactions: counts.degenerate_transactions(),
            distinct_items: counts.items().len(),
            distinct_pairs: counts.pairs().len(),
            rules_generated: rules.len(),
            rules_retained: retained.len(),
            ..MiningStats::default()
        };
        report.rules = retained;
        Ok(report)
    }
}

/// Builder for [`RuleMiner`].
#[derive(Debug, Clone)]
pub struct RuleMinerBuilder {
    name: String,
    description: Option<String>,
    columns: Option<Vec<String>>,
    thresholds: RuleThresholds,
    combo_size: usize,
    table_name: String,
    log_config: LogConfig,
}

impl RuleMinerBuilder {
    /// Creates a builder with the default columns, thresholds and the
    /// `data` table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            columns: None,
            thresholds: RuleThresholds::default(),
            combo_size: PAIR_SIZE,
            table_name: "data".to_string(),
            log_config: LogConfig::default(),
        }
    }

    /// Sets a description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the columns whose values form each transaction.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the rule thresholds.
    pub fn thresholds(mut self, thresholds: RuleThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets the combination size. Only [`PAIR_SIZE`] is accepted by
    /// [`build`](Self::build).
    pub fn combo_size(mut self, combo_size: usize) -> Self {
        self.combo_size = combo_size;
        self
    }

    /// Sets the table the miner reads from.
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Sets the logging configuration.
    pub fn log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Validates the configuration and builds the miner.
    pub fn build(self) -> Result<RuleMiner> {
        self.thresholds.validate()?;
        if self.combo_size != PAIR_SIZE {
            return Err(BasketError::Configuration(format!(
                "Only pairs are supported (combination size {PAIR_SIZE}), got {}",
                self.combo_size
            )));
        }
        SqlSecurity::validate_table_name(&self.table_name)?;
        let schema = match self.columns {
            Some(columns) => RecordSchema::new(columns)?,
            None => RecordSchema::default(),
        };

        Ok(RuleMiner {
            name: self.name,
            description: self.description,
            schema,
            thresholds: self.thresholds,
            combo_size: self.combo_size,
            table_name: self.table_name,
            log_config: self.log_config,
        })
    }
}
