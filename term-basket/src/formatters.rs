//! Report formatting for mining results.
//!
//! Three formatters are provided: [`HumanFormatter`] for console output,
//! [`JsonFormatter`] for programmatic consumption and [`MarkdownFormatter`]
//! for documentation.
//!
//! # Examples
//!
//! ```rust
//! use term_basket::core::MiningReport;
//! use term_basket::formatters::{HumanFormatter, RuleFormatter};
//! use term_basket::mining::RuleThresholds;
//!
//! let report = MiningReport::new("losses", RuleThresholds::default());
//! let output = HumanFormatter::new().format(&report).unwrap();
//! assert_eq!(output, "No rules matched the filtering criteria.\n");
//! ```

use crate::core::MiningReport;
use crate::mining::Rule;
use crate::prelude::*;
use std::fmt::Write;

/// Message printed when no rule met the thresholds.
pub const NO_RULES_MESSAGE: &str = "No rules matched the filtering criteria.";

/// Header printed before the rule lines.
pub const RULES_HEADER: &str = "Filtered association rules:";

/// Configuration options for formatting mining reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the run summary (counts, thresholds, timing)
    pub include_summary: bool,
    /// Maximum number of rules to display (`None` for all)
    pub max_rules: Option<usize>,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

impl FormatterConfig {
    /// Only the rules, exactly one line per rule.
    pub fn minimal() -> Self {
        Self {
            include_summary: false,
            max_rules: None,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Rules plus a run summary, colorized.
    pub fn detailed() -> Self {
        Self {
            include_summary: true,
            max_rules: None,
            use_colors: true,
            include_timestamps: true,
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_summary: true,
            max_rules: Some(50),
            use_colors: false,
            include_timestamps: true,
        }
    }

    /// Sets whether to include the run summary.
    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }

    /// Sets the maximum number of rules to display.
    pub fn with_max_rules(mut self, max: Option<usize>) -> Self {
        self.max_rules = max;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn visible_rules<'a>(&self, rules: &'a [Rule]) -> &'a [Rule] {
        match self.max_rules {
            Some(max) => &rules[..max.min(rules.len())],
            None => rules,
        }
    }
}

/// Trait for formatting mining reports into different output formats.
pub trait RuleFormatter {
    /// Formats a report with the formatter's own configuration.
    fn format(&self, report: &MiningReport) -> Result<String>;

    /// Formats a report with a custom configuration.
    fn format_with_config(&self, report: &MiningReport, _config: &FormatterConfig) -> Result<String> {
        self.format(report)
    }
}

/// Formats reports as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleFormatter for JsonFormatter {
    fn format(&self, report: &MiningReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &MiningReport, config: &FormatterConfig) -> Result<String> {
        let mut filtered = report.clone();
        filtered.rules = config.visible_rules(&report.rules).to_vec();
        if !config.include_timestamps {
            filtered.timestamp = String::new();
        }

        let json = if self.pretty {
            serde_json::to_string_pretty(&filtered)
        } else {
            serde_json::to_string(&filtered)
        };
        json.map_err(|e| BasketError::Serialization(format!("Failed to serialize report to JSON: {e}")))
    }
}

/// Formats reports for the console: one line per rule.
///
/// ```text
/// Filtered association rules:
///
/// A -> B: Support=0.67, Confidence=0.67, Lift=1.00
/// ```
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn write_summary(output: &mut String, report: &MiningReport, config: &FormatterConfig) -> Result<()> {
        let stats = &report.stats;
        let t = &report.thresholds;
        writeln!(output, "Miner: {}", report.miner_name)?;
        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", report.timestamp)?;
        }
        writeln!(output, "Columns: {}", report.columns.join(", "))?;
        writeln!(
            output,
            "Rows: {} read, {} dropped for missing values",
            stats.rows_read, stats.rows_dropped
        )?;
        writeln!(
            output,
            "Transactions: {} ({} with fewer than two distinct items)",
            stats.transactions, stats.degenerate_transactions
        )?;
        writeln!(
            output,
            "Distinct items: {}, distinct pairs: {}",
            stats.distinct_items, stats.distinct_pairs
        )?;
        writeln!(
            output,
            "Thresholds: Support>={:.2}, Confidence>={:.2}, Lift>={:.2}",
            t.min_support, t.min_confidence, t.min_lift
        )?;
        writeln!(
            output,
            "Rules: {} of {} retained",
            stats.rules_retained, stats.rules_generated
        )?;
        writeln!(output, "Execution Time: {}ms", stats.execution_time_ms)?;
        writeln!(output)?;
        Ok(())
    }
}

impl RuleFormatter for HumanFormatter {
    fn format(&self, report: &MiningReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &MiningReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();

        if config.include_summary {
            Self::write_summary(&mut output, report, config)?;
        }

        if report.rules.is_empty() {
            writeln!(output, "{NO_RULES_MESSAGE}")?;
            return Ok(output);
        }

        writeln!(output, "{RULES_HEADER}")?;
        writeln!(output)?;

        let visible = config.visible_rules(&report.rules);
        for rule in visible {
            if config.use_colors {
                writeln!(
                    output,
                    "\x1b[1m{}\x1b[0m: Support={:.2}, Confidence={:.2}, Lift=\x1b[32m{:.2}\x1b[0m",
                    rule.relation(),
                    rule.support,
                    rule.confidence,
                    rule.lift
                )?;
            } else {
                writeln!(output, "{rule}")?;
            }
        }

        if report.rules.len() > visible.len() {
            writeln!(output)?;
            writeln!(
                output,
                "... and {} more rules not shown",
                report.rules.len() - visible.len()
            )?;
        }

        Ok(output)
    }
}

/// Formats reports as Markdown suitable for documentation.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    /// Creates a new Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    /// Creates a new Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleFormatter for MarkdownFormatter {
    fn format(&self, report: &MiningReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &MiningReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        writeln!(output, "{h} Association Rules: {}", report.miner_name)?;
        writeln!(output)?;

        if config.include_timestamps {
            writeln!(output, "**Timestamp:** {}", report.timestamp)?;
            writeln!(output)?;
        }

        if config.include_summary {
            let stats = &report.stats;
            writeln!(output, "{h}# Summary")?;
            writeln!(output)?;
            writeln!(output, "| Metric | Value |")?;
            writeln!(output, "|--------|-------|")?;
            writeln!(output, "| Rows Read | {} |", stats.rows_read)?;
            writeln!(output, "| Rows Dropped | {} |", stats.rows_dropped)?;
            writeln!(output, "| Transactions | {} |", stats.transactions)?;
            writeln!(output, "| Distinct Pairs | {} |", stats.distinct_pairs)?;
            writeln!(output, "| Rules Generated | {} |", stats.rules_generated)?;
            writeln!(output, "| Rules Retained | {} |", stats.rules_retained)?;
            writeln!(output)?;
        }

        if report.rules.is_empty() {
            writeln!(output, "_{NO_RULES_MESSAGE}_")?;
            return Ok(output);
        }

        writeln!(output, "| Rule | Support | Confidence | Lift |")?;
        writeln!(output, "|------|---------|------------|------|")?;
        let visible = config.visible_rules(&report.rules);
        for rule in visible {
            writeln!(
                output,
                "| {} | {:.2} | {:.2} | {:.2} |",
                rule.relation().replace('|', "\\|"),
                rule.support,
                rule.confidence,
                rule.lift
            )?;
        }

        if report.rules.len() > visible.len() {
            writeln!(output)?;
            writeln!(
                output,
                "> **Note:** {} additional rules not shown in this report.",
                report.rules.len() - visible.len()
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::RuleThresholds;

    fn rule(from: &str, to: &str, support: f64, confidence: f64, lift: f64) -> Rule {
        Rule {
            antecedent: from.into(),
            consequent: to.into(),
            support,
            confidence,
            lift,
        }
    }

    fn create_test_report() -> MiningReport {
        let mut report = MiningReport::new("losses", RuleThresholds::default());
        report.columns = vec!["descripcion".to_string(), "negocio".to_string()];
        report.stats.rows_read = 12;
        report.stats.rows_dropped = 2;
        report.stats.transactions = 10;
        report.stats.rules_generated = 6;
        report.stats.rules_retained = 2;
        report.rules = vec![
            rule("leche", "lacteos", 0.4, 1.0, 2.5),
            rule("pan", "panaderia", 2.0 / 3.0, 2.0 / 3.0, 1.0),
        ];
        report
    }

    #[test]
    fn test_formatter_config_presets() {
        let minimal = FormatterConfig::minimal();
        assert!(!minimal.include_summary);
        assert!(!minimal.use_colors);

        let ci = FormatterConfig::ci();
        assert_eq!(ci.max_rules, Some(50));
        assert!(!ci.use_colors);

        assert!(FormatterConfig::detailed().include_summary);
    }

    #[test]
    fn test_human_formatter_lines() {
        let output = HumanFormatter::new().format(&create_test_report()).unwrap();
        assert_eq!(
            output,
            "Filtered association rules:\n\n\
             leche -> lacteos: Support=0.40, Confidence=1.00, Lift=2.50\n\
             pan -> panaderia: Support=0.67, Confidence=0.67, Lift=1.00\n"
        );
    }

    #[test]
    fn test_human_formatter_empty_is_exact_message() {
        let mut report = create_test_report();
        report.rules.clear();
        let output = HumanFormatter::new().format(&report).unwrap();
        assert_eq!(output, format!("{NO_RULES_MESSAGE}\n"));
    }

    #[test]
    fn test_human_formatter_summary_and_colors() {
        let formatter = HumanFormatter::with_config(FormatterConfig::detailed());
        let output = formatter.format(&create_test_report()).unwrap();
        assert!(output.contains("Miner: losses"));
        assert!(output.contains("Rows: 12 read, 2 dropped"));
        assert!(output.contains("Rules: 2 of 6 retained"));
        assert!(output.contains("\x1b["));
    }

    #[test]
    fn test_human_formatter_max_rules() {
        let config = FormatterConfig::minimal().with_max_rules(Some(1));
        let output = HumanFormatter::new()
            .format_with_config(&create_test_report(), &config)
            .unwrap();
        assert!(output.contains("leche -> lacteos"));
        assert!(!output.contains("pan -> panaderia"));
        assert!(output.ends_with("... and 1 more rules not shown\n"));
        assert!(!output.contains("--"));
    }

    #[test]
    fn test_json_formatter() {
        let output = JsonFormatter::new().format(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["rules"].as_array().unwrap().len(), 2);
        assert_eq!(value["stats"]["transactions"], 10);
        assert_eq!(value["timestamp"], "");

        let compact = JsonFormatter::new().with_pretty(false);
        assert!(!compact.format(&create_test_report()).unwrap().contains('\n'));
    }

    #[test]
    fn test_markdown_formatter() {
        let formatter = MarkdownFormatter::with_config(FormatterConfig::minimal().with_summary(true));
        let output = formatter.format(&create_test_report()).unwrap();
        assert!(output.contains("## Association Rules: losses"));
        assert!(output.contains("| Transactions | 10 |"));
        assert!(output.contains("| leche -> lacteos | 0.40 | 1.00 | 2.50 |"));

        let mut report = create_test_report();
        report.rules.clear();
        let output = MarkdownFormatter::new().with_heading_level(1).format(&report).unwrap();
        assert!(output.starts_with("# Association Rules"));
        assert!(output.contains(NO_RULES_MESSAGE));
    }
}
