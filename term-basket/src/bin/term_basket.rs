//! Term Basket CLI
//!
//! Mines pairwise association rules from a CSV or Parquet file and prints
//! the rules that meet the thresholds.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::IsTerminal;
use term_basket::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, MarkdownFormatter, RuleFormatter,
};
use term_basket::loader::DEFAULT_COLUMNS;
use term_basket::logging::setup::{init_logging, LoggingConfig};
use term_basket::prelude::{RuleMiner, RuleThresholds};
use term_basket::sources::{source_for_path, CsvOptions, ExcelOptions, SourceOptions};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per rule
    Human,
    /// Structured JSON report
    Json,
    /// Markdown table
    Markdown,
}

#[derive(Parser, Debug)]
#[command(name = "term-basket", author, version, about, long_about = None)]
struct Args {
    /// Input file (CSV, TSV, Parquet or an Excel workbook)
    path: String,

    /// Columns whose values form each transaction
    #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_COLUMNS.map(String::from))]
    columns: Vec<String>,

    /// Minimum support
    #[arg(long, default_value_t = 0.1)]
    min_support: f64,

    /// Minimum confidence
    #[arg(long, default_value_t = 0.6)]
    min_confidence: f64,

    /// Minimum lift
    #[arg(long, default_value_t = 1.2)]
    min_lift: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Field delimiter for delimited text input
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// The input has no header row
    #[arg(long)]
    no_header: bool,

    /// Worksheet to read from a workbook (defaults to the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Maximum number of rules to print
    #[arg(long)]
    max_rules: Option<usize>,

    /// Print a run summary before the rules
    #[arg(long)]
    summary: bool,

    /// Log level for term_basket (trace, debug, info, warn, error)
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn thresholds(&self) -> RuleThresholds {
        RuleThresholds::default()
            .with_min_support(self.min_support)
            .with_min_confidence(self.min_confidence)
            .with_min_lift(self.min_lift)
    }

    fn csv_options(&self) -> Result<CsvOptions> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }
        Ok(CsvOptions {
            has_header: !self.no_header,
            delimiter: self.delimiter as u8,
            ..Default::default()
        })
    }

    fn source_options(&self) -> Result<SourceOptions> {
        Ok(SourceOptions {
            csv: self.csv_options()?,
            excel: ExcelOptions {
                sheet: self.sheet.clone(),
                has_header: !self.no_header,
            },
        })
    }

    fn formatter_config(&self) -> FormatterConfig {
        FormatterConfig::minimal()
            .with_summary(self.summary)
            .with_max_rules(self.max_rules)
            .with_colors(self.format == OutputFormat::Human && std::io::stdout().is_terminal())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig::default()
        .with_basket_level(args.log_level)
        .with_json_format(args.json_logs);
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let miner = RuleMiner::builder("term-basket")
        .description(format!("Association rules for {}", args.path))
        .columns(args.columns.iter().cloned())
        .thresholds(args.thresholds())
        .build()
        .context("Invalid mining configuration")?;

    let source = source_for_path(&args.path, args.source_options()?)?;
    let report = miner
        .run_source(source.as_ref())
        .await
        .with_context(|| format!("Failed to mine rules from {}", args.path))?;

    let config = args.formatter_config();
    let output = match args.format {
        OutputFormat::Human => HumanFormatter::new().format_with_config(&report, &config)?,
        OutputFormat::Json => JsonFormatter::new().format_with_config(&report, &config)?,
        OutputFormat::Markdown => MarkdownFormatter::new().format_with_config(&report, &config)?,
    };
    print!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arguments() {
        let args = Args::try_parse_from(["term-basket", "losses.csv"]).unwrap();
        assert_eq!(args.columns, DEFAULT_COLUMNS.map(String::from).to_vec());
        assert_eq!(args.thresholds(), RuleThresholds::default());
        assert_eq!(args.format, OutputFormat::Human);
        assert_eq!(args.log_level, Level::WARN);
        assert!(args.csv_options().unwrap().has_header);
    }

    #[test]
    fn test_flags_map_onto_options() {
        let args = Args::try_parse_from([
            "term-basket",
            "losses.txt",
            "--columns",
            "descripcion,negocio",
            "--min-lift",
            "2.5",
            "--delimiter",
            ";",
            "--no-header",
            "--format",
            "json",
            "--sheet",
            "Enero",
        ])
        .unwrap();
        assert_eq!(args.columns, vec!["descripcion", "negocio"]);
        assert_eq!(args.thresholds().min_lift, 2.5);
        assert_eq!(args.format, OutputFormat::Json);

        let options = args.source_options().unwrap();
        assert_eq!(options.csv.delimiter, b';');
        assert!(!options.csv.has_header);
        assert_eq!(options.excel.sheet.as_deref(), Some("Enero"));
        assert!(!options.excel.has_header);
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let args = Args::try_parse_from(["term-basket", "losses.csv", "--delimiter", "ñ"]).unwrap();
        let err = args.csv_options().unwrap_err();
        assert!(err.to_string().contains("ASCII"));
    }

    #[test]
    fn test_invalid_configuration_has_context() {
        let err = RuleMiner::builder("cli")
            .columns(Vec::<String>::new())
            .build()
            .context("Invalid mining configuration")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid mining configuration"));
    }
}
