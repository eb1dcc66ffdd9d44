//! # Term Basket - Association Rules for Categorical Records
//!
//! Term Basket mines pairwise association rules from tabular data. Each row
//! of the selected columns becomes a transaction (the set of its distinct
//! values), every co-occurring pair of values is counted, and each pair
//! yields two directional rules scored by support, confidence and lift.
//! Rules below configurable thresholds are dropped.
//!
//! Data is read through DataFusion, so any CSV, Parquet or Excel file (or a table
//! you register yourself) can be mined.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use term_basket::prelude::*;
//! use term_basket::formatters::HumanFormatter;
//! use term_basket::sources::CsvSource;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let miner = RuleMiner::builder("store_losses")
//!     .columns(["descripcion", "negocio", "mes", "linea"])
//!     .thresholds(RuleThresholds::default())
//!     .build()?;
//!
//! let source = CsvSource::new("data/losses.csv")?;
//! let report = miner.run_source(&source).await?;
//!
//! print!("{}", HumanFormatter::new().format(&report)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//!
//! For a pair `{A, B}` observed in `N` transactions:
//!
//! - **Support** `count(A,B) / N`
//! - **Confidence** of `A -> B`: `count(A,B) / count(A)`
//! - **Lift** of `A -> B`: `confidence / (count(B) / N)`
//!
//! A rule is kept when all three meet their minimums (inclusive). The
//! defaults are support 0.1, confidence 0.6 and lift 1.2.
//!
//! ## Architecture
//!
//! - **`sources`**: CSV, Parquet and Excel connectors registered as DataFusion tables
//! - **`loader`**: Reads the selected columns and drops incomplete rows
//! - **`mining`**: Transactions, frequency counting, metrics and filtering
//! - **`core`**: `RuleMiner` and its `MiningReport`
//! - **`formatters`**: Human, JSON and Markdown report output
//! - **`logging`**: Structured logging configuration

pub mod core;
pub mod error;
pub mod formatters;
pub mod loader;
pub mod logging;
pub mod mining;
pub mod prelude;
pub mod security;
pub mod sources;
