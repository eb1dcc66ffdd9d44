//! Prelude for commonly used types and traits in term-basket.

pub use crate::core::{MiningReport, RuleMiner};
pub use crate::error::{BasketError, ErrorContext, Result};
pub use crate::formatters::{FormatterConfig, RuleFormatter};
pub use crate::logging::LogConfig;
pub use crate::mining::{Rule, RuleThresholds};
