//! Data source connectors for rule mining.
//!
//! Each source registers itself as a DataFusion table; the
//! [`loader`](crate::loader) then reads the selected columns from that table.

use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::SessionContext;
use std::fmt::Debug;

mod csv;
mod excel;
mod parquet;

pub use csv::{CsvOptions, CsvSource};
pub use excel::{ExcelOptions, ExcelSource, EXCEL_EXTENSIONS};
pub use parquet::{ParquetOptions, ParquetSource};

/// A data source that can be registered with a DataFusion context.
///
/// # Examples
///
/// ```rust,no_run
/// use datafusion::prelude::SessionContext;
/// use term_basket::sources::{CsvSource, DataSource};
///
/// # async fn example() -> term_basket::prelude::Result<()> {
/// let source = CsvSource::new("data/losses.csv")?;
/// let ctx = SessionContext::new();
/// source.register(&ctx, "data").await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Registers this data source with the given session context under
    /// `table_name`.
    ///
    /// Missing local files are reported as [`BasketError::DataSource`]
    /// before anything is registered.
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()>;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}

/// Reading options for every file-backed source.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Options for delimited text files
    pub csv: CsvOptions,
    /// Options for spreadsheets
    pub excel: ExcelOptions,
}

/// Picks a data source from the file extension: `.parquet` files become a
/// [`ParquetSource`], spreadsheets an [`ExcelSource`], and everything else is
/// read as delimited text.
pub fn source_for_path(path: &str, options: SourceOptions) -> Result<Box<dyn DataSource>> {
    if path.to_lowercase().ends_with(".parquet") {
        Ok(Box::new(ParquetSource::new(path)?))
    } else if ExcelSource::handles(path) {
        Ok(Box::new(ExcelSource::with_options(path, options.excel)))
    } else {
        Ok(Box::new(CsvSource::with_options(path, options.csv)?))
    }
}

/// Fails with a data source error naming the first path that does not exist.
pub(crate) async fn ensure_paths_exist(source_type: &str, paths: &[String]) -> Result<()> {
    for path in paths {
        let exists = tokio::fs::try_exists(path).await.map_err(|e| {
            BasketError::data_source_with_source(
                source_type,
                format!("Cannot access {path}"),
                Box::new(e),
            )
        })?;
        if !exists {
            return Err(BasketError::data_source(
                source_type,
                format!("File not found: {path}"),
            ));
        }
    }
    Ok(())
}

/// Utility function to expand glob patterns into file paths.
pub(crate) async fn expand_globs(patterns: &[String]) -> Result<Vec<String>> {
    use glob::glob;

    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob(pattern).map_err(|e| {
            BasketError::Configuration(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        for entry in matches {
            let path = entry.map_err(|e| BasketError::Io(std::io::Error::other(e)))?;

            if path.is_file() {
                if let Some(path_str) = path.to_str() {
                    paths.push(path_str.to_string());
                }
            }
        }
    }

    if paths.is_empty() {
        return Err(BasketError::data_source(
            "file",
            "No files found matching glob patterns",
        ));
    }

    paths.sort();
    Ok(paths)
}

/// Returns the file extension (with leading dot) used for listing tables.
pub(crate) fn listing_extension(path: &str, default: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| default.to_string())
}
