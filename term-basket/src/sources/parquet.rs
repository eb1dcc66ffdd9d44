//! Parquet file source implementation.

use super::{ensure_paths_exist, listing_extension, DataSource};
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::datasource::file_format::parquet::ParquetFormat;
use datafusion::datasource::listing::{
    ListingOptions, ListingTable, ListingTableConfig, ListingTableUrl,
};
use datafusion::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Options for configuring Parquet file reading.
#[derive(Debug, Clone)]
pub struct ParquetOptions {
    /// Whether to use pruning based on Parquet statistics
    pub enable_pruning: bool,
}

impl Default for ParquetOptions {
    fn default() -> Self {
        Self {
            enable_pruning: true,
        }
    }
}

/// A Parquet file data source.
///
/// ```rust,no_run
/// use term_basket::sources::ParquetSource;
///
/// # async fn example() -> term_basket::prelude::Result<()> {
/// let source = ParquetSource::from_glob("data/losses/*.parquet").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ParquetSource {
    paths: Vec<String>,
    options: ParquetOptions,
}

impl ParquetSource {
    /// Creates a new Parquet source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options: ParquetOptions::default(),
        })
    }

    /// Creates a Parquet source from multiple file paths.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        if paths.is_empty() {
            return Err(BasketError::Configuration(
                "At least one path must be provided".to_string(),
            ));
        }
        Ok(Self {
            paths,
            options: ParquetOptions::default(),
        })
    }

    /// Creates a Parquet source from a glob pattern.
    pub async fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        let patterns = vec![pattern.into()];
        let paths = super::expand_globs(&patterns).await?;
        Self::from_paths(paths)
    }

    /// Sets custom options for this Parquet source.
    pub fn with_custom_options(mut self, options: ParquetOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl DataSource for ParquetSource {
    #[instrument(skip(self, ctx), fields(
        table.name = %table_name,
        source.type = "parquet",
        source.files = self.paths.len()
    ))]
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        ensure_paths_exist("Parquet", &self.paths).await?;

        if self.paths.len() == 1 {
            let options = ParquetReadOptions::default().parquet_pruning(self.options.enable_pruning);
            ctx.register_parquet(table_name, &self.paths[0], options)
                .await?;
        } else {
            let table_paths = self
                .paths
                .iter()
                .map(ListingTableUrl::parse)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let format = ParquetFormat::default().with_enable_pruning(self.options.enable_pruning);
            let listing_options = ListingOptions::new(Arc::new(format))
                .with_file_extension(listing_extension(&self.paths[0], ".parquet"));

            let config = ListingTableConfig::new_with_multi_paths(table_paths)
                .with_listing_options(listing_options)
                .infer_schema(&ctx.state())
                .await?;

            let table = ListingTable::try_new(config)?;
            ctx.register_table(table_name, Arc::new(table))?;
        }

        debug!(
            table.name = %table_name,
            source.type = "parquet",
            "Parquet data source registered successfully"
        );

        Ok(())
    }

    fn description(&self) -> String {
        if self.paths.len() == 1 {
            let path = &self.paths[0];
            format!("Parquet file: {path}")
        } else {
            let count = self.paths.len();
            format!("Parquet files: {count} files")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parquet_source_creation() {
        let source = ParquetSource::new("losses.parquet").unwrap();
        assert_eq!(source.description(), "Parquet file: losses.parquet");
        assert!(source.options.enable_pruning);
    }

    #[test]
    fn test_parquet_source_from_paths() {
        assert!(ParquetSource::from_paths(vec![]).is_err());
        let source =
            ParquetSource::from_paths(vec!["a.parquet".to_string(), "b.parquet".to_string()])
                .unwrap();
        assert!(source.description().contains("2 files"));
    }

    #[tokio::test]
    async fn test_parquet_roundtrip_through_datafusion() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = SessionContext::new();
        let df = ctx
            .sql("SELECT * FROM (VALUES ('leche', 'lacteos'), ('pan', 'panaderia')) AS t(descripcion, negocio)")
            .await
            .unwrap();
        let path = dir.path().join("losses.parquet");
        let path = path.to_str().unwrap();
        df.write_parquet(
            path,
            datafusion::dataframe::DataFrameWriteOptions::new().with_single_file_output(true),
            None,
        )
        .await
        .unwrap();

        let source = ParquetSource::new(path).unwrap();
        let read_ctx = SessionContext::new();
        source.register(&read_ctx, "data").await.unwrap();
        let batches = read_ctx
            .table("data")
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);
    }
}
