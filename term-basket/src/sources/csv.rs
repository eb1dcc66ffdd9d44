//! CSV file source implementation.

use super::{ensure_paths_exist, listing_extension, DataSource};
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::arrow::datatypes::Schema;
use datafusion::datasource::file_format::csv::CsvFormat;
use datafusion::datasource::listing::{
    ListingOptions, ListingTable, ListingTableConfig, ListingTableUrl,
};
use datafusion::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Escape character (default: None)
    pub escape: Option<u8>,
    /// Comment prefix (lines starting with this are ignored)
    pub comment: Option<u8>,
    /// Schema to use (if None, will be inferred)
    pub schema: Option<Arc<Schema>>,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            escape: None,
            comment: None,
            schema: None,
            schema_infer_max_records: 1000,
        }
    }
}

impl CsvOptions {
    fn format(&self) -> CsvFormat {
        CsvFormat::default()
            .with_has_header(self.has_header)
            .with_delimiter(self.delimiter)
            .with_quote(self.quote)
            .with_escape(self.escape)
            .with_comment(self.comment)
            .with_schema_infer_max_rec(self.schema_infer_max_records)
    }
}

/// A CSV file data source.
///
/// # Examples
///
/// ```rust,no_run
/// use term_basket::sources::{CsvOptions, CsvSource};
///
/// # async fn example() -> term_basket::prelude::Result<()> {
/// let source = CsvSource::new("data/losses.csv")?;
///
/// let options = CsvOptions {
///     delimiter: b';',
///     ..Default::default()
/// };
/// let source = CsvSource::with_options("data/losses.txt", options)?;
///
/// let source = CsvSource::from_glob("data/2024-*.csv").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: Vec<String>,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a new CSV source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a new CSV source with custom options.
    pub fn with_options(path: impl Into<String>, options: CsvOptions) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options,
        })
    }

    /// Creates a CSV source from multiple file paths.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        if paths.is_empty() {
            return Err(BasketError::Configuration(
                "At least one path must be provided".to_string(),
            ));
        }
        Ok(Self {
            paths,
            options: CsvOptions::default(),
        })
    }

    /// Creates a CSV source from a glob pattern.
    pub async fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        let patterns = vec![pattern.into()];
        let paths = super::expand_globs(&patterns).await?;
        Self::from_paths(paths)
    }

    /// Sets custom options for this CSV source.
    pub fn with_custom_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the file paths read by this source.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Returns the reading options.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    async fn register_listing_table(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        let table_paths = self
            .paths
            .iter()
            .map(ListingTableUrl::parse)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let extension = listing_extension(&self.paths[0], ".csv");
        let listing_options =
            ListingOptions::new(Arc::new(self.options.format())).with_file_extension(extension);

        let config = ListingTableConfig::new_with_multi_paths(table_paths)
            .with_listing_options(listing_options);
        let config = if let Some(schema) = &self.options.schema {
            config.with_schema(schema.clone())
        } else {
            config.infer_schema(&ctx.state()).await?
        };

        let table = ListingTable::try_new(config)?;
        ctx.register_table(table_name, Arc::new(table))?;
        Ok(())
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self, ctx), fields(
        table.name = %table_name,
        source.type = "csv",
        source.files = self.paths.len(),
        csv.delimiter = %self.options.delimiter as char,
        csv.has_header = self.options.has_header
    ))]
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        info!(
            table.name = %table_name,
            source.type = "csv",
            source.paths = ?self.paths,
            "Registering CSV data source"
        );

        ensure_paths_exist("CSV", &self.paths).await?;

        if self.paths.len() == 1 && self.paths[0].ends_with(".csv") {
            let options = &self.options;
            let mut csv_options = CsvReadOptions::new()
                .has_header(options.has_header)
                .delimiter(options.delimiter)
                .quote(options.quote)
                .schema_infer_max_records(options.schema_infer_max_records);

            if let Some(escape) = options.escape {
                csv_options = csv_options.escape(escape);
            }
            if let Some(comment) = options.comment {
                csv_options = csv_options.comment(comment);
            }
            if let Some(schema) = &options.schema {
                csv_options = csv_options.schema(schema);
            }

            ctx.register_csv(table_name, &self.paths[0], csv_options)
                .await?;
        } else {
            // .tsv/.txt files and multi-file sets go through a listing table
            self.register_listing_table(ctx, table_name).await?;
        }

        debug!(
            table.name = %table_name,
            source.type = "csv",
            source.files = self.paths.len(),
            "CSV data source registered successfully"
        );

        Ok(())
    }

    fn description(&self) -> String {
        if self.paths.len() == 1 {
            let path = &self.paths[0];
            format!("CSV file: {path}")
        } else {
            let count = self.paths.len();
            format!("CSV files: {count} files")
        }
    }
}
