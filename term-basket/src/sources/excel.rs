//! Excel workbook source implementation.
//!
//! The workbook is read eagerly with `calamine` and registered as an
//! in-memory table. Every column is exposed as nullable Utf8; empty and
//! error cells become NULL.

use super::{ensure_paths_exist, DataSource};
use crate::prelude::*;
use arrow::array::{ArrayRef, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// File extensions read as spreadsheets.
pub const EXCEL_EXTENSIONS: [&str; 5] = [".xlsx", ".xlsm", ".xlsb", ".xls", ".ods"];

/// Options for reading a workbook.
#[derive(Debug, Clone)]
pub struct ExcelOptions {
    /// Sheet to read (the first sheet when `None`)
    pub sheet: Option<String>,
    /// Whether the first row holds column names
    pub has_header: bool,
}

impl Default for ExcelOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            has_header: true,
        }
    }
}

/// A spreadsheet data source.
///
/// ```rust,no_run
/// use term_basket::sources::{ExcelOptions, ExcelSource};
///
/// let source = ExcelSource::new("mermas.xlsx");
/// let source = ExcelSource::with_options(
///     "mermas.xlsx",
///     ExcelOptions {
///         sheet: Some("2024".to_string()),
///         ..Default::default()
///     },
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ExcelSource {
    path: String,
    options: ExcelOptions,
}

impl ExcelSource {
    /// Creates a source reading the first sheet of `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_options(path, ExcelOptions::default())
    }

    /// Creates a source with custom options.
    pub fn with_options(path: impl Into<String>, options: ExcelOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Returns the workbook path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the reading options.
    pub fn options(&self) -> &ExcelOptions {
        &self.options
    }

    /// True when `path` has a spreadsheet extension.
    pub fn handles(path: &str) -> bool {
        let lower = path.to_lowercase();
        EXCEL_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }
}

fn read_sheet(path: &str, options: &ExcelOptions) -> Result<(String, RecordBatch)> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        BasketError::data_source("Excel", format!("Cannot open workbook {path}: {e}"))
    })?;

    let sheet = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| BasketError::data_source("Excel", format!("Workbook {path} has no sheets")))?,
    };
    let range = workbook.worksheet_range(&sheet).map_err(|e| {
        BasketError::data_source("Excel", format!("Cannot read sheet '{sheet}' of {path}: {e}"))
    })?;

    let batch = range_to_batch(&range, options.has_header)?;
    Ok((sheet, batch))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Converts a sheet range into a single all-Utf8 batch.
fn range_to_batch(range: &Range<Data>, has_header: bool) -> Result<RecordBatch> {
    let width = range.width();
    if width == 0 {
        return Err(BasketError::data_source("Excel", "Sheet is empty"));
    }

    let mut rows = range.rows();
    let names: Vec<String> = if has_header {
        let header = rows
            .next()
            .ok_or_else(|| BasketError::data_source("Excel", "Sheet is empty"))?;
        header
            .iter()
            .enumerate()
            .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("column_{}", i + 1)))
            .collect()
    } else {
        (1..=width).map(|i| format!("column_{i}")).collect()
    };

    let mut builders: Vec<StringBuilder> = (0..width).map(|_| StringBuilder::new()).collect();
    for row in rows {
        for (builder, cell) in builders.iter_mut().zip(row) {
            builder.append_option(cell_text(cell));
        }
    }

    let schema = Schema::new(
        names
            .into_iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );
    let columns: Vec<ArrayRef> = builders
        .iter_mut()
        .map(|b| Arc::new(b.finish()) as ArrayRef)
        .collect();
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

#[async_trait]
impl DataSource for ExcelSource {
    #[instrument(skip(self, ctx), fields(
        table.name = %table_name,
        source.type = "excel",
        excel.sheet = ?self.options.sheet
    ))]
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        info!(
            table.name = %table_name,
            source.type = "excel",
            source.path = %self.path,
            "Registering Excel data source"
        );

        ensure_paths_exist("Excel", std::slice::from_ref(&self.path)).await?;

        let path = self.path.clone();
        let options = self.options.clone();
        let (sheet, batch) = tokio::task::spawn_blocking(move || read_sheet(&path, &options))
            .await
            .map_err(|e| BasketError::Internal(format!("Workbook reader task failed: {e}")))??;

        let rows = batch.num_rows();
        let table = MemTable::try_new(batch.schema(), vec![vec![batch]])?;
        ctx.register_table(table_name, Arc::new(table))?;

        debug!(
            table.name = %table_name,
            source.type = "excel",
            excel.sheet = %sheet,
            rows = rows,
            "Excel data source registered successfully"
        );

        Ok(())
    }

    fn description(&self) -> String {
        match &self.options.sheet {
            Some(sheet) => format!("Excel file: {} (sheet '{sheet}')", self.path),
            None => format!("Excel file: {}", self.path),
        }
    }
}
