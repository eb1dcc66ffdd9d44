//! Loading typed records from a registered table.
//!
//! The loader selects a fixed list of columns, drops every row with a missing
//! value in any of them, and canonicalizes the remaining values to strings.

use crate::logging::LogConfig;
use crate::mining::Item;
use crate::prelude::*;
use crate::security::SqlSecurity;
use crate::log_data_op;
use arrow::array::{Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use datafusion::prelude::{ident, Expr, SessionContext};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Columns of the store loss dataset the analysis was designed around.
pub const DEFAULT_COLUMNS: [&str; 4] = ["descripcion", "negocio", "mes", "linea"];

/// The ordered list of columns every [`Record`] carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    columns: Arc<[String]>,
}

impl RecordSchema {
    /// Creates a schema from column names.
    ///
    /// The list must be non-empty and free of duplicates, and every name must
    /// be a usable column identifier.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(BasketError::Configuration(
                "At least one column must be selected".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            SqlSecurity::validate_column_name(column)?;
            if !seen.insert(column.as_str()) {
                return Err(BasketError::Configuration(format!(
                    "Column '{column}' is selected more than once"
                )));
            }
        }

        Ok(Self {
            columns: columns.into(),
        })
    }

    /// Returns the selected column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of selected columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; a schema has at least one column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One complete input row restricted to the selected columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: RecordSchema,
    values: Vec<Item>,
}

impl Record {
    /// Creates a record, checking that there is one value per column.
    pub fn new(schema: &RecordSchema, values: Vec<Item>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(BasketError::Internal(format!(
                "Record has {} values but the schema has {} columns",
                values.len(),
                schema.len()
            )));
        }
        Ok(Self {
            schema: schema.clone(),
            values,
        })
    }

    /// Returns the value of `column`, if it is part of the schema.
    pub fn get(&self, column: &str) -> Option<&Item> {
        self.schema
            .columns()
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Returns the values in column order.
    pub fn values(&self) -> &[Item] {
        &self.values
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Records produced by a load along with row accounting.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    /// Complete rows, in table order
    pub records: Vec<Record>,
    /// Rows present in the table
    pub rows_read: usize,
    /// Rows discarded because a selected column was missing or empty
    pub rows_dropped: usize,
}

/// Reads [`Record`]s for a [`RecordSchema`] out of a registered table.
#[derive(Debug, Clone, Default)]
pub struct RecordLoader {
    schema: RecordSchema,
    log_config: LogConfig,
}

impl RecordLoader {
    /// Creates a loader for the given schema.
    pub fn new(schema: RecordSchema) -> Self {
        Self {
            schema,
            log_config: LogConfig::default(),
        }
    }

    /// Sets the logging configuration.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Returns the schema this loader produces.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Loads complete records from `table_name`.
    ///
    /// A row is dropped when any selected value is NULL or the empty string.
    /// Whitespace-only values are kept.
    ///
    /// Fails with [`BasketError::ColumnNotFound`] if a selected column is
    /// missing from the table.
    #[instrument(skip(self, ctx), fields(table.name = %table_name, columns = self.schema.len()))]
    pub async fn load(&self, ctx: &SessionContext, table_name: &str) -> Result<LoadedRecords> {
        SqlSecurity::validate_table_name(table_name)?;

        let table = ctx.table(table_name).await?;
        {
            let table_schema = table.schema().inner();
            for column in self.schema.columns() {
                if table_schema.field_with_name(column).is_err() {
                    return Err(BasketError::ColumnNotFound {
                        column: column.clone(),
                    });
                }
            }
        }
        let rows_read = table.clone().count().await?;

        // Count and selection both run on the resolved table.
        let columns: Vec<Expr> = self.schema.columns().iter().map(ident).collect();
        let predicate = columns
            .iter()
            .map(|c| c.clone().is_not_null())
            .reduce(Expr::and)
            .ok_or_else(|| BasketError::Internal("Record schema has no columns".to_string()))?;
        debug!(predicate = %predicate, "Selecting complete rows");
        let batches = table.filter(predicate)?.select(columns)?.collect().await?;

        let mut records = Vec::new();
        for batch in &batches {
            self.collect_records(batch, &mut records)?;
        }
        let rows_dropped = rows_read.saturating_sub(records.len());

        log_data_op!(
            self.log_config,
            table.name = %table_name,
            rows.read = rows_read,
            rows.kept = records.len(),
            rows.dropped = rows_dropped,
            "Loaded records"
        );

        Ok(LoadedRecords {
            records,
            rows_read,
            rows_dropped,
        })
    }

    fn collect_records(&self, batch: &RecordBatch, records: &mut Vec<Record>) -> Result<()> {
        let columns = batch
            .columns()
            .iter()
            .map(|array| cast(array, &DataType::Utf8))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let strings = columns
            .iter()
            .map(|array| {
                array.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                    BasketError::Internal("Utf8 cast did not produce a string array".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;

        'rows: for row in 0..batch.num_rows() {
            let mut values = Vec::with_capacity(strings.len());
            for array in &strings {
                if array.is_null(row) {
                    continue 'rows;
                }
                let value = array.value(row);
                // Empty cells count as missing; whitespace is a value.
                if value.is_empty() {
                    continue 'rows;
                }
                values.push(Item::new(value));
            }
            records.push(Record::new(&self.schema, values)?);
        }

        Ok(())
    }
}
