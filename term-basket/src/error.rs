//! Error types for the Term basket analysis library.
//!
//! All fallible operations in the crate return [`BasketError`] through the
//! [`Result`] alias. Errors raised before metric computation are fatal to a
//! mining run; nothing is recovered mid-pipeline.

use thiserror::Error;

/// The main error type for rule mining.
#[derive(Error, Debug)]
pub enum BasketError {
    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV", "Parquet")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A selected column is missing from the loaded table.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// No transactions remained after dropping incomplete rows.
    #[error("No transactions to analyze: every row was empty or had missing values")]
    EmptyInput,

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error while writing formatted output.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, BasketError>`.
pub type Result<T> = std::result::Result<T, BasketError>;

impl BasketError {
    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns true when the error means the input could not be read or did
    /// not have the expected shape.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DataSource { .. }
                | Self::ColumnNotFound { .. }
                | Self::Io(_)
                | Self::DataFusion(_)
                | Self::Arrow(_)
        )
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<BasketError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            BasketError::Internal(inner) => BasketError::Internal(format!("{}: {}", f(), inner)),
            other => BasketError::Internal(format!("{}: {}", f(), other)),
        })
    }
}
