//! Identifier validation for selected columns and registered tables.
//!
//! Column names come straight from file headers, so they may contain spaces,
//! accents or punctuation. The loader resolves them as exact identifiers and
//! never splices them into SQL text. Table names are chosen by the caller and
//! must be plain identifiers.

use crate::error::{BasketError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_IDENTIFIER_LEN: usize = 128;

/// Identifier validation utilities.
pub struct SqlSecurity;

impl SqlSecurity {
    /// Validates a column name.
    ///
    /// Header names may contain spaces, accents or punctuation; only empty,
    /// oversized or control-character names are rejected.
    ///
    /// # Examples
    /// ```rust
    /// use term_basket::security::SqlSecurity;
    ///
    /// assert!(SqlSecurity::validate_column_name("Business Unit").is_ok());
    /// assert!(SqlSecurity::validate_column_name("").is_err());
    /// ```
    pub fn validate_column_name(identifier: &str) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(BasketError::SecurityError(
                "Column name cannot be empty or whitespace-only".to_string(),
            ));
        }

        if identifier.len() > MAX_IDENTIFIER_LEN {
            return Err(BasketError::SecurityError(format!(
                "Column name too long (max {MAX_IDENTIFIER_LEN} characters)"
            )));
        }

        if identifier.chars().any(char::is_control) {
            return Err(BasketError::SecurityError(
                "Column name cannot contain control characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates a table name used to register a data source.
    ///
    /// Table names must start with a letter or underscore and contain only
    /// letters, digits and underscores.
    pub fn validate_table_name(name: &str) -> Result<()> {
        static TABLE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::expect_used)]
            Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")
                .expect("Hard-coded regex pattern should be valid")
        });

        if name.len() > MAX_IDENTIFIER_LEN || !TABLE_NAME_REGEX.is_match(name) {
            return Err(BasketError::SecurityError(format!(
                "Invalid table name: '{name}'. Table names must start with a letter or underscore and contain only letters, numbers, and underscores"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_header_style_column_names() {
        assert!(SqlSecurity::validate_column_name("descripcion").is_ok());
        assert!(SqlSecurity::validate_column_name("unit \"a\"").is_ok());
        assert!(SqlSecurity::validate_column_name("línea de negocio").is_ok());
    }

    #[test]
    fn test_reject_invalid_column_names() {
        assert!(SqlSecurity::validate_column_name("").is_err());
        assert!(SqlSecurity::validate_column_name("   ").is_err());
        assert!(SqlSecurity::validate_column_name("col\0umn").is_err());
        assert!(SqlSecurity::validate_column_name("col\numn").is_err());
        assert!(SqlSecurity::validate_column_name(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_table_names() {
        assert!(SqlSecurity::validate_table_name("data").is_ok());
        assert!(SqlSecurity::validate_table_name("_losses_2024").is_ok());
        assert!(SqlSecurity::validate_table_name("1data").is_err());
        assert!(SqlSecurity::validate_table_name("data; DROP TABLE x").is_err());
        assert!(SqlSecurity::validate_table_name("").is_err());
    }
}
