//! Centralized error handling for autoeda.
//!
//! ## Custom Error Type
//!
//! [`EdaError`] enumerates the failure categories a caller may want to react
//! to. The one the preprocessing core raises deliberately is
//! [`EdaError::ColumnNotFound`]: every transform resolves its column list
//! before touching data, so a caller that sees it knows nothing was applied.
//!
//! ```
//! use autoeda::error::EdaError;
//!
//! fn describe(err: &EdaError) -> &'static str {
//!     match err {
//!         EdaError::ColumnNotFound(_) => "pick another column",
//!         EdaError::InvalidPath(_) => "check the file",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```
//!
//! ## Working with `anyhow`
//!
//! The analysis functions return `anyhow::Result` so polars errors can be
//! wrapped with `.context(...)`. Typed errors stay at the root of the chain
//! and can be recovered with `downcast_ref`:
//!
//! ```no_run
//! use autoeda::analyser::logic::remove_columns;
//! use autoeda::error::EdaError;
//! use polars::prelude::*;
//!
//! # fn example(df: DataFrame) {
//! let err = remove_columns(&df, &["missing".to_owned()]).unwrap_err();
//! assert!(matches!(
//!     err.downcast_ref::<EdaError>(),
//!     Some(EdaError::ColumnNotFound(_))
//! ));
//! # }
//! ```

use std::fmt;

/// Main error type for autoeda operations.
#[derive(Debug)]
pub enum EdaError {
    /// A transform named a column the table does not have
    ColumnNotFound(String),

    /// Pipeline spec could not be validated or executed
    Pipeline(String),

    /// File not found or invalid path
    InvalidPath(String),
}

impl fmt::Display for EdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "Column not found: '{name}'"),
            Self::Pipeline(msg) => write!(f, "Pipeline error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
        }
    }
}

impl std::error::Error for EdaError {}

impl EdaError {
    /// True when this error (or the root of an `anyhow` chain) is a missing column.
    pub fn is_column_not_found(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<Self>(), Some(Self::ColumnNotFound(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EdaError::ColumnNotFound("price".to_owned());
        assert_eq!(err.to_string(), "Column not found: 'price'");
    }

    #[test]
    fn test_variant_survives_anyhow_context() {
        let err = anyhow::Error::from(EdaError::ColumnNotFound("age".to_owned()))
            .context("Failed to fill missing values");
        assert!(EdaError::is_column_not_found(&err));
        assert!(matches!(
            err.root_cause().downcast_ref::<EdaError>(),
            Some(EdaError::ColumnNotFound(name)) if name == "age"
        ));
    }

    #[test]
    fn test_other_errors_are_not_column_errors() {
        let err = anyhow::Error::from(EdaError::Pipeline("bad step".to_owned()));
        assert!(!EdaError::is_column_not_found(&err));
        assert_eq!(err.to_string(), "Pipeline error: bad step");
    }
}
