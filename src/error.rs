//! Error types for the valuation engine and its input layer

use thiserror::Error;

/// Failure of a valuation run.
///
/// `Validation` is raised before any arithmetic runs; `Calculation` is raised
/// when an intermediate or final quantity is undefined or non-finite.
/// Both are deterministic for a given input, so neither is worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DcfError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("calculation failed for {quantity} (value {value}): {message}")]
    Calculation {
        quantity: &'static str,
        value: f64,
        message: String,
    },
}

impl DcfError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DcfError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn calculation(quantity: &'static str, value: f64, message: impl Into<String>) -> Self {
        DcfError::Calculation {
            quantity,
            value,
            message: message.into(),
        }
    }

    /// Name of the offending input field or computed quantity
    pub fn field(&self) -> &'static str {
        match self {
            DcfError::Validation { field, .. } => field,
            DcfError::Calculation { quantity, .. } => quantity,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DcfError::Validation { .. })
    }

    pub fn is_calculation(&self) -> bool {
        matches!(self, DcfError::Calculation { .. })
    }
}

/// Result alias for the core engine
pub type Result<T> = std::result::Result<T, DcfError>;

/// Errors raised while reading input bundles and rate tables from disk
#[derive(Error, Debug)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Format(String),

    #[error(transparent)]
    Dcf(#[from] DcfError),
}
