//! Error types for plan loading, assumption handling, and evaluation history
//!
//! Business outcomes of an evaluation (unsupported method, zero gross cost)
//! are never errors; they are encoded in the `EvaluationResult`. The types
//! here cover caller contract violations and I/O.

use thiserror::Error;

/// Errors raised while validating or loading plans
#[derive(Debug, Error)]
pub enum PlanError {
    /// A numeric plan field is outside its allowed range
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: f64,
        reason: &'static str,
    },

    /// An enumerated field carried a spelling we do not recognize
    #[error("Unknown {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanError {
    pub fn invalid(field: impl Into<String>, value: f64, reason: &'static str) -> Self {
        PlanError::InvalidValue {
            field: field.into(),
            value,
            reason,
        }
    }
}

/// Errors raised while resolving, loading, or validating assumptions
#[derive(Debug, Error)]
pub enum AssumptionError {
    /// No default table exists for the requested plan year
    #[error("No default assumptions for plan year {0}")]
    UnsupportedPlanYear(u16),

    /// Override file named a field the model does not have
    #[error("Unknown assumption field: {0}")]
    UnknownField(String),

    /// An assumption value is outside its allowed range
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: f64,
        reason: &'static str,
    },

    /// Override CSV does not start with a `field,value` header row
    #[error("Override file must start with a `field,value` header row")]
    MissingHeader,

    /// Override CSV row without both a field and a value
    #[error("Override row on line {line} needs a field and a value")]
    MalformedRow { line: u64 },

    #[error("Could not parse value for {field}: {source}")]
    Parse {
        field: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssumptionError {
    pub fn invalid(field: impl Into<String>, value: f64, reason: &'static str) -> Self {
        AssumptionError::InvalidValue {
            field: field.into(),
            value,
            reason,
        }
    }
}

/// Errors raised while reading or writing an evaluation history file
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
