//! Error types for listing intake and request validation

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while reading listings, requests, or criteria from disk
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Underlying file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source parsed cleanly but held no property rows
    #[error("no property rows found in {0}")]
    Empty(String),
}

/// Funding source string outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown funding source: {0}")]
pub struct UnknownFundingSource(pub String);

/// A single rejected request field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Request rejected before it reaches the analysis engine
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid analysis request: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
