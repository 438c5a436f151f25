//! Diagnostic types for validation error reporting.
//!
//! Request-shape validation yields an ordered list of field-level failures.
//! Each failure names where the offending value came from and which field it
//! was, mirroring the structure clients use to highlight form fields.

use serde::Serialize;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Where the value came from: `"body"` or `"params"`.
    pub location: String,
    /// Dotted path of the offending field (e.g.
    /// `"problem_metadata.difficulty"`).
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationFailure {
    /// A missing-or-invalid failure for `field` at `location`.
    pub fn invalid(location: &str, field: &str) -> Self {
        ValidationFailure {
            location: location.to_string(),
            field: field.to_string(),
            message: format!("Invalid or missing '{}'", field),
        }
    }
}
