//! JSON-LD serializer for EARL reports.
//!
//! Produces the report document with `@type`, `@context` and the compact
//! `earl:`/`dct:` keys resolved by the context document.

use serde_json::Value;

use crate::error::ReportError;
use crate::model::Report;

/// Serializes a report to a JSON-LD `Value`.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if a nested value cannot be represented as
/// JSON.
pub fn to_json_ld(report: &Report) -> Result<Value, ReportError> {
    Ok(serde_json::to_value(report)?)
}

/// Serializes a report to pretty-printed JSON-LD text.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if a nested value cannot be represented as
/// JSON.
pub fn to_string_pretty(report: &Report) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
