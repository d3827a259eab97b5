//! Feature Assembler - Raw inputs to encoded FeatureRow
//!
//! Builds the one-row feature vector the classifier consumes. Assembly walks
//! the schema layout, never the raw-input map, so the positional order of the
//! output is fixed regardless of how the caller's map iterates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::encoders::EncoderSet;
use crate::error::PredictError;
use crate::schema::{ColumnKind, FeatureRow, FEATURE_COUNT, SCHEMA};

// ============================================================================
// RAW INPUT VALUES
// ============================================================================

/// One raw user-supplied value, before encoding.
///
/// Untagged so a form payload like `{"City": "Chicago", "Speed": 40,
/// "Is Peak Hour": true}` deserializes directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Column name -> raw value, as submitted by the form
pub type RawInputs = HashMap<String, RawValue>;

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Assemble one encoded FeatureRow from raw inputs.
///
/// For each schema column, in schema order:
/// - categorical: label-encoded through the column's fitted encoder
/// - numeric: passed through
/// - boolean: canonical "False"/"True"; encoded through the column's
///   encoder when the artifact carries one, literal 0/1 otherwise
///   (both give False = 0, True = 1)
///
/// Fails with `MissingField` when a column has no raw value, `UnseenLabel`
/// when a categorical value is outside the fitted vocabulary, and
/// `SchemaMismatch` when a value has the wrong type for its column.
pub fn assemble(encoders: &EncoderSet, raw: &RawInputs) -> Result<FeatureRow, PredictError> {
    let mut values = [0.0f32; FEATURE_COUNT];

    for (i, col) in SCHEMA.iter().enumerate() {
        let value = raw
            .get(col.name)
            .ok_or(PredictError::MissingField { column: col.name })?;

        values[i] = match col.kind {
            ColumnKind::Categorical => {
                let label = match value {
                    RawValue::Text(s) => s.as_str(),
                    other => {
                        return Err(PredictError::SchemaMismatch(format!(
                            "column '{}' expects a categorical string, got {:?}",
                            col.name, other
                        )))
                    }
                };
                encoders.get(col.name)?.encode(label)? as f32
            }

            ColumnKind::Numeric => match value {
                RawValue::Number(n) => *n as f32,
                other => {
                    return Err(PredictError::SchemaMismatch(format!(
                        "column '{}' expects a numeric value, got {:?}",
                        col.name, other
                    )))
                }
            },

            ColumnKind::Boolean => {
                let canonical = match value {
                    RawValue::Bool(true) => "True",
                    RawValue::Bool(false) => "False",
                    RawValue::Text(s) if s == "True" || s == "False" => s.as_str(),
                    other => {
                        return Err(PredictError::SchemaMismatch(format!(
                            "column '{}' expects a boolean, got {:?}",
                            col.name, other
                        )))
                    }
                };

                // Some encoder exports label-encode the boolean columns,
                // some leave them out; both conventions map False -> 0,
                // True -> 1.
                if encoders.contains(col.name) {
                    encoders.get(col.name)?.encode(canonical)? as f32
                } else if canonical == "True" {
                    1.0
                } else {
                    0.0
                }
            }
        };
    }

    let row = FeatureRow::from_values(values);
    log::debug!("Assembled feature row: {}", row.to_log_entry());

    Ok(row)
}

// ============================================================================
// TESTS
// ============================================================================
