//! Category Encoder - Fitted label <-> code mapping
//!
//! One encoder per categorical column, built once from the training-side
//! artifact and immutable at inference time. Codes are positional in the
//! class list, matching how the encoders were fitted (classes sorted
//! lexicographically, so e.g. "False" = 0, "True" = 1).

use std::collections::HashMap;

use serde::Serialize;

use crate::error::PredictError;

// ============================================================================
// CATEGORY ENCODER
// ============================================================================

/// Bidirectional mapping between a fixed set of category strings and
/// integer codes.
///
/// Invariants: `decode(encode(s)) == s` for every known label `s`, and
/// `encode(decode(c)) == c` for every code `c < len()`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEncoder {
    /// Column this encoder was fitted for (the target encoder uses "target")
    column: String,
    /// Known labels; a label's code is its position in this list
    classes: Vec<String>,
    /// Reverse index over `classes`
    #[serde(skip)]
    index: HashMap<String, u32>,
}

impl CategoryEncoder {
    /// Build an encoder from its fitted class list.
    ///
    /// Rejects duplicate classes: a duplicate would make the reverse mapping
    /// ambiguous, which can only mean a corrupt artifact.
    pub fn from_classes(column: &str, classes: Vec<String>) -> Result<Self, PredictError> {
        let mut index = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if index.insert(label.clone(), code as u32).is_some() {
                return Err(PredictError::SchemaMismatch(format!(
                    "duplicate class '{}' in encoder for '{}'",
                    label, column
                )));
            }
        }

        Ok(Self {
            column: column.to_string(),
            classes,
            index,
        })
    }

    /// Column name this encoder belongs to
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Encode a label into its integer code
    pub fn encode(&self, label: &str) -> Result<u32, PredictError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| PredictError::UnseenLabel {
                column: self.column.clone(),
                value: label.to_string(),
            })
    }

    /// Decode an integer code back into its label
    pub fn decode(&self, code: u32) -> Result<&str, PredictError> {
        self.classes
            .get(code as usize)
            .map(|s| s.as_str())
            .ok_or_else(|| PredictError::CodeOutOfRange {
                column: self.column.clone(),
                code,
                limit: self.classes.len(),
            })
    }

    /// Known labels in code order (populates selection widgets)
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of known classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_encoder() -> CategoryEncoder {
        CategoryEncoder::from_classes(
            "Weather",
            vec!["Cloudy".into(), "Rainy".into(), "Snowy".into(), "Sunny".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_known_labels() {
        let enc = weather_encoder();
        assert_eq!(enc.encode("Cloudy").unwrap(), 0);
        assert_eq!(enc.encode("Sunny").unwrap(), 3);
    }

    #[test]
    fn test_encode_unseen_label() {
        let enc = weather_encoder();
        let err = enc.encode("Windy").unwrap_err();
        assert_eq!(
            err,
            PredictError::UnseenLabel {
                column: "Weather".to_string(),
                value: "Windy".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_out_of_range() {
        let enc = weather_encoder();
        let err = enc.decode(4).unwrap_err();
        assert_eq!(
            err,
            PredictError::CodeOutOfRange {
                column: "Weather".to_string(),
                code: 4,
                limit: 4,
            }
        );
    }

    #[test]
    fn test_roundtrip_labels() {
        let enc = weather_encoder();
        for label in enc.classes().to_vec() {
            let code = enc.encode(&label).unwrap();
            assert_eq!(enc.decode(code).unwrap(), label);
        }
    }

    #[test]
    fn test_roundtrip_codes() {
        let enc = weather_encoder();
        for code in 0..enc.len() as u32 {
            let label = enc.decode(code).unwrap().to_string();
            assert_eq!(enc.encode(&label).unwrap(), code);
        }
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let result = CategoryEncoder::from_classes(
            "Weather",
            vec!["Sunny".into(), "Sunny".into()],
        );
        assert!(matches!(result, Err(PredictError::SchemaMismatch(_))));
    }

    #[test]
    fn test_classes_preserve_code_order() {
        let enc = weather_encoder();
        assert_eq!(enc.classes()[1], "Rainy");
        assert_eq!(enc.len(), 4);
    }
}
