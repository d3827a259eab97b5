//! Prediction Context - Load-once artifact state
//!
//! The model and encoder artifacts are loaded exactly once at process start
//! and wrapped in a single read-only context that is passed explicitly.
//! No hidden globals: the context is the only handle to the artifacts, it is
//! never mutated after load, and it may be shared across requests freely.
//! Each prediction assembles its own independent row.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::assembler::{assemble, RawInputs, RawValue};
use crate::encoders::EncoderSet;
use crate::error::{ArtifactError, PredictError};
use crate::model::{Classifier, OnnxClassifier};
use crate::schema::{display_columns, ColumnKind, SCHEMA};
use crate::constants;

// ============================================================================
// TRAFFIC DENSITY
// ============================================================================

/// The three-level prediction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficDensity {
    Low,
    Medium,
    High,
}

impl TrafficDensity {
    /// Parse a target-encoder label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    /// Badge color hint for the presentation layer
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "orange",
            Self::High => "red",
        }
    }
}

impl std::fmt::Display for TrafficDensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

/// One decoded prediction, ready for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Raw class code the model returned
    pub code: u32,
    /// Label decoded through the target encoder
    pub label: String,
    /// Parsed density level
    pub density: TrafficDensity,
    /// Raw values of display-flagged columns (City drives the map lookup)
    pub display: HashMap<String, RawValue>,
}

// ============================================================================
// PREDICTION CONTEXT
// ============================================================================

/// Read-only bundle of everything one prediction needs.
pub struct PredictionContext {
    encoders: EncoderSet,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for PredictionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionContext")
            .field("encoders", &self.encoders)
            .finish_non_exhaustive()
    }
}

impl PredictionContext {
    /// Build a context from an already-loaded encoder set and classifier.
    ///
    /// Cross-artifact consistency is checked here, at load time:
    /// - every categorical schema column must have a fitted encoder
    /// - the target vocabulary must be the three density labels
    /// - a classifier that reports its class count must agree with the
    ///   target encoder
    pub fn with_classifier(
        encoders: EncoderSet,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        for col in SCHEMA {
            if col.kind == ColumnKind::Categorical && !encoders.contains(col.name) {
                return Err(PredictError::UnknownColumn {
                    column: col.name.to_string(),
                }
                .into());
            }
        }

        let target = encoders.target();
        for label in target.classes() {
            if TrafficDensity::from_label(label).is_none() {
                return Err(PredictError::SchemaMismatch(format!(
                    "target encoder knows unexpected class '{}'",
                    label
                ))
                .into());
            }
        }
        if target.len() != 3 {
            return Err(PredictError::SchemaMismatch(format!(
                "target encoder has {} classes, expected 3",
                target.len()
            ))
            .into());
        }

        if let Some(n) = classifier.num_classes() {
            if n != target.len() {
                return Err(PredictError::SchemaMismatch(format!(
                    "model predicts {} classes but target encoder knows {}",
                    n,
                    target.len()
                ))
                .into());
            }
        }

        Ok(Self { encoders, classifier })
    }

    /// Load both artifacts from disk and validate them together.
    pub fn load(model_path: &str, encoders_path: &str) -> Result<Self, ArtifactError> {
        let encoders = EncoderSet::load(std::path::Path::new(encoders_path))?;
        let classifier = OnnxClassifier::load(model_path)?;
        let ctx = Self::with_classifier(encoders, Box::new(classifier))?;

        log::info!(
            "Prediction context ready ({} v{})",
            constants::APP_NAME,
            constants::APP_VERSION
        );

        Ok(ctx)
    }

    /// Load artifacts from the configured (env or default) locations.
    pub fn load_default() -> Result<Self, ArtifactError> {
        Self::load(&constants::get_model_path(), &constants::get_encoders_path())
    }

    /// The loaded encoder set (enumerating classes populates form widgets)
    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// Run one full encode -> predict -> decode cycle.
    pub fn predict(&self, raw: &RawInputs) -> Result<Prediction, PredictError> {
        let row = assemble(&self.encoders, raw)?;
        let code = self.classifier.predict(&row)?;
        let label = self.encoders.target().decode(code)?.to_string();

        // Load-time validation pins the target vocabulary, so this can only
        // fail if the encoder set was swapped out from under us.
        let density = TrafficDensity::from_label(&label).ok_or_else(|| {
            PredictError::SchemaMismatch(format!("undecodable density label '{}'", label))
        })?;

        let display: HashMap<String, RawValue> = display_columns()
            .filter_map(|col| raw.get(col.name).map(|v| (col.name.to_string(), v.clone())))
            .collect();

        log::debug!("Predicted density {} (code {})", density, code);

        Ok(Prediction {
            code,
            label,
            density,
            display,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::{ClassList, EncodersArtifact, ENCODERS_ARTIFACT_VERSION};
    use crate::error::PredictError;
    use crate::schema::FeatureRow;

    /// Fixed-output classifier for exercising the decode path
    struct StubClassifier {
        code: u32,
        classes: Option<usize>,
    }

    impl Classifier for StubClassifier {
        fn predict(&self, _row: &FeatureRow) -> Result<u32, PredictError> {
            Ok(self.code)
        }

        fn num_classes(&self) -> Option<usize> {
            self.classes
        }
    }

    fn full_encoder_set() -> EncoderSet {
        let mut columns = HashMap::new();
        let mut add = |name: &str, classes: &[&str]| {
            columns.insert(
                name.to_string(),
                ClassList {
                    classes: classes.iter().map(|s| s.to_string()).collect(),
                },
            );
        };

        add("City", &["Chicago", "Los Angeles", "New York"]);
        add("Vehicle Type", &["Bus", "Car", "SUV", "Truck"]);
        add("Weather", &["Cloudy", "Rainy", "Snowy", "Sunny"]);
        add("Economic Condition", &["Declining", "Recession", "Stable"]);
        add(
            "Day Of Week",
            &["Friday", "Monday", "Saturday", "Sunday", "Thursday", "Tuesday", "Wednesday"],
        );

        EncoderSet::from_artifact(EncodersArtifact {
            version: ENCODERS_ARTIFACT_VERSION,
            columns,
            target: ClassList {
                classes: vec!["High".into(), "Low".into(), "Medium".into()],
            },
        })
        .unwrap()
    }

    fn chicago_inputs() -> RawInputs {
        let mut raw = RawInputs::new();
        raw.insert("City".into(), "Chicago".into());
        raw.insert("Vehicle Type".into(), "Car".into());
        raw.insert("Weather".into(), "Sunny".into());
        raw.insert("Economic Condition".into(), "Stable".into());
        raw.insert("Day Of Week".into(), "Monday".into());
        raw.insert("Hour Of Day".into(), 8i64.into());
        raw.insert("Speed".into(), 40i64.into());
        raw.insert("Is Peak Hour".into(), true.into());
        raw.insert("Random Event Occurred".into(), false.into());
        raw.insert("Energy Consumption".into(), 50.0.into());
        raw
    }

    fn context_with_code(code: u32) -> PredictionContext {
        PredictionContext::with_classifier(
            full_encoder_set(),
            Box::new(StubClassifier { code, classes: Some(3) }),
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_prediction() {
        let ctx = context_with_code(1);
        let prediction = ctx.predict(&chicago_inputs()).unwrap();

        assert_eq!(prediction.code, 1);
        assert_eq!(prediction.label, "Low");
        assert_eq!(prediction.density, TrafficDensity::Low);
        assert_eq!(
            prediction.display.get("City"),
            Some(&RawValue::Text("Chicago".to_string()))
        );
    }

    #[test]
    fn test_prediction_deterministic() {
        let ctx = context_with_code(2);
        let a = ctx.predict(&chicago_inputs()).unwrap();
        let b = ctx.predict(&chicago_inputs()).unwrap();

        assert_eq!(a.code, b.code);
        assert_eq!(a.label, b.label);
        assert_eq!(a.density, b.density);
    }

    #[test]
    fn test_unseen_weather_is_recoverable() {
        let ctx = context_with_code(0);
        let mut raw = chicago_inputs();
        raw.insert("Weather".into(), "Windy".into());

        let err = ctx.predict(&raw).unwrap_err();
        assert_eq!(
            err,
            PredictError::UnseenLabel {
                column: "Weather".to_string(),
                value: "Windy".to_string(),
            }
        );
    }

    #[test]
    fn test_model_code_out_of_target_range() {
        let ctx = context_with_code(9);
        let err = ctx.predict(&chicago_inputs()).unwrap_err();
        assert_eq!(
            err,
            PredictError::CodeOutOfRange {
                column: "target".to_string(),
                code: 9,
                limit: 3,
            }
        );
    }

    #[test]
    fn test_load_rejects_missing_column_encoder() {
        let mut columns = HashMap::new();
        columns.insert(
            "City".to_string(),
            ClassList {
                classes: vec!["Chicago".into()],
            },
        );
        let set = EncoderSet::from_artifact(EncodersArtifact {
            version: ENCODERS_ARTIFACT_VERSION,
            columns,
            target: ClassList {
                classes: vec!["High".into(), "Low".into(), "Medium".into()],
            },
        })
        .unwrap();

        let err = PredictionContext::with_classifier(
            set,
            Box::new(StubClassifier { code: 0, classes: None }),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Invalid(PredictError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_load_rejects_foreign_target_vocabulary() {
        let mut artifact = EncodersArtifact {
            version: ENCODERS_ARTIFACT_VERSION,
            columns: HashMap::new(),
            target: ClassList {
                classes: vec!["High".into(), "Low".into(), "Severe".into()],
            },
        };
        for col in SCHEMA {
            if col.kind == ColumnKind::Categorical {
                artifact.columns.insert(
                    col.name.to_string(),
                    ClassList {
                        classes: vec!["x".into()],
                    },
                );
            }
        }
        let set = EncoderSet::from_artifact(artifact).unwrap();

        let err = PredictionContext::with_classifier(
            set,
            Box::new(StubClassifier { code: 0, classes: None }),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Invalid(PredictError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_load_rejects_class_count_mismatch() {
        let err = PredictionContext::with_classifier(
            full_encoder_set(),
            Box::new(StubClassifier { code: 0, classes: Some(5) }),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Invalid(PredictError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_density_labels() {
        assert_eq!(TrafficDensity::from_label("Low"), Some(TrafficDensity::Low));
        assert_eq!(TrafficDensity::from_label("Severe"), None);
        assert_eq!(TrafficDensity::High.to_string(), "High");
        assert_eq!(TrafficDensity::Medium.color(), "orange");
    }

    #[test]
    fn test_load_aborts_on_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let encoders_path = dir.path().join("encoders.json");

        let mut artifact = EncodersArtifact {
            version: ENCODERS_ARTIFACT_VERSION,
            columns: HashMap::new(),
            target: ClassList {
                classes: vec!["High".into(), "Low".into(), "Medium".into()],
            },
        };
        for col in SCHEMA {
            if col.kind == ColumnKind::Categorical {
                artifact.columns.insert(
                    col.name.to_string(),
                    ClassList {
                        classes: vec!["x".into()],
                    },
                );
            }
        }
        std::fs::write(&encoders_path, serde_json::to_string(&artifact).unwrap()).unwrap();

        let model_path = dir.path().join("model.onnx");
        let err = PredictionContext::load(
            model_path.to_str().unwrap(),
            encoders_path.to_str().unwrap(),
        )
        .unwrap_err();

        assert!(matches!(err, ArtifactError::Model(_)));
    }
}
