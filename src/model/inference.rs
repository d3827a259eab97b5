//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the pre-trained traffic density classifier and runs it on one
//! encoded row at a time. The model is an opaque artifact: this layer only
//! consumes `row -> class code` and exposes no training or update path.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, PredictError};
use crate::schema::{FeatureRow, FEATURE_COUNT};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// The black-box prediction boundary.
///
/// Pure and deterministic: identical rows must produce identical codes.
pub trait Classifier: Send + Sync {
    /// Predict the class code for one encoded row
    fn predict(&self, row: &FeatureRow) -> Result<u32, PredictError>;

    /// Number of output classes, when the model reports it
    fn num_classes(&self) -> Option<usize> {
        None
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata recorded at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub features: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Classifier status for the embedding surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierStatus {
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_us: f32,
    pub inference_count: u64,
}

// ============================================================================
// HELPERS
// ============================================================================

/// Index of the highest score, ties broken by the lower index
pub(crate) fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if score <= b => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX-backed classifier.
///
/// The session requires exclusive access to run, so it sits behind a mutex;
/// everything else is immutable after load and the struct as a whole is
/// shareable across requests.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    metadata: ModelMetadata,
    latency_sum: AtomicU64,
    inference_count: AtomicU64,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("output_name", &self.output_name)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load an ONNX model from file.
    ///
    /// A missing or unloadable model is fatal; there is no degraded mode.
    pub fn load(model_path: &str) -> Result<Self, ArtifactError> {
        log::info!("Loading ONNX model from: {}", model_path);

        if !Path::new(model_path).exists() {
            return Err(ArtifactError::Model(format!("model not found: {}", model_path)));
        }

        let session = Session::builder()
            .map_err(|e| ArtifactError::Model(format!("failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::Model(format!("failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ArtifactError::Model(format!("failed to load model: {}", e)))?;

        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| ArtifactError::Model("model defines no outputs".to_string()))?;

        log::info!("ONNX model loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            metadata: ModelMetadata {
                model_path: model_path.to_string(),
                features: FEATURE_COUNT,
                loaded_at: chrono::Utc::now(),
            },
            latency_sum: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    /// Model metadata recorded at load time
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Current status for the embedding surface
    pub fn status(&self) -> ClassifierStatus {
        let sum = self.latency_sum.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { sum as f32 / count as f32 } else { 0.0 };

        ClassifierStatus {
            model_name: self.metadata.model_path.clone(),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            avg_latency_us: avg,
            inference_count: count,
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, row: &FeatureRow) -> Result<u32, PredictError> {
        let start_time = std::time::Instant::now();

        row.validate()?;

        let input_array =
            Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), row.as_slice().to_vec())
                .map_err(|e| PredictError::Inference(format!("array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PredictError::Inference(format!("tensor error: {}", e)))?;

        let mut session = self.session.lock();

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| PredictError::Inference(format!("inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| PredictError::Inference("no output".to_string()))?;

        // Classifier exports either emit the predicted label directly as an
        // i64 tensor, or per-class scores to reduce by argmax.
        let code = if let Ok(labels) = output.try_extract_tensor::<i64>() {
            let data = labels.1;
            let label = *data
                .first()
                .ok_or_else(|| PredictError::Inference("empty label tensor".to_string()))?;
            u32::try_from(label)
                .map_err(|_| PredictError::Inference(format!("negative class label {}", label)))?
        } else {
            let scores = output
                .try_extract_tensor::<f32>()
                .map_err(|e| PredictError::Inference(format!("extract error: {}", e)))?;
            argmax(scores.1)
                .ok_or_else(|| PredictError::Inference("empty score tensor".to_string()))?
                as u32
        };

        let elapsed = start_time.elapsed().as_micros() as u64;
        self.latency_sum.fetch_add(elapsed, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(code)
    }
}

// ============================================================================
// TESTS
// ============================================================================
