//! Model Module - Classifier Boundary
//!
//! The pre-trained model is an opaque artifact; this module owns the
//! `row -> class code` boundary and the ONNX-backed implementation of it.

pub mod inference;

// Re-export common types
pub use inference::{Classifier, ClassifierStatus, ModelMetadata, OnnxClassifier};
