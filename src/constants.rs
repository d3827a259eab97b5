//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default artifact locations, only edit this file.

/// Default ONNX model artifact path
///
/// This is the fallback path when no environment variable is set.
/// The model is pre-trained elsewhere; this crate only loads it.
pub const DEFAULT_MODEL_PATH: &str = "traffic_density_model.onnx";

/// Default encoders artifact path (JSON export of the fitted label encoders)
pub const DEFAULT_ENCODERS_PATH: &str = "encoders.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "traffic-density-core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("TRAFFIC_MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get encoders artifact path from environment or use default
pub fn get_encoders_path() -> String {
    std::env::var("TRAFFIC_ENCODERS_PATH")
        .unwrap_or_else(|_| DEFAULT_ENCODERS_PATH.to_string())
}
