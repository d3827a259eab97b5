//! Traffic Density Core - Inference Library
//!
//! Core of the urban traffic density predictor: build a one-row feature
//! vector in the exact column order the model was fitted on, apply the
//! pre-fitted per-column label encoders, run the pre-trained classifier and
//! invert the target encoding back to a `Low`/`Medium`/`High` label.
//!
//! The model and encoder artifacts are produced elsewhere; this crate loads
//! them once at startup into a read-only [`PredictionContext`] and serves
//! synchronous predictions from it. Form rendering, CSV handling and map
//! visualization live in the embedding application.
//!
//! ```no_run
//! use traffic_density_core::{PredictionContext, RawInputs};
//!
//! let ctx = PredictionContext::load_default()?;
//! let raw: RawInputs = serde_json::from_str(r#"{
//!     "City": "Chicago",
//!     "Vehicle Type": "Car",
//!     "Weather": "Sunny",
//!     "Economic Condition": "Stable",
//!     "Day Of Week": "Monday",
//!     "Hour Of Day": 8,
//!     "Speed": 40,
//!     "Is Peak Hour": true,
//!     "Random Event Occurred": false,
//!     "Energy Consumption": 50.0
//! }"#)?;
//! let prediction = ctx.predict(&raw)?;
//! println!("Predicted Traffic Density: {}", prediction.density);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod constants;
pub mod context;
pub mod encoders;
pub mod error;
pub mod model;
pub mod schema;

// Re-export the public surface
pub use assembler::{assemble, RawInputs, RawValue};
pub use context::{Prediction, PredictionContext, TrafficDensity};
pub use encoders::{CategoryEncoder, EncoderSet};
pub use error::{ArtifactError, PredictError};
pub use model::{Classifier, OnnxClassifier};
pub use schema::{FeatureRow, LayoutInfo, FEATURE_COUNT, SCHEMA};
