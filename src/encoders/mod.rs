//! Encoders Module - Fitted Label Encoders
//!
//! Read-only label <-> code transforms produced by the training side and
//! loaded once at startup.

pub mod label;
pub mod set;

// Re-export common types
pub use label::CategoryEncoder;
pub use set::{ClassList, EncoderSet, EncodersArtifact, ENCODERS_ARTIFACT_VERSION};
