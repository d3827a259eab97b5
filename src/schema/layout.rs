//! Schema Registry - Centralized Column Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add column → increment SCHEMA_VERSION
//! 2. Change order → increment SCHEMA_VERSION
//! 3. Remove column → increment SCHEMA_VERSION
//!
//! The model has no column names at inference time, only positional values.
//! Any divergence between this order and the order the model was fitted on
//! produces silently wrong predictions, which is why the layout is a fixed
//! const table and never inferred from map iteration order.

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// Current schema layout version
/// MUST be incremented when layout changes
pub const SCHEMA_VERSION: u8 = 1;

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// How a column's raw value is turned into a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Label-encoded through the column's fitted CategoryEncoder.
    Categorical,
    /// Passed through as-is.
    Numeric,
    /// "False"/"True", encoded to 0/1 (see assembler for the exact rule).
    Boolean,
}

impl ColumnKind {
    /// Stable one-byte tag for the layout hash.
    fn tag(self) -> u8 {
        match self {
            Self::Categorical => b'c',
            Self::Numeric => b'n',
            Self::Boolean => b'b',
        }
    }
}

/// One column of the canonical layout.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Also consumed directly by the presentation layer (e.g. City drives
    /// the map lookup). Display columns are still model features.
    pub display: bool,
    /// Inclusive (min, max, default) widget bounds for numeric columns.
    pub bounds: Option<(f64, f64, f64)>,
}

// ============================================================================
// SCHEMA LAYOUT (Authoritative source)
// ============================================================================

/// Columns in the exact order the model was fitted on.
/// This is the SINGLE SOURCE OF TRUTH for the feature layout.
pub const SCHEMA: &[ColumnSpec] = &[
    ColumnSpec { name: "City",                  kind: ColumnKind::Categorical, display: true,  bounds: None },
    ColumnSpec { name: "Vehicle Type",          kind: ColumnKind::Categorical, display: false, bounds: None },
    ColumnSpec { name: "Weather",               kind: ColumnKind::Categorical, display: false, bounds: None },
    ColumnSpec { name: "Economic Condition",    kind: ColumnKind::Categorical, display: false, bounds: None },
    ColumnSpec { name: "Day Of Week",           kind: ColumnKind::Categorical, display: false, bounds: None },
    ColumnSpec { name: "Hour Of Day",           kind: ColumnKind::Numeric,     display: false, bounds: Some((0.0, 23.0, 8.0)) },
    ColumnSpec { name: "Speed",                 kind: ColumnKind::Numeric,     display: false, bounds: Some((0.0, 120.0, 40.0)) },
    ColumnSpec { name: "Is Peak Hour",          kind: ColumnKind::Boolean,     display: false, bounds: None },
    ColumnSpec { name: "Random Event Occurred", kind: ColumnKind::Boolean,     display: false, bounds: None },
    ColumnSpec { name: "Energy Consumption",    kind: ColumnKind::Numeric,     display: false, bounds: Some((0.0, 100.0, 50.0)) },
];

/// Total number of model features
/// IMPORTANT: Must match SCHEMA.len()!
pub const FEATURE_COUNT: usize = 10;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the schema layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[SCHEMA_VERSION]);

    // Hash all column names and kinds in order
    for col in SCHEMA {
        hasher.update(col.name.as_bytes());
        hasher.update(&[col.kind.tag()]);
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Get layout hash (computed once, inputs are const)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub column_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            column_names: SCHEMA.iter().map(|c| c.name.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate that incoming data matches the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), PredictError> {
    let current_hash = layout_hash();

    if incoming_version != SCHEMA_VERSION || incoming_hash != current_hash {
        return Err(PredictError::SchemaMismatch(format!(
            "expected layout v{} (hash {:08x}), got v{} (hash {:08x})",
            SCHEMA_VERSION, current_hash, incoming_version, incoming_hash
        )));
    }

    Ok(())
}

/// Check if a layout is compatible (same version, same hash)
pub fn is_layout_compatible(version: u8, hash: u32) -> bool {
    version == SCHEMA_VERSION && hash == layout_hash()
}

// ============================================================================
// COLUMN LOOKUP
// ============================================================================

/// Get column index by name (O(n) but columns are few)
pub fn column_index(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|c| c.name == name)
}

/// Get column name by index
pub fn column_name(index: usize) -> Option<&'static str> {
    SCHEMA.get(index).map(|c| c.name)
}

/// Get the full spec for a column by name
pub fn column_spec(name: &str) -> Option<&'static ColumnSpec> {
    SCHEMA.iter().find(|c| c.name == name)
}

/// Columns the presentation layer consumes directly (map lookup etc.)
pub fn display_columns() -> impl Iterator<Item = &'static ColumnSpec> {
    SCHEMA.iter().filter(|c| c.display)
}

// ============================================================================
// TESTS
// ============================================================================
