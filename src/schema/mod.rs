//! Schema Module - Canonical Feature Layout
//!
//! Single source of truth for the column order and typing the model was
//! fitted on, plus the versioned row type built against it.

pub mod layout;
pub mod row;


// Re-export common types
pub use layout::{
    column_index, column_name, column_spec, display_columns, layout_hash, validate_layout,
    ColumnKind, ColumnSpec, LayoutInfo, FEATURE_COUNT, SCHEMA, SCHEMA_VERSION,
};
pub use row::FeatureRow;
