//! # Catalog Normalization Module
//!
//! Maps vendor price-list headers onto the canonical `parts` columns and
//! normalizes data rows into [`PartRecord`] values.
//!
//! - [`alias`]: the static alias table and the canonical field set
//! - [`header`]: header normalization, column mapping, currency and tax column detection
//! - [`normalizer`]: per-row extraction with file-level currency and tax defaults
//! - [`record`]: the normalized record handed to storage
pub mod alias;
pub mod header;
pub mod normalizer;
pub mod record;

pub use alias::CanonicalField;
pub use header::resolve;
pub use header::ColumnMapping;
pub use header::HeaderResolution;
pub use normalizer::RowNormalizer;
pub use record::PartRecord;
pub use record::TaxIncluded;
