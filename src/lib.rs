//! # Parts Catalog
//!
//! Imports vendor electronic-component price lists (XLSX) and normalizes
//! them into records for a `parts` table.
//!
//! ## Pipeline
//!
//! - [`spreadsheet`]: reads the worksheet rows of an XLSX container, resolving
//!   shared and inline strings to plain text
//! - [`catalog`]: maps free-form vendor headers (English and Chinese) onto the
//!   canonical columns, detects the file currency and the "tax included"
//!   column, and normalizes every data row
//! - [`import`]: runs the whole pipeline for one file with [`ImportOptions`]
//!
//! ## Collaborators
//!
//! - [`upload`]: assembles chunked uploads into a complete file
//! - [`search`]: keyword cleanup, pagination and substring matching over records
//!
//! ## Example
//!
//! ```no_run
//! use parts_catalog::import::{import_file, ImportOptions};
//!
//! let records = import_file("vendor.xlsx", &ImportOptions::default())?;
//! for record in &records {
//!     println!("{} {} {}", record.part_no, record.price, record.currency);
//! }
//! # Ok::<(), parts_catalog::ImportError>(())
//! ```
pub mod catalog;
pub mod error;
mod helpers;
pub mod import;
pub mod logging;
pub mod search;
pub mod spreadsheet;
pub mod upload;

pub use catalog::CanonicalField;
pub use catalog::PartRecord;
pub use catalog::TaxIncluded;
pub use error::PartsCatalogError;
pub use helpers::xml::XmlError;
pub use import::import_bytes;
pub use import::import_file;
pub use import::ImportError;
pub use import::ImportOptions;
pub use search::SearchQuery;
pub use spreadsheet::RawSheet;
pub use upload::ChunkAssembler;
pub use upload::ChunkStatus;
