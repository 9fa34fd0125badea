//! # Import Pipeline
//!
//! Reads a vendor price list, resolves its header row and normalizes every
//! data row. A run either returns all records of the file or a single error.
use crate::catalog::header;
use crate::catalog::normalizer::default_tax_included;
use crate::catalog::normalizer::RowNormalizer;
use crate::catalog::PartRecord;
use crate::error::PartsCatalogError;
use crate::spreadsheet;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::RawSheet;
use chrono::Local;
use glob::Pattern;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use tracing::info;

/// Format of the `update_time` stamp
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that abort the import of one file
#[derive(Error, Debug)]
pub enum ImportError {
    /// The container or its worksheet data is missing or corrupt
    #[error("Read spreadsheet '{file_name}' failed: {source}")]
    ReadError {
        file_name: String,
        source: PartsCatalogError,
    },

    /// The sheet has no data row after the header
    #[error("Spreadsheet '{file_name}' has {rows} row(s), a header row and at least one data row are required")]
    InsufficientDataError { file_name: String, rows: usize },

    /// The sheet name option is not a valid glob
    #[error("Invalid sheet name pattern '{pattern}': {source}")]
    InvalidSheetName {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Options for one import run
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Glob selecting the worksheet; the first sheet is read when absent
    pub sheet_name: Option<String>,
    /// Drop rows whose cells are all blank
    pub skip_empty_rows: bool,
    /// Fill `update_time` at import instead of leaving it to storage
    pub stamp_update_time: bool,
    /// Currencies whose rows default to tax included
    pub tax_included_currencies: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            sheet_name: None,
            skip_empty_rows: false,
            stamp_update_time: true,
            tax_included_currencies: Vec::new(),
        }
    }
}

impl ImportOptions {
    fn criteria(&self) -> Result<Criteria, ImportError> {
        let sheet_name_pattern = self
            .sheet_name
            .as_deref()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ImportError::InvalidSheetName {
                    pattern: pattern.to_owned(),
                    source,
                })
            })
            .transpose()?;
        Ok(Criteria {
            sheet_name_pattern,
            skip_empty_rows: self.skip_empty_rows,
        })
    }
}

/// Imports an XLSX file from disk
pub fn import_file(path: impl AsRef<Path>, options: &ImportOptions) -> Result<Vec<PartRecord>, ImportError> {
    let path = path.as_ref();
    let file_name = path.display().to_string();
    info!(file_name = %file_name, "importing price list");
    let criteria = options.criteria()?;
    let sheet = spreadsheet::read_xlsx_file(path, &criteria)
        .map_err(|source| ImportError::ReadError {
            file_name: file_name.to_owned(),
            source,
        })?;
    import_sheet(&file_name, &sheet, options)
}

/// Imports an XLSX file already held in memory, such as an assembled upload
pub fn import_bytes(file_name: &str, bytes: Vec<u8>, options: &ImportOptions) -> Result<Vec<PartRecord>, ImportError> {
    info!(file_name = %file_name, bytes = bytes.len(), "importing price list");
    let criteria = options.criteria()?;
    let sheet = spreadsheet::read_xlsx_bytes(file_name, bytes, &criteria)
        .map_err(|source| ImportError::ReadError {
            file_name: file_name.to_owned(),
            source,
        })?;
    import_sheet(file_name, &sheet, options)
}

/// Normalizes rows that were already read; row 0 is the header
pub fn import_sheet(file_name: &str, sheet: &RawSheet, options: &ImportOptions) -> Result<Vec<PartRecord>, ImportError> {
    let headers = match sheet.header() {
        Some(headers) if sheet.rows.len() >= 2 => headers,
        _ => {
            return Err(ImportError::InsufficientDataError {
                file_name: file_name.to_owned(),
                rows: sheet.rows.len(),
            })
        }
    };

    let resolution = header::resolve(headers);
    debug!(
        file_name = %file_name,
        sheet = %sheet.name,
        mapping = ?resolution.mapping.iter().map(|(field, column)| (field.as_str(), column)).collect::<Vec<_>>(),
        tax_column = ?resolution.tax_column,
        "resolved header row"
    );

    let tax_default = default_tax_included(&resolution.currency, &options.tax_included_currencies);
    let update_time = options
        .stamp_update_time
        .then(|| Local::now().format(UPDATE_TIME_FORMAT).to_string());
    let records = RowNormalizer::from_resolution(&resolution, tax_default)
        .with_update_time(update_time)
        .normalize(sheet.data_rows());

    info!(
        file_name = %file_name,
        records = records.len(),
        mapped_columns = resolution.mapping.len(),
        currency = %resolution.currency,
        "normalized price list"
    );
    Ok(records)
}
