//! # Spreadsheet Reading Module
//!
//! Decodes an XLSX container into rows of cell strings. Shared strings and
//! inline strings are resolved to literal text; nothing else about a cell
//! (styles, formulas, number formats) is interpreted.
use crate::error::PartsCatalogError;
use crate::error::ResultMessage;
use crate::helpers::reader::UnifiedReader;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::path::Path;
use thiserror::Error;

pub(crate) mod criteria;
mod excel;
mod reference;
mod xlsx;

pub(crate) use criteria::Criteria;

/// Errors raised while locating worksheet data inside a container
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// No worksheet matched the requested sheet name
    #[error("No matching sheet found in '{0}'")]
    SheetNotFound(String),

    /// The workbook points at a worksheet part that does not exist
    #[error("Worksheet part '{1}' not found in '{0}'")]
    WorksheetNotFound(String, String),

    /// A cell carries a malformed or out-of-range `r` reference
    #[error("Invalid cell reference '{1}' in '{0}'")]
    InvalidCellReference(String, String),

    /// The worksheet part has no cell data section
    #[error("Worksheet '{1}' in '{0}' has no sheet data")]
    MissingSheetData(String, String),
}

/// Rows of cell strings read from one worksheet. Row 0 is the header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSheet {
    /// Worksheet name
    pub name: String,
    /// Rows in document order; rows may have different lengths
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(name: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_owned(),
            rows,
        }
    }

    /// The header row, if any
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Every row after the header
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Reads the selected worksheet of an XLSX file on disk
pub(crate) fn read_xlsx_file(path: &Path, criteria: &Criteria) -> Result<RawSheet, PartsCatalogError> {
    let name = path.display().to_string();
    let reader = UnifiedReader::open(path).with_prefix(&format!("Open '{}' failed", name))?;
    XlsxSpreadsheet::open(&name, reader)?.read_sheet(criteria)
}

/// Reads the selected worksheet of an XLSX file held in memory
pub(crate) fn read_xlsx_bytes(name: &str, bytes: Vec<u8>, criteria: &Criteria) -> Result<RawSheet, PartsCatalogError> {
    let reader = UnifiedReader::from_bytes(bytes);
    XlsxSpreadsheet::open(name, reader)?.read_sheet(criteria)
}
