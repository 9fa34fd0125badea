use thiserror::Error;

/// Main error type for the parts catalog crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum PartsCatalogError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Upload and search errors
    #[error("{0}")]
    UploadError(#[from] crate::upload::UploadError),

    #[error("{0}")]
    SearchError(#[from] crate::search::SearchError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, PartsCatalogError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| PartsCatalogError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_wraps_message() {
        let result: Result<(), PartsCatalogError> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into());
        let error = result.with_prefix("Open 'a.xlsx' failed").unwrap_err();
        assert_eq!(error.to_string(), "Open 'a.xlsx' failed: no such file");
    }

    #[test]
    fn module_errors_convert() {
        let error: PartsCatalogError = crate::search::SearchError::EmptyKeyword.into();
        assert!(matches!(error, PartsCatalogError::SearchError(_)));
        let result: Result<(), PartsCatalogError> = Err(error);
        assert_eq!(result.with_prefix("Search failed").unwrap_err().to_string(), "Search failed: Search keyword is empty");
    }

    #[test]
    fn with_prefix_keeps_ok() {
        let result: Result<u8, PartsCatalogError> = Ok(7);
        assert_eq!(result.with_prefix("unused").unwrap(), 7);
    }
}
