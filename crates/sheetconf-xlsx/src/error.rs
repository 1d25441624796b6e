//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors raised while reading or writing a workbook package
#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a zip archive, or the archive is damaged
    #[error("unreadable zip container: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A zip archive that is not an Office Open XML package
    #[error("not a workbook package: {0}")]
    NotAWorkbook(&'static str),

    #[error("package part {0} is missing")]
    MissingPart(String),

    #[error("malformed XML in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// A `<c>` element the reader cannot place or decode
    #[error("{part}: cell {reference}: {message}")]
    InvalidCell {
        part: String,
        reference: String,
        message: String,
    },

    /// The workbook cannot be represented in a package
    #[error("cannot write workbook: {0}")]
    Unwritable(String),

    #[error(transparent)]
    Core(#[from] sheetconf_core::Error),
}
