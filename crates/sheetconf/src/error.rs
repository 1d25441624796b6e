//! Error types for the generation pipeline
//!
//! Every error is fatal to the run that raised it. Messages name the source
//! workbook, the sheet, the row identifier and the key wherever they are
//! known, so the spreadsheet author can find the offending cell.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::RowKey;
use crate::format::Format;
use crate::schema::ColumnType;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the configuration or generating assets
#[derive(Debug, Error)]
pub enum Error {
    /// A header key does not match `[A-Za-z0-9]+` once its sigil is stripped
    #[error("{}: sheet '{sheet}': invalid key '{key}' in column {column} (keys may only contain letters and digits)", .file.display())]
    InvalidKey {
        file: PathBuf,
        sheet: String,
        column: String,
        key: String,
    },

    /// Two columns of one sheet produce the same key
    #[error("{}: sheet '{sheet}': duplicate key '{key}'", .file.display())]
    DuplicateKey {
        file: PathBuf,
        sheet: String,
        key: String,
    },

    /// Two data rows of one sheet share an identifier
    #[error("{}: sheet '{sheet}': duplicate id '{id}' in row {row}", .file.display())]
    DuplicateId {
        file: PathBuf,
        sheet: String,
        id: RowKey,
        row: u32,
    },

    /// Two exported worksheets produce the same sheet name
    #[error("duplicate sheet name '{name}' in {} and {}", .first.display(), .second.display())]
    DuplicateSheetName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A `json` column holds text that is not valid JSON
    #[error("{}: sheet '{sheet}': id '{id}', key '{key}': invalid JSON: {message}", .file.display())]
    InvalidJson {
        file: PathBuf,
        sheet: String,
        id: RowKey,
        key: String,
        message: String,
    },

    /// A cell cannot be converted to its column's declared type
    #[error("{}: sheet '{sheet}': row {row}, key '{key}': expected {expected}, found {found}", .file.display())]
    InvalidValue {
        file: PathBuf,
        sheet: String,
        row: u32,
        key: String,
        expected: ColumnType,
        found: String,
    },

    /// An exported worksheet title does not yield a usable sheet name
    #[error("{}: invalid sheet name '{name}': {reason}", .file.display())]
    InvalidSheetName {
        file: PathBuf,
        name: String,
        reason: &'static str,
    },

    /// The configuration file does not exist
    #[error("configuration file not found: {}", .0.display())]
    MissingConfig(PathBuf),

    /// The configuration file cannot be parsed
    #[error("invalid configuration {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    /// The configured input is not an existing directory
    #[error("input path is not a directory: {}", .0.display())]
    InvalidInputPath(PathBuf),

    /// A workbook cannot be opened or parsed
    #[error("cannot read workbook {}: {source}", .file.display())]
    Workbook {
        file: PathBuf,
        #[source]
        source: sheetconf_xlsx::XlsxError,
    },

    /// An encoder failed to serialize a document
    #[error("cannot encode '{name}' as {format}: {message}")]
    Encode {
        name: String,
        format: Format,
        message: String,
    },

    /// Copying a generated directory to a destination failed
    #[error("cannot copy {} to {}: {message}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    /// The file watcher failed
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
