//! Error types for sheetconf-core

use std::fmt;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Grid dimension an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Row => "row",
            Axis::Column => "column",
        })
    }
}

/// Errors raised while building or addressing the grid model
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid cell address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Indices are 0-based; `limit` is the first index past the grid
    #[error("{axis} index {index} is outside the grid (limit {limit})")]
    OutOfBounds { axis: Axis, index: u64, limit: u64 },

    #[error("invalid sheet title '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Titles within one workbook compare case-insensitively
    #[error("workbook already has a sheet titled '{0}'")]
    DuplicateSheetName(String),
}

impl Error {
    pub(crate) fn address(address: &str, reason: impl Into<String>) -> Self {
        Error::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
