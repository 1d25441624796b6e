//! # sheetconf-core
//!
//! Core grid model for sheetconf.
//!
//! This crate provides the in-memory representation that workbook readers fill
//! and the generation pipeline walks:
//! - [`CellValue`] - A cell's value (numbers, strings, booleans, errors)
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use sheetconf_core::{Workbook, CellValue};
//!
//! let mut workbook = Workbook::empty();
//! let sheet = workbook.push_worksheet("#Item").unwrap();
//!
//! // A1 addresses
//! sheet.set_cell_value("A1", "id").unwrap();
//! sheet.set_cell_value("A2", "int").unwrap();
//!
//! // or 0-based row/column indices
//! sheet.set_cell_value_at(3, 0, CellValue::Number(1.0)).unwrap();
//! assert_eq!(sheet.last_row(), Some(3));
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellError, CellRange, CellStorage, CellValue, SharedString};
pub use error::{Axis, Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
