//! # sheetconf
//!
//! Generate configuration assets for game clients and servers from
//! spreadsheets.
//!
//! Every worksheet whose title starts with `#` is exported. Row 1 holds the
//! field keys, row 2 the declared types, row 3 is free for descriptions and
//! data starts at row 4, keyed by the value of the first column. Header
//! sigils decide who sees a column:
//!
//! | header | client | server |
//! |---|---|---|
//! | `name` | yes | yes |
//! | `$name` | yes | no |
//! | `!name` | no | yes |
//! | `#name` | no | no |
//!
//! Each exported sheet is written as JSON, Lua and XML for both targets,
//! together with an `init` manifest listing the generated sheets.
//!
//! ## Example
//!
//! ```rust
//! use sheetconf::prelude::*;
//! use std::path::Path;
//!
//! let mut workbook = Workbook::empty();
//! let sheet = workbook.push_worksheet("#Item").unwrap();
//! sheet.set_row_values(0, ["id", "!cost", "$displayName"]).unwrap();
//! sheet.set_row_values(1, ["int", "int", "string"]).unwrap();
//! sheet
//!     .set_row_values(3, [CellValue::from(1), CellValue::from(5), CellValue::from("Sword")])
//!     .unwrap();
//!
//! let data = process_sheet(Path::new("items.xlsx"), "Item", workbook.worksheet(0).unwrap()).unwrap();
//! let json = Format::Json.encode(data.view(Target::Server)).unwrap();
//! assert_eq!(json, r#"{"1":{"id":1,"cost":5}}"#);
//! ```

pub mod config;
pub mod document;
pub mod emit;
pub mod error;
pub mod format;
pub mod generate;
pub mod mover;
pub mod prelude;
pub mod projection;
pub mod report;
pub mod scanner;
pub mod schema;
pub mod sheet;
pub mod typing;
pub mod watch;

pub use config::{Config, MoveConfig};
pub use document::{Document, RowKey, RowObject};
pub use emit::Emitter;
pub use error::{Error, Result};
pub use format::Format;
pub use generate::{Generator, RunSummary};
pub use mover::{move_target, DirMover, FileMover};
pub use report::{Event, MemoryReporter, Reporter, TracingReporter};
pub use scanner::{SheetRegistry, WorkbookScanner};
pub use schema::{classify_key, Column, ColumnType, KeyClass, Schema, Target, Visibility};
pub use sheet::{process_sheet, SheetData};
pub use typing::{coerce, TypingError};
pub use watch::{Debouncer, Regenerator, WatchLoop};

// Re-export the grid model and the workbook I/O
pub use sheetconf_core::{CellError, CellValue, Workbook, Worksheet};
pub use sheetconf_xlsx::{XlsxError, XlsxReader, XlsxWriter};

/// File extension of the workbooks picked up from the input directory
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Name of the manifest document written next to the generated sheets
pub const MANIFEST_NAME: &str = "init";
