//! # sheetconf-xlsx
//!
//! Value-only XLSX (Office Open XML) reader and writer for sheetconf.
//!
//! The reader loads cell values only: formula cells contribute their cached
//! result, styles and other sheet metadata are skipped. The writer produces
//! the smallest package Excel and LibreOffice accept, which is enough to
//! build workbooks programmatically.

pub mod error;
pub mod escape;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
