//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular block of cells (e.g., "A1:C4")
//! - [`CellStorage`] - Sparse row-major storage used by worksheets

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange};
pub use storage::CellStorage;
pub use value::{CellError, CellValue, SharedString};
