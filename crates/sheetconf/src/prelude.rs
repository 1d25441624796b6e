//! Prelude module - common imports for sheetconf users
//!
//! ```rust
//! use sheetconf::prelude::*;
//! ```

pub use crate::{
    // Grid model
    CellValue,
    // Configuration
    Config,
    // Documents
    Document,
    // Error types
    Error,
    Format,
    // Pipeline
    Generator,
    MemoryReporter,
    Reporter,
    Result,
    RowKey,
    RunSummary,
    SheetData,
    Target,
    TracingReporter,
    Workbook,
    Worksheet,

    // I/O types
    XlsxReader,
    XlsxWriter,
};

pub use crate::sheet::process_sheet;
