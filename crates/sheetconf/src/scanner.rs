//! Workbook scanning: exported worksheets of one workbook

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use sheetconf_core::Workbook;
use sheetconf_xlsx::XlsxReader;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sheet::{process_sheet, SheetData};
use crate::{MANIFEST_NAME, WORKBOOK_EXTENSION};

/// Worksheet title prefix marking a sheet for export
pub const EXPORT_MARKER: char = '#';

/// Check if a file name denotes a workbook to generate from
///
/// Office lock files (`~$name.xlsx`) are skipped.
pub fn is_workbook_file(file_name: &str) -> bool {
    !file_name.starts_with('~')
        && Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext == WORKBOOK_EXTENSION)
}

/// Sheet name of an exported worksheet, or `None` when the title lacks the
/// export marker
pub fn sheet_name(title: &str) -> Option<&str> {
    title.strip_prefix(EXPORT_MARKER)
}

/// Sheet names seen during one run, with the workbook each came from
#[derive(Debug, Default)]
pub struct SheetRegistry {
    sheets: AHashMap<String, PathBuf>,
}

impl SheetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `file`
    ///
    /// Fails with [`Error::DuplicateSheetName`] when another worksheet
    /// already claimed the name in this run.
    pub fn register(&mut self, name: &str, file: &Path) -> Result<()> {
        if let Some(first) = self.sheets.get(name) {
            return Err(Error::DuplicateSheetName {
                name: name.to_string(),
                first: first.clone(),
                second: file.to_path_buf(),
            });
        }
        self.sheets.insert(name.to_string(), file.to_path_buf());
        Ok(())
    }

    /// Workbook that claimed `name`
    pub fn source_of(&self, name: &str) -> Option<&Path> {
        self.sheets.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Reads workbooks and processes their exported worksheets
pub struct WorkbookScanner;

impl WorkbookScanner {
    /// Read the workbook at `path` and process its exported worksheets
    pub fn scan(path: &Path, registry: &mut SheetRegistry) -> Result<Vec<SheetData>> {
        let workbook = XlsxReader::read_file(path).map_err(|source| Error::Workbook {
            file: path.to_path_buf(),
            source,
        })?;
        Self::scan_workbook(path, &workbook, registry)
    }

    /// Process the exported worksheets of an already loaded workbook
    ///
    /// Worksheets are handled in workbook order; the first error stops the
    /// scan.
    pub fn scan_workbook(
        path: &Path,
        workbook: &Workbook,
        registry: &mut SheetRegistry,
    ) -> Result<Vec<SheetData>> {
        info!(file = %path.display(), sheets = workbook.sheet_count(), "scanning workbook");

        let mut sheets = Vec::new();
        for worksheet in workbook.worksheets() {
            let Some(name) = sheet_name(worksheet.name()) else {
                debug!(sheet = worksheet.name(), "worksheet not marked for export, skipped");
                continue;
            };

            validate_sheet_name(path, name)?;
            registry.register(name, path)?;

            let data = process_sheet(path, name, worksheet)?;
            info!(sheet = name, rows = data.row_count(), "sheet loaded");
            sheets.push(data);
        }

        Ok(sheets)
    }
}

fn validate_sheet_name(file: &Path, name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "the name is empty once the export marker is removed"
    } else if name == MANIFEST_NAME {
        "the name is reserved for the manifest"
    } else if name.trim() != name {
        "the name has leading or trailing whitespace"
    } else {
        return Ok(());
    };

    Err(Error::InvalidSheetName {
        file: file.to_path_buf(),
        name: name.to_string(),
        reason,
    })
}
