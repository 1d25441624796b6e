//! Run orchestration: input tree to generated files
//!
//! A run reads and validates every workbook before it writes anything, so a
//! failed run leaves the output of the previous run untouched.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;
use crate::document::{Document, RowKey};
use crate::emit::Emitter;
use crate::error::{Error, Result};
use crate::mover::{move_target, DirMover, FileMover};
use crate::report::{Event, Reporter};
use crate::scanner::{is_workbook_file, SheetRegistry, WorkbookScanner};
use crate::schema::Target;
use crate::sheet::SheetData;
use crate::MANIFEST_NAME;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Names of the exported sheets, in processing order
    pub sheets: Vec<String>,
    /// Sheet and manifest files written
    pub files_written: usize,
    pub elapsed: Duration,
}

/// Runs the whole pipeline for one configuration
pub struct Generator {
    config: Config,
    mover: Box<dyn FileMover>,
}

impl Generator {
    /// Create a generator copying files with [`DirMover`]
    pub fn new(config: Config) -> Self {
        Self::with_mover(config, Box::new(DirMover))
    }

    pub fn with_mover(config: Config, mover: Box<dyn FileMover>) -> Self {
        Self { config, mover }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate every sheet, the manifests, then copy to the move destinations
    ///
    /// Failures are reported as [`Event::RunFailed`] and returned.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<RunSummary> {
        let result = self.try_run(reporter);
        if let Err(e) = &result {
            reporter.report(Event::RunFailed {
                message: e.to_string(),
            });
        }
        result
    }

    fn try_run(&self, reporter: &mut dyn Reporter) -> Result<RunSummary> {
        let started = Instant::now();
        let input = &self.config.input;
        if !input.is_dir() {
            return Err(Error::InvalidInputPath(input.clone()));
        }
        reporter.report(Event::RunStarted {
            input: input.clone(),
        });

        let sheets = self.load_sheets(reporter)?;

        let mut files_written = 0;
        for sheet in &sheets {
            files_written += self.write_sheet(sheet, reporter)?;
        }
        files_written += self.write_manifests(&sheets, reporter)?;

        if self.config.move_to.is_some() {
            for target in Target::ALL {
                let destinations = move_target(&self.config, target, self.mover.as_ref())?;
                reporter.report(Event::MoveCompleted {
                    target,
                    destinations,
                });
            }
        }

        let summary = RunSummary {
            sheets: sheets.into_iter().map(|s| s.name).collect(),
            files_written,
            elapsed: started.elapsed(),
        };
        reporter.report(Event::RunCompleted {
            sheets: summary.sheets.len(),
            files_written: summary.files_written,
            elapsed: summary.elapsed,
        });
        Ok(summary)
    }

    /// Read and validate every workbook below the input directory
    fn load_sheets(&self, reporter: &mut dyn Reporter) -> Result<Vec<SheetData>> {
        let mut registry = SheetRegistry::new();
        let mut sheets = Vec::new();

        for path in find_workbooks(&self.config.input)? {
            reporter.report(Event::WorkbookStarted { file: path.clone() });
            sheets.extend(WorkbookScanner::scan(&path, &mut registry)?);
        }

        info!(sheets = sheets.len(), "all workbooks validated");
        Ok(sheets)
    }

    fn write_sheet(&self, sheet: &SheetData, reporter: &mut dyn Reporter) -> Result<usize> {
        let mut written = 0;
        for format in self.config.formats() {
            let started = Instant::now();
            for target in Target::ALL {
                let dir = self.config.output_dir(target, format);
                Emitter::emit(&sheet.name, sheet.view(target), &dir, format)?;
                written += 1;
            }
            reporter.report(Event::FormatWritten {
                sheet: sheet.name.clone(),
                format,
                elapsed: started.elapsed(),
            });
        }

        reporter.report(Event::SheetExported {
            name: sheet.name.clone(),
            file: sheet.source.clone(),
            rows: sheet.row_count(),
        });
        Ok(written)
    }

    /// Write an `init` document per format and target listing the sheets
    /// whose file exists in that directory
    fn write_manifests(&self, sheets: &[SheetData], reporter: &mut dyn Reporter) -> Result<usize> {
        let mut written = 0;
        for format in self.config.formats() {
            for target in Target::ALL {
                let dir = self.config.output_dir(target, format);
                let manifest: Document = sheets
                    .iter()
                    .filter(|s| Emitter::output_path(&s.name, &dir, format).is_file())
                    .map(|s| (RowKey::Text(s.name.clone()), Value::Bool(true)))
                    .collect();

                Emitter::emit(MANIFEST_NAME, &manifest, &dir, format)?;
                written += 1;
                reporter.report(Event::ManifestWritten {
                    target,
                    format,
                    sheets: manifest.len(),
                });
            }
        }
        Ok(written)
    }
}

/// Workbooks below `input`, sorted by path within each directory
fn find_workbooks(input: &Path) -> Result<Vec<PathBuf>> {
    let mut workbooks = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_file() && is_workbook_file(&entry.file_name().to_string_lossy()) {
            workbooks.push(entry.into_path());
        }
    }
    Ok(workbooks)
}
