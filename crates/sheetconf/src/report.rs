//! Progress reporting
//!
//! The pipeline never prints. It hands structured [`Event`]s to a
//! [`Reporter`]; [`TracingReporter`] turns them into log lines and
//! [`MemoryReporter`] keeps them for inspection.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::format::Format;
use crate::schema::Target;

/// Something that happened during a run
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RunStarted {
        input: PathBuf,
    },
    WorkbookStarted {
        file: PathBuf,
    },
    /// All formats of a sheet were written
    SheetExported {
        name: String,
        file: PathBuf,
        rows: usize,
    },
    /// One format of a sheet was written, for both targets
    FormatWritten {
        sheet: String,
        format: Format,
        elapsed: Duration,
    },
    ManifestWritten {
        target: Target,
        format: Format,
        sheets: usize,
    },
    MoveCompleted {
        target: Target,
        destinations: usize,
    },
    RunCompleted {
        sheets: usize,
        files_written: usize,
        elapsed: Duration,
    },
    /// The run stopped; nothing was written
    RunFailed {
        message: String,
    },
}

/// Receives run events
pub trait Reporter {
    fn report(&mut self, event: Event);
}

/// Renders events as `tracing` log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: Event) {
        match event {
            Event::RunStarted { input } => {
                info!(input = %input.display(), "generation started");
            }
            Event::WorkbookStarted { file } => {
                info!(file = %file.display(), "reading workbook");
            }
            Event::SheetExported { name, file, rows } => {
                info!(sheet = %name, file = %file.display(), rows, "sheet exported");
            }
            Event::FormatWritten {
                sheet,
                format,
                elapsed,
            } => {
                info!(sheet = %sheet, format = %format, ?elapsed, "format written");
            }
            Event::ManifestWritten {
                target,
                format,
                sheets,
            } => {
                debug!(view = %target, format = %format, sheets, "manifest written");
            }
            Event::MoveCompleted {
                target,
                destinations,
            } => {
                info!(view = %target, destinations, "move completed");
            }
            Event::RunCompleted {
                sheets,
                files_written,
                elapsed,
            } => {
                info!(sheets, files_written, ?elapsed, "generation finished");
            }
            Event::RunFailed { message } => {
                error!("generation failed: {message}");
            }
        }
    }
}

/// Collects events in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    events: Vec<Event>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Events without timings, for comparisons
    pub fn untimed(&self) -> Vec<Event> {
        self.events
            .iter()
            .cloned()
            .map(|event| match event {
                Event::FormatWritten { sheet, format, .. } => Event::FormatWritten {
                    sheet,
                    format,
                    elapsed: Duration::ZERO,
                },
                Event::RunCompleted {
                    sheets,
                    files_written,
                    ..
                } => Event::RunCompleted {
                    sheets,
                    files_written,
                    elapsed: Duration::ZERO,
                },
                other => other,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_keeps_order() {
        let mut reporter = MemoryReporter::new();
        reporter.report(Event::RunStarted {
            input: PathBuf::from("excel"),
        });
        reporter.report(Event::RunFailed {
            message: "boom".into(),
        });

        assert_eq!(reporter.events().len(), 2);
        assert!(matches!(reporter.events()[1], Event::RunFailed { .. }));
    }

    #[test]
    fn test_untimed_clears_durations() {
        let mut reporter = MemoryReporter::new();
        reporter.report(Event::FormatWritten {
            sheet: "Item".into(),
            format: Format::Json,
            elapsed: Duration::from_millis(3),
        });

        assert_eq!(
            reporter.untimed(),
            vec![Event::FormatWritten {
                sheet: "Item".into(),
                format: Format::Json,
                elapsed: Duration::ZERO,
            }]
        );
    }

    #[test]
    fn test_tracing_reporter_accepts_every_event() {
        let mut reporter = TracingReporter;
        reporter.report(Event::ManifestWritten {
            target: Target::Client,
            format: Format::Lua,
            sheets: 2,
        });
        reporter.report(Event::RunCompleted {
            sheets: 2,
            files_written: 12,
            elapsed: Duration::from_secs(1),
        });
    }
}
