//! Regeneration loop
//!
//! A `notify` watcher on the input directory feeds a channel; the loop is its
//! only consumer and regenerates everything when a workbook's modification
//! time changes. Runs never overlap: the next event is taken only once the
//! current run returned.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::SystemTime;

use ahash::AHashMap;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::scanner::is_workbook_file;

/// What the watcher sends over the channel
pub type WatchEvent = notify::Result<notify::Event>;

/// Start watching `dir` (non-recursively)
///
/// Events arrive on the returned receiver for as long as the watcher lives.
pub fn watch_directory(dir: &Path) -> Result<(RecommendedWatcher, Receiver<WatchEvent>)> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    info!(dir = %dir.display(), "watching for workbook changes");
    Ok((watcher, rx))
}

/// Last seen modification time per file
#[derive(Debug, Default)]
pub struct Debouncer {
    seen: AHashMap<PathBuf, SystemTime>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `modified` for `path`; `true` when it is new or differs from the
    /// previous value
    pub fn observe(&mut self, path: &Path, modified: SystemTime) -> bool {
        match self.seen.get(path) {
            Some(previous) if *previous == modified => false,
            _ => {
                self.seen.insert(path.to_path_buf(), modified);
                true
            }
        }
    }

    /// Number of files seen so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// A full regeneration
pub trait Regenerator {
    fn regenerate(&mut self) -> Result<()>;
}

impl<F> Regenerator for F
where
    F: FnMut() -> Result<()>,
{
    fn regenerate(&mut self) -> Result<()> {
        self()
    }
}

/// Regenerates on workbook changes until the event channel closes
pub struct WatchLoop<R> {
    debouncer: Debouncer,
    regenerator: R,
    regenerations: usize,
}

impl<R: Regenerator> WatchLoop<R> {
    pub fn new(regenerator: R) -> Self {
        Self {
            debouncer: Debouncer::new(),
            regenerator,
            regenerations: 0,
        }
    }

    /// Consume events until every sender is gone
    ///
    /// Returns the number of regenerations started.
    pub fn run(&mut self, events: Receiver<WatchEvent>) -> usize {
        for event in events {
            match event {
                Ok(event) => {
                    self.handle(&event);
                }
                Err(e) => warn!("watch error: {e}"),
            }
        }
        self.regenerations
    }

    /// Handle one filesystem event; `true` when it triggered a regeneration
    pub fn handle(&mut self, event: &notify::Event) -> bool {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return false;
        }

        let mut changed = false;
        for path in &event.paths {
            let is_workbook = path
                .file_name()
                .is_some_and(|name| is_workbook_file(&name.to_string_lossy()));
            if !is_workbook {
                continue;
            }

            match std::fs::metadata(path).and_then(|m| m.modified()) {
                Ok(modified) => {
                    if self.debouncer.observe(path, modified) {
                        info!(file = %path.display(), "workbook changed");
                        changed = true;
                    } else {
                        debug!(file = %path.display(), "modification time unchanged, skipped");
                    }
                }
                Err(e) => warn!(file = %path.display(), "cannot read modification time: {e}"),
            }
        }

        if changed {
            self.regenerations += 1;
            if let Err(e) = self.regenerator.regenerate() {
                error!("regeneration failed: {e}");
            }
        }
        changed
    }

    /// Regenerations started so far
    pub fn regenerations(&self) -> usize {
        self.regenerations
    }
}
