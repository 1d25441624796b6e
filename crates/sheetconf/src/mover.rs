//! Copying generated directories to their deployment destinations

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::schema::Target;

/// Copies a directory tree into another
pub trait FileMover {
    /// Copy the contents of `from` into `to`, merging with what `to` holds
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()>;
}

/// [`FileMover`] on the real filesystem
///
/// Existing files in the destination are overwritten, other files are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirMover;

impl FileMover for DirMover {
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        debug!(from = %from.display(), to = %to.display(), "copying");

        let move_error = |message: String| Error::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            message,
        };

        if !from.is_dir() {
            return Err(move_error("source is not a directory".into()));
        }
        fs::create_dir_all(to).map_err(|e| move_error(e.to_string()))?;

        let mut options = fs_extra::dir::CopyOptions::new();
        options.overwrite = true;
        options.content_only = true;
        fs_extra::dir::copy(from, to, &options).map_err(|e| move_error(e.to_string()))?;
        Ok(())
    }
}

/// Copy the generated directories of `target` to the destinations listed in
/// the configuration's move section
///
/// Returns the number of destinations updated; a target without rules is a
/// no-op.
pub fn move_target(config: &Config, target: Target, mover: &dyn FileMover) -> Result<usize> {
    let Some(rules) = config.move_to.as_ref().and_then(|m| m.rules(target)) else {
        return Ok(0);
    };

    let mut updated = 0;
    for (format, destinations) in rules {
        let source = config.output_dir(target, *format);
        // A format that was not generated still yields an (empty) directory
        fs::create_dir_all(&source)?;

        for destination in destinations {
            mover.copy_tree(&source, destination)?;
            updated += 1;
        }
    }

    info!(view = %target, destinations = updated, "generated files moved");
    Ok(updated)
}
