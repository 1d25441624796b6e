//! Writing encoded documents to disk

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::format::Format;

/// Writes documents into per-format output directories
pub struct Emitter;

impl Emitter {
    /// Encode `document` and write it to `dir/<name>.<ext>`
    ///
    /// Creates `dir` when missing and replaces an existing file. Returns the
    /// path written.
    pub fn emit(name: &str, document: &Document, dir: &Path, format: Format) -> Result<PathBuf> {
        let content = format.encode(document).map_err(|e| Error::Encode {
            name: name.to_string(),
            format,
            message: e.0,
        })?;

        fs::create_dir_all(dir)?;
        let path = Self::output_path(name, dir, format);
        fs::write(&path, content)?;

        tracing::debug!(path = %path.display(), "written");
        Ok(path)
    }

    /// Path of the file [`Emitter::emit`] writes for `name`
    pub fn output_path(name: &str, dir: &Path, format: Format) -> PathBuf {
        dir.join(format!("{}.{}", name, format.extension()))
    }
}
