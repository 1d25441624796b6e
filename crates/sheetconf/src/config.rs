//! Configuration file
//!
//! ```json
//! {
//!   "input": "excel",
//!   "output": "out",
//!   "formats": ["json", "lua", "xml"],
//!   "move": {
//!     "client": { "lua": ["../client/config"] },
//!     "server": { "json": ["../server/config"] }
//!   }
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::format::Format;
use crate::schema::Target;

/// Destinations per format for one target
pub type MoveRules = IndexMap<Format, Vec<PathBuf>>;

/// Where generated directories are copied after a run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoveConfig {
    #[serde(default)]
    pub client: Option<MoveRules>,
    #[serde(default)]
    pub server: Option<MoveRules>,
}

impl MoveConfig {
    /// Rules for `target`, if the section has any
    pub fn rules(&self, target: Target) -> Option<&MoveRules> {
        match target {
            Target::Client => self.client.as_ref(),
            Target::Server => self.server.as_ref(),
        }
    }

    fn paths_mut(&mut self) -> impl Iterator<Item = &mut PathBuf> {
        self.client
            .iter_mut()
            .chain(self.server.iter_mut())
            .flat_map(|rules| rules.values_mut())
            .flat_map(|paths| paths.iter_mut())
    }
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Directory searched for workbooks
    pub input: PathBuf,
    /// Root of the generated trees
    pub output: PathBuf,
    /// Formats to generate
    #[serde(default = "all_formats")]
    pub formats: Vec<Format>,
    #[serde(default, rename = "move")]
    pub move_to: Option<MoveConfig>,
}

fn all_formats() -> Vec<Format> {
    Format::ALL.to_vec()
}

impl Config {
    /// Create a configuration generating every format, without a move section
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            formats: all_formats(),
            move_to: None,
        }
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(config_path = %path.display(), "loading configuration");

        if !path.is_file() {
            error!(config_path = %path.display(), "configuration file not found");
            return Err(Error::MissingConfig(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_json(&content, base).map_err(|e| match e {
            Error::InvalidConfig { message, .. } => Error::InvalidConfig {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse a configuration, resolving relative paths against `base`
    pub fn from_json(content: &str, base: &Path) -> Result<Self> {
        let invalid = |message: String| Error::InvalidConfig {
            path: PathBuf::new(),
            message,
        };

        let mut config: Config =
            serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

        if config.formats.is_empty() {
            return Err(invalid("\"formats\" must name at least one format".into()));
        }

        config.input = resolve(base, &config.input);
        config.output = resolve(base, &config.output);
        if let Some(move_to) = config.move_to.as_mut() {
            for path in move_to.paths_mut() {
                *path = resolve(base, path);
            }
        }

        Ok(config)
    }

    /// Selected formats in generation order, without repeats
    pub fn formats(&self) -> Vec<Format> {
        Format::ALL
            .into_iter()
            .filter(|f| self.formats.contains(f))
            .collect()
    }

    /// Directory a target's files of one format are generated into
    pub fn output_dir(&self, target: Target, format: Format) -> PathBuf {
        self.output.join(target.as_str()).join(format.extension())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_json(r#"{"input": "excel", "output": "out"}"#, Path::new("/proj"))
            .unwrap();

        assert_eq!(config.input, PathBuf::from("/proj/excel"));
        assert_eq!(config.output, PathBuf::from("/proj/out"));
        assert_eq!(config.formats(), Format::ALL.to_vec());
        assert_eq!(config.move_to, None);
        assert_eq!(
            config.output_dir(Target::Server, Format::Lua),
            PathBuf::from("/proj/out/server/lua")
        );
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_json(
            r#"{
                "input": "/abs/excel",
                "output": "out",
                "formats": ["xml", "json", "xml"],
                "move": {
                    "client": {"lua": ["../client/config", "/deploy/lua"]},
                    "server": {"json": ["../server"]}
                },
                "comment": "unknown fields are ignored"
            }"#,
            Path::new("/proj/tools"),
        )
        .unwrap();

        assert_eq!(config.input, PathBuf::from("/abs/excel"));
        assert_eq!(config.formats(), vec![Format::Json, Format::Xml]);

        let move_to = config.move_to.unwrap();
        let client = move_to.rules(Target::Client).unwrap();
        assert_eq!(
            client[&Format::Lua],
            vec![
                PathBuf::from("/proj/tools/../client/config"),
                PathBuf::from("/deploy/lua")
            ]
        );
        assert_eq!(
            move_to.rules(Target::Server).unwrap()[&Format::Json],
            vec![PathBuf::from("/proj/tools/../server")]
        );
    }

    #[test]
    fn test_invalid_config() {
        for content in [
            r#"{"output": "out"}"#,
            r#"{"input": "a", "output": "b", "formats": ["yaml"]}"#,
            r#"{"input": "a", "output": "b", "formats": []}"#,
            "not json",
        ] {
            let err = Config::from_json(content, Path::new("")).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }), "{content}");
        }
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"input": "excel", "output": "out"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.input, dir.path().join("excel"));

        fs::write(&path, "{").unwrap();
        match Config::load(&path).unwrap_err() {
            Error::InvalidConfig { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(_)));
    }
}
