//! Output formats
//!
//! The set of formats is closed: adding one means adding a variant, an entry
//! in [`Format::ALL`] and an encoder module.

mod json;
mod lua;
mod xml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;

pub use lua::{is_lua_identifier, lua_string};

/// An output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Compact JSON
    Json,
    /// A Lua chunk returning a table literal
    Lua,
    /// XML with an `xml` root element
    Xml,
}

impl Format {
    /// Every format, in generation order
    pub const ALL: [Format; 3] = [Format::Json, Format::Lua, Format::Xml];

    /// File extension, which is also the output directory name
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Lua => "lua",
            Format::Xml => "xml",
        }
    }

    /// Encode a document
    ///
    /// Encoding is deterministic: equal documents give identical text.
    pub fn encode(self, document: &Document) -> Result<String, EncodeError> {
        match self {
            Format::Json => json::encode(document),
            Format::Lua => Ok(lua::encode(document)),
            Format::Xml => xml::encode(document),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown format '{}' (expected json, lua or xml)", s))
    }
}

/// An encoder failed; carries the underlying serializer's message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError(pub String);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for EncodeError {}
