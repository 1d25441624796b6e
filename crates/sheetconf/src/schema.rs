//! Column declarations derived from a sheet's header rows
//!
//! Row 1 carries the keys, row 2 the declared types. A key's first character
//! selects who sees the column: `#` hides it from everyone, `!` keeps it on
//! the server, `$` keeps it on the client, anything else goes to both.

use std::fmt;
use std::path::Path;

use ahash::AHashSet;
use lazy_regex::regex_is_match;
use sheetconf_core::{CellAddress, CellValue, Worksheet};

use crate::error::{Error, Result};

/// Row holding the field keys (0-based)
pub const KEY_ROW: u32 = 0;

/// Row holding the declared types (0-based)
pub const TYPE_ROW: u32 = 1;

/// First data row (0-based); the row above it is reserved for descriptions
pub const FIRST_DATA_ROW: u32 = 3;

/// Output tree a value is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Client,
    Server,
}

impl Target {
    /// Both targets, in generation order
    pub const ALL: [Target; 2] = [Target::Client, Target::Server];

    /// Directory name of the target below the output directory
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Client => "client",
            Target::Server => "server",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which targets see a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    ClientOnly,
    ServerOnly,
    Both,
}

impl Visibility {
    /// Check if values of this column go to `target`
    pub fn includes(self, target: Target) -> bool {
        !matches!(
            (self, target),
            (Visibility::ClientOnly, Target::Server) | (Visibility::ServerOnly, Target::Client)
        )
    }
}

/// Declared type of a column, read from the type row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Float,
    String,
    Bool,
    Json,
    /// No type or an unknown type name: values pass through unchanged
    Untyped,
}

impl ColumnType {
    /// Parse a type name; names are matched exactly
    pub fn parse(name: &str) -> Self {
        match name {
            "int" => ColumnType::Int,
            "float" => ColumnType::Float,
            "string" => ColumnType::String,
            "bool" => ColumnType::Bool,
            "json" => ColumnType::Json,
            _ => ColumnType::Untyped,
        }
    }

    /// Read the declared type from a type-row cell
    pub fn from_cell(cell: &CellValue) -> Self {
        cell.as_string().map_or(ColumnType::Untyped, Self::parse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Bool => "bool",
            ColumnType::Json => "json",
            ColumnType::Untyped => "untyped",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a header cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyClass {
    /// Empty header or comment column; never typed, never emitted
    Ignored,
    /// A field with its canonical (sigil-stripped) key
    Field { key: String, visibility: Visibility },
}

/// Classify a header by its leading sigil
///
/// The returned key is not validated; see [`is_valid_key`].
pub fn classify_key(header: &str) -> KeyClass {
    let field = |key: &str, visibility| KeyClass::Field {
        key: key.to_string(),
        visibility,
    };

    if header.is_empty() || header.starts_with('#') {
        KeyClass::Ignored
    } else if let Some(key) = header.strip_prefix('!') {
        field(key, Visibility::ServerOnly)
    } else if let Some(key) = header.strip_prefix('$') {
        field(key, Visibility::ClientOnly)
    } else {
        field(header, Visibility::Both)
    }
}

/// Check a canonical key against the identifier grammar `[A-Za-z0-9]+`
pub fn is_valid_key(key: &str) -> bool {
    regex_is_match!(r"^[A-Za-z0-9]+$", key)
}

/// Text of a header cell; integral numbers lose their fraction
pub fn header_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(_) => match cell.as_integer() {
            Some(n) => n.to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

/// One exported column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column index (0-based)
    pub index: u16,
    pub key: String,
    pub column_type: ColumnType,
    pub visibility: Visibility,
}

/// Column declarations of one sheet, classified once and reused per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
    id_type: ColumnType,
    width: u16,
}

impl Schema {
    /// Build the schema from the key and type rows of a worksheet
    ///
    /// `file` and `sheet` only serve the error messages.
    pub fn from_worksheet(file: &Path, sheet: &str, worksheet: &Worksheet) -> Result<Self> {
        let width = worksheet.last_column().map_or(0, |col| col + 1);
        let mut columns = Vec::new();
        let mut seen = AHashSet::new();

        for index in 0..width {
            let header = header_text(worksheet.value_at(KEY_ROW, index));
            let KeyClass::Field { key, visibility } = classify_key(&header) else {
                continue;
            };

            if !is_valid_key(&key) {
                return Err(Error::InvalidKey {
                    file: file.to_path_buf(),
                    sheet: sheet.to_string(),
                    column: CellAddress::column_to_letters(index),
                    key: header,
                });
            }
            if !seen.insert(key.clone()) {
                return Err(Error::DuplicateKey {
                    file: file.to_path_buf(),
                    sheet: sheet.to_string(),
                    key,
                });
            }

            columns.push(Column {
                index,
                key,
                column_type: ColumnType::from_cell(worksheet.value_at(TYPE_ROW, index)),
                visibility,
            });
        }

        Ok(Self {
            columns,
            id_type: ColumnType::from_cell(worksheet.value_at(TYPE_ROW, 0)),
            width,
        })
    }

    /// Exported columns in sheet order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Declared type of the first column, which holds the row identifiers
    pub fn id_type(&self) -> ColumnType {
        self.id_type
    }

    /// Number of columns spanned by the sheet, ignored ones included
    pub fn width(&self) -> u16 {
        self.width
    }
}
