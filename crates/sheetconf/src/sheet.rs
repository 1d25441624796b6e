//! Sheet processing: one worksheet into a client and a server document

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use serde_json::Value;
use sheetconf_core::{CellValue, Worksheet};

use crate::document::{Document, RowKey};
use crate::error::{Error, Result};
use crate::projection::project_row;
use crate::schema::{ColumnType, Schema, Target, FIRST_DATA_ROW};
use crate::typing::{coerce, TypingError};

/// The generated content of one exported sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    /// Sheet name (worksheet title without its `#` marker)
    pub name: String,
    /// Workbook the sheet was read from
    pub source: PathBuf,
    pub client: Document,
    pub server: Document,
}

impl SheetData {
    /// The document generated for `target`
    pub fn view(&self, target: Target) -> &Document {
        match target {
            Target::Client => &self.client,
            Target::Server => &self.server,
        }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.client.len()
    }
}

/// Validate a worksheet and build its client and server documents
///
/// Fails on the first invalid key, duplicate key, duplicate id or
/// untypeable cell.
pub fn process_sheet(file: &Path, name: &str, worksheet: &Worksheet) -> Result<SheetData> {
    let schema = Schema::from_worksheet(file, name, worksheet)?;

    let mut client = Document::new();
    let mut server = Document::new();
    // Ids are compared by their text form, which is what ends up in the output
    let mut rows_by_id: AHashMap<String, u32> = AHashMap::new();

    let last_row = worksheet.last_row().unwrap_or(0);
    for row in FIRST_DATA_ROW..=last_row {
        let id_cell = worksheet.value_at(row, 0);
        if id_cell.is_blank() {
            continue;
        }

        let id = row_key(schema.id_type(), id_cell).map_err(|error| match error {
            TypingError::InvalidValue { expected, found } => Error::InvalidValue {
                file: file.to_path_buf(),
                sheet: name.to_string(),
                row: row + 1,
                key: id_key(&schema),
                expected,
                found,
            },
            TypingError::InvalidJson(message) => Error::InvalidJson {
                file: file.to_path_buf(),
                sheet: name.to_string(),
                id: RowKey::Text(id_cell.to_string()),
                key: id_key(&schema),
                message,
            },
        })?;

        if rows_by_id.insert(id.to_string(), row).is_some() {
            return Err(Error::DuplicateId {
                file: file.to_path_buf(),
                sheet: name.to_string(),
                id,
                row: row + 1,
            });
        }

        let (client_row, server_row) =
            project_row(&schema, worksheet, row).map_err(|e| match e.error {
                TypingError::InvalidJson(message) => Error::InvalidJson {
                    file: file.to_path_buf(),
                    sheet: name.to_string(),
                    id: id.clone(),
                    key: e.key,
                    message,
                },
                TypingError::InvalidValue { expected, found } => Error::InvalidValue {
                    file: file.to_path_buf(),
                    sheet: name.to_string(),
                    row: row + 1,
                    key: e.key,
                    expected,
                    found,
                },
            })?;

        client.insert(id.clone(), Value::Object(client_row));
        server.insert(id, Value::Object(server_row));
    }

    tracing::debug!(
        file = %file.display(),
        sheet = name,
        rows = client.len(),
        columns = schema.columns().len(),
        "sheet processed"
    );

    Ok(SheetData {
        name: name.to_string(),
        source: file.to_path_buf(),
        client,
        server,
    })
}

/// Identifier of a data row from its first-column cell
///
/// An `int` id column coerces the cell; any other column keeps the scalar,
/// turning integral numbers into integer ids.
fn row_key(id_type: ColumnType, cell: &CellValue) -> std::result::Result<RowKey, TypingError> {
    if id_type == ColumnType::Int {
        let value = coerce(ColumnType::Int, cell)?;
        return value.as_i64().map(RowKey::Int).ok_or(TypingError::InvalidValue {
            expected: ColumnType::Int,
            found: value.to_string(),
        });
    }

    Ok(match cell {
        CellValue::Number(_) => match cell.as_integer() {
            Some(n) => RowKey::Int(n),
            None => RowKey::Text(cell.to_string()),
        },
        CellValue::Boolean(b) => RowKey::Text(b.to_string()),
        other => RowKey::Text(other.to_string()),
    })
}

/// Key of the id column for error messages (it may be a comment column)
fn id_key(schema: &Schema) -> String {
    schema
        .columns()
        .first()
        .filter(|c| c.index == 0)
        .map_or_else(|| "A".to_string(), |c| c.key.clone())
}
