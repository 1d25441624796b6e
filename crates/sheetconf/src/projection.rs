//! Row projection: one data row into a client row and a server row

use sheetconf_core::Worksheet;

use crate::document::RowObject;
use crate::schema::{Schema, Target};
use crate::typing::{coerce, TypingError};

/// A cell of the row could not be typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionError {
    /// Key of the offending column
    pub key: String,
    pub error: TypingError,
}

/// Type every exported cell of `row` and split the values by visibility
///
/// Returns `(client, server)`. Ignored columns are not part of the schema,
/// so their cells are never looked at.
pub fn project_row(
    schema: &Schema,
    worksheet: &Worksheet,
    row: u32,
) -> Result<(RowObject, RowObject), ProjectionError> {
    let mut client = RowObject::new();
    let mut server = RowObject::new();

    for column in schema.columns() {
        let value = coerce(column.column_type, worksheet.value_at(row, column.index)).map_err(
            |error| ProjectionError {
                key: column.key.clone(),
                error,
            },
        )?;

        if column.visibility.includes(Target::Server) {
            server.insert(column.key.clone(), value.clone());
        }
        if column.visibility.includes(Target::Client) {
            client.insert(column.key.clone(), value);
        }
    }

    Ok((client, server))
}
