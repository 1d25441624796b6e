//! Cell typing: raw cell values to typed output values
//!
//! A *falsy* cell (empty, empty string, numeric zero or FALSE) yields the
//! default of its column type. Other values are converted, or rejected when
//! they cannot represent the declared type.

use serde_json::{Number, Value};
use sheetconf_core::CellValue;
use thiserror::Error;

use crate::schema::ColumnType;

/// Why a cell could not be typed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    /// The value cannot represent the declared type
    #[error("expected {expected}, found {found}")]
    InvalidValue { expected: ColumnType, found: String },

    /// A `json` cell does not hold valid JSON text
    #[error("{0}")]
    InvalidJson(String),
}

/// Default value of a column type, used for falsy cells
pub fn default_value(column_type: ColumnType) -> Value {
    match column_type {
        ColumnType::Int => Value::from(0),
        ColumnType::Float => Value::from(0.0),
        ColumnType::String => Value::from(""),
        ColumnType::Bool => Value::Bool(false),
        ColumnType::Json => Value::Object(serde_json::Map::new()),
        ColumnType::Untyped => Value::Null,
    }
}

/// Convert a cell as-is: integral numbers become integers, error cells their
/// display text
pub fn raw_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Boolean(b) => Value::Bool(*b),
        CellValue::Number(n) => match cell.as_integer() {
            Some(i) => Value::from(i),
            None => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        },
        CellValue::String(s) => Value::from(s.as_str()),
        CellValue::Error(e) => Value::from(e.as_str()),
    }
}

/// Type a cell according to its column's declared type
pub fn coerce(column_type: ColumnType, cell: &CellValue) -> Result<Value, TypingError> {
    if column_type == ColumnType::Untyped {
        return Ok(raw_value(cell));
    }
    if cell.is_falsy() {
        return Ok(default_value(column_type));
    }

    let invalid = || TypingError::InvalidValue {
        expected: column_type,
        found: describe(cell),
    };

    match column_type {
        ColumnType::Int => parse_int(cell).map(Value::from).ok_or_else(invalid),
        ColumnType::Float => parse_float(cell)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        ColumnType::Bool => parse_bool(cell).map(Value::Bool).ok_or_else(invalid),
        ColumnType::String => Ok(raw_value(cell)),
        ColumnType::Json => match cell {
            CellValue::String(s) => {
                serde_json::from_str(s.as_str()).map_err(|e| TypingError::InvalidJson(e.to_string()))
            }
            CellValue::Error(e) => Err(TypingError::InvalidJson(format!(
                "cell holds the error {}",
                e
            ))),
            other => Ok(raw_value(other)),
        },
        ColumnType::Untyped => Ok(raw_value(cell)),
    }
}

fn parse_int(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(_) | CellValue::Boolean(_) => cell.as_integer(),
        CellValue::String(s) => {
            let text = s.as_str().trim();
            text.parse::<i64>().ok().or_else(|| {
                let n = text.parse::<f64>().ok()?;
                CellValue::Number(n).as_integer()
            })
        }
        _ => None,
    }
}

fn parse_float(cell: &CellValue) -> Option<f64> {
    let n = match cell {
        CellValue::Number(_) | CellValue::Boolean(_) => cell.as_number()?,
        CellValue::String(s) => s.as_str().trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_bool(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Boolean(_) | CellValue::Number(_) => cell.as_bool(),
        CellValue::String(s) => match s.as_str().trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn describe(cell: &CellValue) -> String {
    match cell {
        CellValue::String(s) => format!("{} {:?}", cell.type_name(), s.as_str()),
        other => format!("{} {}", other.type_name(), other),
    }
}
