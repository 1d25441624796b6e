//! What a cell holds

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Evaluated content of one cell
///
/// Formula cells arrive as their cached result; nothing here knows about the
/// formula text itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Boolean(bool),
    /// Dates and times are serial numbers too
    Number(f64),
    String(SharedString),
    Error(CellError),
}

/// Largest magnitude an `f64` holds with integer precision
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

impl CellValue {
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        Self::String(SharedString::new(s))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// No value at all, or a zero-length string
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Blank, `0` or `FALSE`
    pub fn is_falsy(&self) -> bool {
        match *self {
            Self::Boolean(b) => !b,
            Self::Number(n) => n == 0.0,
            ref other => other.is_blank(),
        }
    }

    /// Numeric reading; booleans count as 1 and 0
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Self::Number(n) => Some(n),
            Self::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Numeric reading without a fractional part
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number()
            .filter(|n| n.is_finite() && n.fract() == 0.0 && n.abs() < EXACT_INTEGER_LIMIT)
            .map(|n| n as i64)
    }

    /// Boolean reading; any non-zero number is true
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(b) => Some(b),
            Self::Number(n) => Some(n != 0.0),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Kind of value, for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Error(_) => "error",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Number(n) => fmt::Display::fmt(n, f),
            Self::String(s) => f.write_str(s),
            Self::Error(e) => f.write_str(e.as_str()),
        }
    }
}

macro_rules! cell_value_from {
    ($($t:ty => |$v:ident| $make:expr),* $(,)?) => {
        $(
            impl From<$t> for CellValue {
                fn from($v: $t) -> Self {
                    $make
                }
            }
        )*
    };
}

cell_value_from! {
    bool => |b| CellValue::Boolean(b),
    i32 => |n| CellValue::Number(f64::from(n)),
    u32 => |n| CellValue::Number(f64::from(n)),
    i64 => |n| CellValue::Number(n as f64),
    f64 => |n| CellValue::Number(n),
    &str => |s| CellValue::string(s),
    String => |s| CellValue::string(s),
    CellError => |e| CellValue::Error(e),
}

/// Error value cached in a cell, such as `#REF!`
///
/// A config sheet normally holds none; when one slips through it is reported
/// with its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    Na,
}

impl CellError {
    /// Every error value with its spreadsheet spelling
    const ALL: [(CellError, &'static str); 7] = [
        (CellError::Null, "#NULL!"),
        (CellError::Div0, "#DIV/0!"),
        (CellError::Value, "#VALUE!"),
        (CellError::Ref, "#REF!"),
        (CellError::Name, "#NAME?"),
        (CellError::Num, "#NUM!"),
        (CellError::Na, "#N/A"),
    ];

    /// Spreadsheet spelling, e.g. `#DIV/0!`
    pub fn as_str(&self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(error, _)| error == self)
            .map_or("#N/A", |(_, text)| text)
    }

    /// Parse a spelling, ignoring ASCII case
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, text)| text.eq_ignore_ascii_case(s))
            .map(|(error, _)| *error)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable string shared between cells
///
/// Entries of a workbook's shared string table are handed to every cell
/// that refers to them without copying.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedString(Arc<str>);

impl SharedString {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SharedString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
