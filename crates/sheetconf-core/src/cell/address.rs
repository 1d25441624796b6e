//! A1-style cell addresses and the rectangular ranges they bound

use crate::error::{Axis, Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell location; 0-based indices, shown as `B7`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse A1 notation; `$` anchors are accepted and dropped
    ///
    /// ```
    /// use sheetconf_core::CellAddress;
    ///
    /// assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
    /// assert_eq!(CellAddress::parse("$B$2").unwrap(), CellAddress::new(1, 1));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let digits_at = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::address(text, "no row number"))?;
        let (letters, digits) = text.split_at(digits_at);

        let letters = letters.strip_prefix('$').unwrap_or(letters);
        let letters = letters.strip_suffix('$').unwrap_or(letters);
        if letters.is_empty() {
            return Err(Error::address(text, "no column letters"));
        }
        let col = Self::letters_to_column(letters)?;

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::address(text, "row is not a number"))?;
        let row = row
            .checked_sub(1)
            .ok_or_else(|| Error::address(text, "rows start at 1"))?;
        if row >= MAX_ROWS {
            return Err(Error::OutOfBounds {
                axis: Axis::Row,
                index: row.into(),
                limit: MAX_ROWS.into(),
            });
        }

        Ok(Self { row, col })
    }

    /// Column letters for a 0-based index: 0 is `A`, 26 is `AA`
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = u32::from(col) + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// 0-based index of column letters, case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        let mut number: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::address(letters, format!("'{c}' is not a column letter")));
            }
            number = number * 26 + u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            if number > u32::from(MAX_COLS) {
                return Err(Error::OutOfBounds {
                    axis: Axis::Column,
                    index: u64::from(number - 1),
                    limit: MAX_COLS.into(),
                });
            }
        }
        match number {
            0 => Err(Error::address(letters, "no column letters")),
            n => Ok((n - 1) as u16),
        }
    }

    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangle of cells, `start` top-left and `end` bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Range spanned by two corners given in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple() {
        let addr = CellAddress::parse("C7").unwrap();
        assert_eq!(addr, CellAddress::new(6, 2));
        assert_eq!(addr.to_string(), "C7");
        assert_eq!("c7".parse::<CellAddress>().unwrap(), addr);
    }

    #[test]
    fn test_parse_absolute_markers_ignored() {
        assert_eq!(
            CellAddress::parse("$AA$10").unwrap(),
            CellAddress::new(9, 26)
        );
    }

    #[test]
    fn test_parse_invalid() {
        for text in ["", "12", "A", "A0", "A1B", "$$A1", "Ä1"] {
            assert!(
                matches!(CellAddress::parse(text), Err(Error::InvalidAddress { .. })),
                "{text:?} should not parse"
            );
        }
        assert!(matches!(
            CellAddress::parse("XFE1"),
            Err(Error::OutOfBounds {
                axis: Axis::Column,
                ..
            })
        ));
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::OutOfBounds { axis: Axis::Row, .. })
        ));
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
        assert_eq!(CellAddress::letters_to_column("xfd").unwrap(), 16383);
        for col in [0, 1, 25, 26, 27, 701, 702, 16383] {
            let letters = CellAddress::column_to_letters(col);
            assert_eq!(CellAddress::letters_to_column(&letters).unwrap(), col);
        }
    }

    #[test]
    fn test_range_normalizes() {
        let range = CellRange::new(CellAddress::new(4, 3), CellAddress::new(1, 0));
        assert_eq!(range.to_string(), "A2:D5");
    }
}
