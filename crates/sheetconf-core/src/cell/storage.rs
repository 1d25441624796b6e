//! Sparse cell storage
//!
//! Only non-empty cells are kept, keyed by `(row, column)`. Tuple ordering
//! makes iteration row-major without a per-row map.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::CellValue;

/// Sparse row-major storage for worksheet cells
#[derive(Debug, Default)]
pub struct CellStorage {
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl CellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Store a value; storing `Empty` removes the cell
    pub fn set(&mut self, row: u32, col: u16, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(first row, first column, last row, last column)` over the stored
    /// cells
    pub fn bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let (&(first_row, _), _) = self.cells.first_key_value()?;
        let (&(last_row, _), _) = self.cells.last_key_value()?;
        let (first_col, last_col) = self
            .cells
            .keys()
            .fold((u16::MAX, 0), |(lo, hi), &(_, col)| (lo.min(col), hi.max(col)));
        Some((first_row, first_col, last_row, last_col))
    }

    /// All cells, row by row
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.cells.iter().map(|(&(row, col), value)| (row, col, value))
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u32) -> impl Iterator<Item = (u16, &CellValue)> {
        let span: RangeInclusive<(u32, u16)> = (row, 0)..=(row, u16::MAX);
        self.cells.range(span).map(|(&(_, col), value)| (col, value))
    }
}
