//! Worksheet type

use crate::cell::{CellAddress, CellRange, CellStorage, CellValue};
use crate::error::{Axis, Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

static EMPTY: CellValue = CellValue::Empty;

/// One titled grid of a workbook
#[derive(Debug)]
pub struct Worksheet {
    /// Tab title, as stored in the file
    name: String,
    cells: CellStorage,
}

impl Worksheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value at an A1 address, cloned
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.value_at(addr.row, addr.col).clone())
    }

    /// Value at 0-based indices; missing cells read as `Empty`
    pub fn value_at(&self, row: u32, col: u16) -> &CellValue {
        self.cells.get(row, col).unwrap_or(&EMPTY)
    }

    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        check_position(row, col)?;
        self.cells.set(row, col, value.into());
        Ok(())
    }

    /// Fill `row` from column A onwards
    pub fn set_row_values<I, V>(&mut self, row: u32, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        for (index, value) in values.into_iter().enumerate() {
            let col = u16::try_from(index).map_err(|_| Error::OutOfBounds {
                axis: Axis::Column,
                index: index as u64,
                limit: MAX_COLS.into(),
            })?;
            self.set_cell_value_at(row, col, value)?;
        }
        Ok(())
    }

    /// Smallest range holding every non-empty cell
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells.bounds().map(|(first_row, first_col, last_row, last_col)| {
            CellRange::new(
                CellAddress::new(first_row, first_col),
                CellAddress::new(last_row, last_col),
            )
        })
    }

    /// Index of the last row holding a value
    pub fn last_row(&self) -> Option<u32> {
        self.used_range().map(|r| r.end.row)
    }

    /// Index of the last column holding a value
    pub fn last_column(&self) -> Option<u16> {
        self.used_range().map(|r| r.end.col)
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-empty cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.cells.iter()
    }

    /// Non-empty cells of one row, left to right
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (u16, &CellValue)> {
        self.cells.row(row)
    }
}

fn check_position(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::OutOfBounds {
            axis: Axis::Row,
            index: row.into(),
            limit: MAX_ROWS.into(),
        });
    }
    if col >= MAX_COLS {
        return Err(Error::OutOfBounds {
            axis: Axis::Column,
            index: col.into(),
            limit: MAX_COLS.into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("#Item");
        assert_eq!(ws.name(), "#Item");
        assert!(ws.is_empty());
        assert_eq!(ws.last_row(), None);
        assert_eq!(ws.used_range(), None);
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Test");

        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B1", 42.0).unwrap();
        ws.set_cell_value("C1", true).unwrap();

        assert_eq!(ws.get_value("A1").unwrap().as_string(), Some("Hello"));
        assert_eq!(ws.get_value("B1").unwrap().as_number(), Some(42.0));
        assert_eq!(ws.get_value("C1").unwrap().as_bool(), Some(true));
        assert!(ws.value_at(9, 9).is_empty());
    }

    #[test]
    fn test_used_range() {
        let mut ws = Worksheet::new("Test");

        ws.set_cell_value_at(5, 3, "A").unwrap();
        ws.set_cell_value_at(10, 7, "B").unwrap();

        let range = ws.used_range().unwrap();
        assert_eq!(range.to_string(), "D6:H11");
        assert_eq!(ws.last_row(), Some(10));
        assert_eq!(ws.last_column(), Some(7));
    }

    #[test]
    fn test_set_row_values() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_values(0, ["id", "name", "cost"]).unwrap();
        ws.set_row_values(1, [CellValue::Empty, CellValue::from(3)])
            .unwrap();

        assert_eq!(ws.cell_count(), 4);
        assert_eq!(ws.get_value("C1").unwrap().as_string(), Some("cost"));
        let second: Vec<u16> = ws.row_cells(1).map(|(col, _)| col).collect();
        assert_eq!(second, vec![1]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Test");
        assert!(matches!(
            ws.set_cell_value_at(MAX_ROWS, 0, 1.0),
            Err(Error::OutOfBounds { axis: Axis::Row, .. })
        ));
        assert!(matches!(
            ws.set_cell_value_at(0, MAX_COLS, 1.0),
            Err(Error::OutOfBounds {
                axis: Axis::Column,
                ..
            })
        ));
    }
}
