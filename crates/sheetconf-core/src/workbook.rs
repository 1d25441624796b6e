//! Workbook type

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters a sheet title cannot contain
const FORBIDDEN_IN_TITLE: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Worksheets in tab order
#[derive(Debug, Default)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// A workbook without worksheets
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Worksheet with exactly this title
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Worksheets in tab order
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Append a worksheet titled `name` and hand it back for filling
    ///
    /// Titles follow the spreadsheet rules: 1 to 31 characters, none of
    /// `: \ / ? * [ ]`, unique within the workbook ignoring case.
    pub fn push_worksheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.check_title(name)?;
        let index = self.worksheets.len();
        self.worksheets.push(Worksheet::new(name));
        Ok(&mut self.worksheets[index])
    }

    fn check_title(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidSheetName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("title is empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(invalid(format!(
                "longer than {MAX_SHEET_NAME_LEN} characters"
            )));
        }
        if let Some(c) = name.chars().find(|c| FORBIDDEN_IN_TITLE.contains(c)) {
            return Err(invalid(format!("'{c}' is not allowed")));
        }

        let folded = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == folded)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_worksheets_in_order() {
        let mut wb = Workbook::empty();
        wb.push_worksheet("#Item").unwrap();
        wb.push_worksheet("notes").unwrap();

        let titles: Vec<&str> = wb.worksheets().map(|ws| ws.name()).collect();
        assert_eq!(titles, vec!["#Item", "notes"]);
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_duplicate_title_ignores_case() {
        let mut wb = Workbook::empty();
        wb.push_worksheet("#Item").unwrap();

        assert!(matches!(
            wb.push_worksheet("#ITEM"),
            Err(Error::DuplicateSheetName(_))
        ));
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_invalid_title() {
        let mut wb = Workbook::empty();
        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);

        for name in ["", "Sheet/1", "Sheet[1]", long_name.as_str()] {
            assert!(
                matches!(wb.push_worksheet(name), Err(Error::InvalidSheetName { .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(wb.is_empty());
    }

    #[test]
    fn test_fill_pushed_worksheet() {
        let mut wb = Workbook::empty();
        wb.push_worksheet("#Data")
            .unwrap()
            .set_cell_value("A1", "id")
            .unwrap();

        let sheet = wb.worksheet_by_name("#Data").unwrap();
        assert_eq!(sheet.cell_count(), 1);
        assert!(wb.worksheet_by_name("Data").is_none());
    }
}
