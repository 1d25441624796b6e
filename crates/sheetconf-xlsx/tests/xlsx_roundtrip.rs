//! End-to-end tests for the XLSX writer and reader (create -> save -> read -> verify)

use pretty_assertions::assert_eq;
use sheetconf_core::{CellError, CellValue, Workbook};
use sheetconf_xlsx::{XlsxReader, XlsxWriter};
use std::io::Cursor;

fn roundtrip(workbook: &Workbook) -> Workbook {
    let mut buf = Vec::new();
    XlsxWriter::write(workbook, Cursor::new(&mut buf)).unwrap();
    XlsxReader::read(Cursor::new(&buf)).unwrap()
}

/// A typical configuration sheet: keys, types, a comment row, data rows
#[test]
fn test_roundtrip_config_sheet() {
    let mut wb = Workbook::empty();
    let sheet = wb.push_worksheet("#Item").unwrap();
    sheet
        .set_row_values(0, ["id", "$displayName", "!cost", "#note"])
        .unwrap();
    sheet
        .set_row_values(1, ["int", "string", "int", "string"])
        .unwrap();
    sheet
        .set_row_values(2, ["Id", "Name shown to players", "Gold", "Notes"])
        .unwrap();
    sheet
        .set_row_values(
            3,
            [
                CellValue::from(1),
                CellValue::from("Sword"),
                CellValue::from(5),
                CellValue::from("starter weapon"),
            ],
        )
        .unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.name(), "#Item");
    assert_eq!(sheet2.last_row(), Some(3));
    assert_eq!(sheet2.last_column(), Some(3));
    assert_eq!(sheet2.get_value("B1").unwrap().as_string(), Some("$displayName"));
    assert_eq!(sheet2.get_value("C1").unwrap().as_string(), Some("!cost"));
    assert_eq!(sheet2.get_value("A4").unwrap(), CellValue::Number(1.0));
    assert_eq!(sheet2.get_value("B4").unwrap().as_string(), Some("Sword"));
}

#[test]
fn test_roundtrip_scalars() {
    let mut wb = Workbook::empty();
    let sheet = wb.push_worksheet("Values").unwrap();

    sheet.set_cell_value("A1", 42.0).unwrap();
    sheet.set_cell_value("B1", -100.5).unwrap();
    sheet.set_cell_value("C1", 1e10).unwrap();
    sheet.set_cell_value("A2", true).unwrap();
    sheet.set_cell_value("B2", false).unwrap();
    sheet.set_cell_value("C2", CellError::Div0).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.get_value("A1").unwrap().as_number(), Some(42.0));
    assert_eq!(sheet2.get_value("B1").unwrap().as_number(), Some(-100.5));
    assert_eq!(sheet2.get_value("C1").unwrap().as_number(), Some(1e10));
    assert_eq!(sheet2.get_value("A2").unwrap(), CellValue::Boolean(true));
    assert_eq!(sheet2.get_value("B2").unwrap(), CellValue::Boolean(false));
    assert_eq!(sheet2.get_value("C2").unwrap(), CellValue::Error(CellError::Div0));
}

#[test]
fn test_roundtrip_strings() {
    let mut wb = Workbook::empty();
    let sheet = wb.push_worksheet("Strings").unwrap();

    sheet.set_cell_value("A1", "Special: <>&\"'").unwrap();
    sheet.set_cell_value("A2", "Multi\nLine").unwrap();
    sheet.set_cell_value("A3", "  padded  ").unwrap();
    sheet.set_cell_value("A4", "Unicode: 剑 \u{1F600}").unwrap();
    sheet.set_cell_value("A5", "literal _x000D_ and\r").unwrap();
    sheet.set_cell_value("A6", r#"{"drop":[1,2]}"#).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    let text = |addr: &str| {
        sheet2
            .get_value(addr)
            .unwrap()
            .as_string()
            .map(str::to_string)
    };
    assert_eq!(text("A1").as_deref(), Some("Special: <>&\"'"));
    assert_eq!(text("A2").as_deref(), Some("Multi\nLine"));
    assert_eq!(text("A3").as_deref(), Some("  padded  "));
    assert_eq!(text("A4").as_deref(), Some("Unicode: 剑 \u{1F600}"));
    assert_eq!(text("A5").as_deref(), Some("literal _x000D_ and\r"));
    assert_eq!(text("A6").as_deref(), Some(r#"{"drop":[1,2]}"#));
}

#[test]
fn test_roundtrip_sheet_order_and_names() {
    let mut wb = Workbook::empty();
    wb.push_worksheet("#Item & Drop").unwrap();
    wb.push_worksheet("notes").unwrap();
    wb.push_worksheet("#Skill").unwrap();
    wb.worksheet_mut(2)
        .unwrap()
        .set_cell_value("C5", 7)
        .unwrap();

    let wb2 = roundtrip(&wb);
    let names: Vec<&str> = wb2.worksheets().map(|s| s.name()).collect();

    assert_eq!(names, vec!["#Item & Drop", "notes", "#Skill"]);
    assert!(wb2.worksheet(0).unwrap().is_empty());
    assert_eq!(
        wb2.worksheet_by_name("#Skill")
            .unwrap()
            .get_value("C5")
            .unwrap(),
        CellValue::Number(7.0)
    );
}

#[test]
fn test_write_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.xlsx");

    let mut wb = Workbook::empty();
    wb.push_worksheet("#Item")
        .unwrap()
        .set_cell_value("A1", "id")
        .unwrap();
    XlsxWriter::write_file(&wb, &path).unwrap();

    let wb2 = XlsxReader::read_file(&path).unwrap();
    assert_eq!(
        wb2.worksheet(0).unwrap().get_value("A1").unwrap().as_string(),
        Some("id")
    );
}
