//! XLSX writer
//!
//! Produces the smallest package that spreadsheet applications and
//! [`XlsxReader`](crate::XlsxReader) accept: content types, the package and
//! workbook relationships, the workbook part and one worksheet part per
//! sheet. Strings are written inline, there is no shared string table and no
//! style sheet.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::encode_excel_escapes;
use sheetconf_core::{CellAddress, CellValue, Workbook, Worksheet};

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const DOC_RELS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

/// One serialized package part: its name and bytes
type Part = (String, Vec<u8>);

/// Value-only XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write(workbook, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a workbook to a writer
    ///
    /// Every part is serialized before the archive is touched, so an
    /// unwritable cell leaves `writer` without a half-written package.
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        if workbook.is_empty() {
            return Err(XlsxError::Unwritable(
                "a workbook needs at least one worksheet".into(),
            ));
        }

        let mut parts = vec![
            content_types(workbook)?,
            package_rels()?,
            workbook_part(workbook)?,
            workbook_rels(workbook)?,
        ];
        for (index, sheet) in workbook.worksheets().enumerate() {
            parts.push(worksheet_part(index, sheet)?);
        }

        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default();
        for (name, bytes) in parts {
            zip.start_file(name, options)?;
            zip.write_all(&bytes)?;
        }
        zip.finish()?;
        Ok(())
    }
}

fn worksheet_part_name(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index + 1)
}

/// Streams one XML part, tagging errors with the part name
struct PartWriter {
    part: String,
    xml: Writer<Vec<u8>>,
}

impl PartWriter {
    fn new(part: impl Into<String>) -> XlsxResult<Self> {
        let mut writer = Self {
            part: part.into(),
            xml: Writer::new(Vec::new()),
        };
        writer.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(writer)
    }

    fn event(&mut self, event: Event<'_>) -> XlsxResult<()> {
        self.xml
            .write_event(event)
            .map_err(|source| XlsxError::Xml {
                part: self.part.clone(),
                source,
            })
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> XlsxResult<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Start(element))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> XlsxResult<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> XlsxResult<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> XlsxResult<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn finish(self) -> Part {
        (self.part, self.xml.into_inner())
    }
}

fn content_types(workbook: &Workbook) -> XlsxResult<Part> {
    let mut part = PartWriter::new("[Content_Types].xml")?;
    part.start("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    part.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", RELS_CONTENT_TYPE)],
    )?;
    part.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    part.empty(
        "Override",
        &[
            ("PartName", "/xl/workbook.xml"),
            ("ContentType", WORKBOOK_CONTENT_TYPE),
        ],
    )?;
    for index in 0..workbook.sheet_count() {
        let name = format!("/{}", worksheet_part_name(index));
        part.empty(
            "Override",
            &[
                ("PartName", name.as_str()),
                ("ContentType", WORKSHEET_CONTENT_TYPE),
            ],
        )?;
    }
    part.end("Types")?;
    Ok(part.finish())
}

fn package_rels() -> XlsxResult<Part> {
    let mut part = PartWriter::new("_rels/.rels")?;
    part.start("Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
    let office_document = format!("{DOC_RELS_NS}/officeDocument");
    part.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", office_document.as_str()),
            ("Target", "xl/workbook.xml"),
        ],
    )?;
    part.end("Relationships")?;
    Ok(part.finish())
}

fn workbook_part(workbook: &Workbook) -> XlsxResult<Part> {
    let mut part = PartWriter::new("xl/workbook.xml")?;
    part.start("workbook", &[("xmlns", MAIN_NS), ("xmlns:r", DOC_RELS_NS)])?;
    part.start("sheets", &[])?;
    for (index, sheet) in workbook.worksheets().enumerate() {
        let sheet_id = (index + 1).to_string();
        let rel_id = format!("rId{sheet_id}");
        part.empty(
            "sheet",
            &[
                ("name", sheet.name()),
                ("sheetId", sheet_id.as_str()),
                ("r:id", rel_id.as_str()),
            ],
        )?;
    }
    part.end("sheets")?;
    part.end("workbook")?;
    Ok(part.finish())
}

fn workbook_rels(workbook: &Workbook) -> XlsxResult<Part> {
    let mut part = PartWriter::new("xl/_rels/workbook.xml.rels")?;
    part.start("Relationships", &[("xmlns", PACKAGE_RELS_NS)])?;
    let worksheet_type = format!("{DOC_RELS_NS}/worksheet");
    for index in 0..workbook.sheet_count() {
        let rel_id = format!("rId{}", index + 1);
        let target = format!("worksheets/sheet{}.xml", index + 1);
        part.empty(
            "Relationship",
            &[
                ("Id", rel_id.as_str()),
                ("Type", worksheet_type.as_str()),
                ("Target", target.as_str()),
            ],
        )?;
    }
    part.end("Relationships")?;
    Ok(part.finish())
}

fn worksheet_part(index: usize, sheet: &Worksheet) -> XlsxResult<Part> {
    let mut part = PartWriter::new(worksheet_part_name(index))?;
    part.start("worksheet", &[("xmlns", MAIN_NS)])?;
    part.start("sheetData", &[])?;

    // Cells arrive row-major; a <row> stays open until the row changes
    let mut open_row = None;
    for (row, col, value) in sheet.iter_cells() {
        if value.is_empty() {
            continue;
        }
        if open_row != Some(row) {
            if open_row.is_some() {
                part.end("row")?;
            }
            let number = (row + 1).to_string();
            part.start("row", &[("r", number.as_str())])?;
            open_row = Some(row);
        }
        write_cell(&mut part, CellAddress::new(row, col), value)?;
    }
    if open_row.is_some() {
        part.end("row")?;
    }

    part.end("sheetData")?;
    part.end("worksheet")?;
    Ok(part.finish())
}

fn write_cell(part: &mut PartWriter, address: CellAddress, value: &CellValue) -> XlsxResult<()> {
    let reference = address.to_a1_string();
    let (cell_type, text) = match value {
        CellValue::Empty => return Ok(()),
        CellValue::String(s) => {
            part.start("c", &[("r", reference.as_str()), ("t", "inlineStr")])?;
            part.start("is", &[])?;
            part.start("t", &[("xml:space", "preserve")])?;
            part.text(&encode_excel_escapes(s.as_str()))?;
            part.end("t")?;
            part.end("is")?;
            return part.end("c");
        }
        CellValue::Number(n) if !n.is_finite() => {
            return Err(XlsxError::Unwritable(format!(
                "cell {} holds a non-finite number ({})",
                reference, n
            )));
        }
        CellValue::Number(n) => (None, n.to_string()),
        CellValue::Boolean(b) => (Some("b"), u8::from(*b).to_string()),
        CellValue::Error(e) => (Some("e"), e.as_str().to_string()),
    };

    let mut attributes = vec![("r", reference.as_str())];
    if let Some(cell_type) = cell_type {
        attributes.push(("t", cell_type));
    }
    part.start("c", &attributes)?;
    part.start("v", &[])?;
    part.text(&text)?;
    part.end("v")?;
    part.end("c")
}
