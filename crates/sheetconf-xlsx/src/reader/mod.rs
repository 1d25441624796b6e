//! XLSX reader
//!
//! Only what locating and decoding cell values needs is parsed: the workbook
//! part for sheet titles in tab order, its relationships for the worksheet
//! parts, the shared string table and each worksheet's `<sheetData>`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use sheetconf_core::{CellAddress, CellError, CellValue, SharedString, Workbook, Worksheet};

const CONTENT_TYPES: &str = "[Content_Types].xml";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";

/// Value-only XLSX file reader
///
/// Cells are loaded with their evaluated values. A formula cell contributes
/// its cached result (or nothing when the file carries none), so workbooks
/// must be saved by a tool that evaluates formulas.
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut package = Package::open(reader)?;

        let shared_strings = match package.part(SHARED_STRINGS)? {
            Some(bytes) => parse_shared_strings(&bytes)?,
            None => Vec::new(),
        };
        let sheets = parse_sheet_list(&package.required_part(WORKBOOK)?)?;
        let worksheet_parts = parse_worksheet_rels(&package.required_part(WORKBOOK_RELS)?)?;

        let mut workbook = Workbook::empty();
        for (title, rel_id) in &sheets {
            let Some(part) = worksheet_parts.get(rel_id) else {
                debug!("sheet '{title}' ({rel_id}) is not a worksheet part, skipped");
                continue;
            };
            let bytes = package.required_part(part)?;
            let worksheet = workbook.push_worksheet(title)?;
            SheetDataParser::new(part, &shared_strings).parse(&bytes, worksheet)?;
        }

        Ok(workbook)
    }
}

/// The zip container of a workbook
struct Package<R> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    fn open(reader: R) -> XlsxResult<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        if !archive.file_names().any(|name| name == CONTENT_TYPES) {
            return Err(XlsxError::NotAWorkbook("missing [Content_Types].xml"));
        }
        Ok(Self { archive })
    }

    /// Raw bytes of a part, `None` when the package lacks it
    fn part(&mut self, name: &str) -> XlsxResult<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn required_part(&mut self, name: &str) -> XlsxResult<Vec<u8>> {
        self.part(name)?
            .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
    }
}

fn xml_error(part: &str) -> impl Fn(quick_xml::Error) -> XlsxError + '_ {
    move |source| XlsxError::Xml {
        part: part.to_string(),
        source,
    }
}

/// Unescaped value of the attribute `key`
fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// The shared string table; rich-text runs are concatenated and phonetic
/// hints dropped
fn parse_shared_strings(bytes: &[u8]) -> XlsxResult<Vec<SharedString>> {
    let err = xml_error(SHARED_STRINGS);
    let mut reader = Reader::from_reader(bytes);
    // Leading/trailing spaces inside <t> are significant
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf).map_err(&err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => phonetic_depth += 1,
                b"t" => in_text = current.is_some() && phonetic_depth == 0,
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(SharedString::new("")),
            Event::End(e) => match e.name().as_ref() {
                b"si" => {
                    let text = current.take().unwrap_or_default();
                    strings.push(SharedString::new(decode_excel_escapes(&text)));
                }
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&e.unescape().map_err(&err)?);
                }
            }
            Event::CData(e) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// `(title, relationship id)` of every sheet, in tab order
fn parse_sheet_list(bytes: &[u8]) -> XlsxResult<Vec<(String, String)>> {
    let err = xml_error(WORKBOOK);
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(&err)? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"sheet" => {
                if let (Some(title), Some(rel_id)) = (attribute(&e, b"name"), attribute(&e, b"r:id"))
                {
                    sheets.push((title, rel_id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Worksheet part paths keyed by relationship id
fn parse_worksheet_rels(bytes: &[u8]) -> XlsxResult<HashMap<String, String>> {
    let err = xml_error(WORKBOOK_RELS);
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parts = HashMap::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(&err)? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                let is_worksheet = attribute(&e, b"Type")
                    .is_some_and(|rel_type| rel_type.ends_with("/worksheet"));
                if let (true, Some(id), Some(target)) =
                    (is_worksheet, attribute(&e, b"Id"), attribute(&e, b"Target"))
                {
                    parts.insert(id, resolve_part_path(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(parts)
}

/// Targets are relative to `xl/` unless absolute within the package
fn resolve_part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

/// The `t` attribute of a `<c>` element
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawType {
    Number,
    SharedString,
    Boolean,
    Error,
    /// `inlineStr`, or a formula's string result (`str`)
    Text,
    /// Anything else (ISO dates `d`, extensions); kept as text
    Other,
}

impl RawType {
    fn from_attribute(value: Option<&str>) -> Self {
        match value {
            None | Some("n") => RawType::Number,
            Some("s") => RawType::SharedString,
            Some("b") => RawType::Boolean,
            Some("e") => RawType::Error,
            Some("inlineStr") | Some("str") => RawType::Text,
            Some(_) => RawType::Other,
        }
    }
}

/// A `<c>` element being read
struct RawCell {
    reference: Option<String>,
    raw_type: RawType,
    text: Option<String>,
}

/// Where the parser is inside a `<c>` element
#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    Outside,
    InCell,
    /// Inside `<v>`, or `<is><t>`
    InValue,
    /// Inside `<is>` but not in a `<t>`
    InInlineString,
}

/// Fills a worksheet from one worksheet part
struct SheetDataParser<'a> {
    part: &'a str,
    shared_strings: &'a [SharedString],
}

impl<'a> SheetDataParser<'a> {
    fn new(part: &'a str, shared_strings: &'a [SharedString]) -> Self {
        Self {
            part,
            shared_strings,
        }
    }

    fn parse(&self, bytes: &[u8], worksheet: &mut Worksheet) -> XlsxResult<()> {
        let err = xml_error(self.part);
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut position = Position::Outside;
        let mut cell: Option<RawCell> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(&err)? {
                Event::Start(e) => match (e.name().as_ref(), position) {
                    (b"c", _) => {
                        cell = Some(RawCell {
                            reference: attribute(&e, b"r"),
                            raw_type: RawType::from_attribute(attribute(&e, b"t").as_deref()),
                            text: None,
                        });
                        position = Position::InCell;
                    }
                    (b"v", Position::InCell) => position = Position::InValue,
                    (b"is", Position::InCell) => position = Position::InInlineString,
                    (b"t", Position::InInlineString) => {
                        if let Some(cell) = cell.as_mut() {
                            cell.raw_type = RawType::Text;
                        }
                        position = Position::InValue;
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(cell) = cell.take() {
                            self.store(worksheet, cell)?;
                        }
                        position = Position::Outside;
                    }
                    b"v" | b"is" => position = Position::InCell,
                    b"t" if position == Position::InValue => position = Position::InInlineString,
                    _ => {}
                },
                Event::Text(e) if position == Position::InValue => {
                    let text = e.unescape().map_err(&err)?;
                    if let Some(cell) = cell.as_mut() {
                        cell.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Decode a finished cell into the worksheet; cells without a value are
    /// left empty
    fn store(&self, worksheet: &mut Worksheet, cell: RawCell) -> XlsxResult<()> {
        let (Some(reference), Some(text)) = (cell.reference, cell.text) else {
            return Ok(());
        };
        let invalid = |message: String| XlsxError::InvalidCell {
            part: self.part.to_string(),
            reference: reference.clone(),
            message,
        };

        let address = CellAddress::parse(&reference).map_err(|e| invalid(e.to_string()))?;

        let value = match cell.raw_type {
            RawType::SharedString => {
                let index: usize = text
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("invalid shared string index '{text}'")))?;
                let s = self.shared_strings.get(index).ok_or_else(|| {
                    invalid(format!(
                        "shared string {index} out of bounds ({} strings)",
                        self.shared_strings.len()
                    ))
                })?;
                CellValue::String(s.clone())
            }
            RawType::Boolean => {
                let v = text.trim();
                CellValue::Boolean(v == "1" || v.eq_ignore_ascii_case("true"))
            }
            RawType::Error => CellError::parse(text.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(text)),
            RawType::Text => CellValue::string(decode_excel_escapes(&text)),
            RawType::Number => match text.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(text),
            },
            RawType::Other => CellValue::string(text),
        };

        worksheet.set_cell_value_at(address.row, address.col, value)?;
        Ok(())
    }
}
