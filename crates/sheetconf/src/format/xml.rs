//! XML encoder
//!
//! Every document key becomes an element below the `xml` root. Objects nest
//! as elements, scalars become text, arrays are written as compact JSON text
//! and `null` or empty objects become empty elements.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use super::EncodeError;
use crate::document::Document;

const ROOT: &str = "xml";

pub(super) fn encode(document: &Document) -> Result<String, EncodeError> {
    let mut writer = Writer::new(Vec::new());
    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.get_mut().push(b'\n');

    if document.is_empty() {
        write(&mut writer, Event::Empty(BytesStart::new(ROOT)))?;
    } else {
        write(&mut writer, Event::Start(BytesStart::new(ROOT)))?;
        for (key, value) in document.iter() {
            write_element(&mut writer, &key.to_string(), value)?;
        }
        write(&mut writer, Event::End(BytesEnd::new(ROOT)))?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| EncodeError(e.to_string()))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
) -> Result<(), EncodeError> {
    let text = match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for (key, item) in map {
                write_element(writer, key, item)?;
            }
            return write(writer, Event::End(BytesEnd::new(name)));
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) => {
            Some(serde_json::to_string(value).map_err(|e| EncodeError(e.to_string()))?)
        }
    };

    match text {
        Some(text) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            write(writer, Event::Text(BytesText::new(&text)))?;
            write(writer, Event::End(BytesEnd::new(name)))
        }
        None => write(writer, Event::Empty(BytesStart::new(name))),
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodeError> {
    writer
        .write_event(event)
        .map_err(|e| EncodeError(e.to_string()))
}
