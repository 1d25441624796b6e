//! Lua encoder: `return` followed by a table constructor
//!
//! ```lua
//! return {
//! 	[1] = {
//! 		id = 1,
//! 		displayName = "Sword",
//! 	},
//! }
//! ```

use lazy_regex::regex_is_match;
use serde_json::Value;

use crate::document::{Document, RowKey};

const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

pub(super) fn encode(document: &Document) -> String {
    let mut out = String::from("return ");
    if document.is_empty() {
        out.push_str("{}");
        return out;
    }

    out.push_str("{\n");
    for (key, value) in document.iter() {
        indent(&mut out, 1);
        match key {
            RowKey::Int(n) => out.push_str(&format!("[{}]", n)),
            RowKey::Text(s) => push_key(&mut out, s),
        }
        out.push_str(" = ");
        push_value(&mut out, value, 1);
        out.push_str(",\n");
    }
    out.push('}');
    out
}

/// Check if `key` can be written as a bare field name
pub fn is_lua_identifier(key: &str) -> bool {
    regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", key) && !KEYWORDS.contains(&key)
}

/// Quote `s` as a Lua string literal
pub fn lua_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Padded to three digits so a following digit cannot join the escape
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn push_key(out: &mut String, key: &str) {
    if is_lua_identifier(key) {
        out.push_str(key);
    } else {
        out.push('[');
        out.push_str(&lua_string(key));
        out.push(']');
    }
}

fn push_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match n.as_i64().map(|i| i.to_string()) {
            Some(int) => out.push_str(&int),
            None if n.is_u64() => out.push_str(&n.to_string()),
            // Floats keep a fraction or an exponent so Lua reads them as floats
            None => out.push_str(&format!("{:?}", n.as_f64().unwrap_or_default())),
        },
        Value::String(s) => out.push_str(&lua_string(s)),
        Value::Array(items) if items.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str("{\n");
            for item in items {
                indent(out, depth + 1);
                push_value(out, item, depth + 1);
                out.push_str(",\n");
            }
            indent(out, depth);
            out.push('}');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (key, item) in map {
                indent(out, depth + 1);
                push_key(out, key);
                out.push_str(" = ");
                push_value(out, item, depth + 1);
                out.push_str(",\n");
            }
            indent(out, depth);
            out.push('}');
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}
