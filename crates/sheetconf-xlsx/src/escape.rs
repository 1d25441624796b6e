//! Excel `_xHHHH_` string escapes
//!
//! Excel encodes characters XML cannot carry (CR, control characters) as
//! `_xHHHH_`. A literal underscore that would otherwise start such a sequence
//! is itself escaped as `_x005F_`.

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match parse_escape(candidate) {
            Some(decoded) => {
                result.push(decoded);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);

    result
}

/// Escape text so that [`decode_excel_escapes`] gives it back unchanged.
pub fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c == '_' && parse_escape(&s[i..]).is_some() {
            result.push_str("_x005F_");
        } else if c == '\r' {
            result.push_str("_x000D_");
        } else if c.is_control() && c != '\n' && c != '\t' {
            result.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            result.push(c);
        }
    }
    result
}

/// Parse `_xHHHH_` at the start of `s`
fn parse_escape(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || bytes[0] != b'_' || bytes[1] != b'x' || bytes[6] != b'_' {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
