//! DocumentValue → editable text

use chrono::{DateTime, SecondsFormat, Utc};

use super::{DATE_CONSTRUCTOR, IDENT_CONSTRUCTOR};
use crate::value::DocumentValue;

/// Render a value as editable text.
///
/// `indent == 0` produces a single line; any other value puts each array
/// element and object field on its own line, indented by `indent` spaces per
/// nesting level.
pub fn encode(value: &DocumentValue, indent: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, indent, 0);
    out
}

fn write_value(out: &mut String, value: &DocumentValue, indent: usize, depth: usize) {
    match value {
        DocumentValue::Null => out.push_str("null"),
        DocumentValue::Bool(true) => out.push_str("true"),
        DocumentValue::Bool(false) => out.push_str("false"),
        DocumentValue::Int(i) => out.push_str(&i.to_string()),
        DocumentValue::Float(f) => out.push_str(&format_float(*f)),
        DocumentValue::Str(s) => write_string(out, s),
        DocumentValue::Identifier(id) => {
            out.push_str(IDENT_CONSTRUCTOR);
            out.push('(');
            out.push_str(&id.to_hex());
            out.push(')');
        }
        DocumentValue::Date(d) => {
            out.push_str(DATE_CONSTRUCTOR);
            out.push('(');
            out.push_str(&format_date(d));
            out.push(')');
        }
        DocumentValue::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_value(out, item, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push(']');
        }
        DocumentValue::Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_string(out, key);
                out.push(':');
                if indent > 0 {
                    out.push(' ');
                }
                write_value(out, item, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push('}');
        }
    }
}

fn newline(out: &mut String, indent: usize, depth: usize) {
    if indent == 0 {
        return;
    }
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(indent * depth));
}

/// Floats always carry a fraction or exponent so they never read back as Int.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        // Debug is the shortest round-trippable form and keeps ".0"
        format!("{:?}", f)
    }
}

pub(crate) fn format_date(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
