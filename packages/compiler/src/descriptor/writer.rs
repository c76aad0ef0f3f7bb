// Descriptor Writer
//
// Renders entries to descriptor lines.

use crate::entry::{Entry, EntryValue, PropertyValue};

/// Written form of an empty array item, so `{""}` is not read back as `{}`.
const EMPTY_ITEM: &str = "\\e";

/// Appends `value` to `out`, escaping descriptor delimiters.
pub fn escape(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '\\' | ';' | ',' | '=' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}

/// Renders one entry as a descriptor line, without the line terminator.
pub fn write_entry(entry: &Entry) -> String {
    let mut line = String::from(entry.kind().as_str());
    for (i, (param, value)) in entry.params().enumerate() {
        line.push_str(if i == 0 { ": " } else { "; " });
        line.push_str(param.as_str());
        line.push('=');
        write_value(value, &mut line);
    }
    line
}

fn write_value(value: &EntryValue, out: &mut String) {
    match value {
        EntryValue::String(s) => escape(s, out),
        EntryValue::Array(values) => write_array(values, out),
        EntryValue::Properties(props) => {
            out.push('{');
            for (i, (name, value)) in props.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                escape(name, out);
                out.push('=');
                match value {
                    PropertyValue::Single(s) => escape(s, out),
                    PropertyValue::Multi(values) => write_array(values, out),
                }
            }
            out.push('}');
        }
    }
}

fn write_array(values: &[String], out: &mut String) {
    out.push('{');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if value.is_empty() {
            out.push_str(EMPTY_ITEM);
        } else {
            escape(value, out);
        }
    }
    out.push('}');
}
