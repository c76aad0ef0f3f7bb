// Descriptor Reader
//
// Parses descriptor lines back into entries.

use super::DescriptorError;
use crate::entry::{Entry, EntryKind, EntryParam, EntryValue, PropertyValue};
use indexmap::IndexMap;

/// Parses a single descriptor line. `line_number` is only used for errors.
pub fn parse_entry(line: &str, line_number: usize) -> Result<Entry, DescriptorError> {
    let (kind, params) = match line.find(':') {
        Some(index) => (&line[..index], Some(&line[index + 1..])),
        None => (line, None),
    };

    let kind: EntryKind = kind.trim_end().parse().map_err(|message| DescriptorError {
        line: line_number,
        column: 1,
        message,
    })?;
    let mut entry = Entry::new(kind);

    if let Some(params) = params {
        let offset = line.len() - params.len() + 1;
        let mut reader = LineReader::new(params, line_number, offset);
        reader.expect(' ')?;
        loop {
            let (param, value) = reader.read_param()?;
            if entry.contains(param) {
                return Err(reader.error(format!("duplicate parameter '{}'", param)));
            }
            entry.put(param, value);
            if reader.at_end() {
                break;
            }
            reader.expect(';')?;
            reader.expect(' ')?;
        }
    }

    Ok(entry)
}

struct LineReader {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column_offset: usize,
}

impl LineReader {
    fn new(text: &str, line: usize, column_offset: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line,
            column_offset,
        }
    }

    fn read_param(&mut self) -> Result<(EntryParam, EntryValue), DescriptorError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '=' {
                break;
            }
            self.pos += 1;
        }
        let key: String = self.chars[start..self.pos].iter().collect();
        let param: EntryParam = key.parse().map_err(|message| self.error(message))?;
        self.expect('=')?;

        let value = if param == EntryParam::Properties {
            EntryValue::Properties(self.read_properties()?)
        } else if self.peek() == Some('{') {
            EntryValue::Array(self.read_array()?)
        } else {
            EntryValue::String(self.read_scalar(&[';'])?)
        };
        Ok((param, value))
    }

    fn read_properties(&mut self) -> Result<IndexMap<String, PropertyValue>, DescriptorError> {
        self.expect('{')?;
        let mut props = IndexMap::new();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(props);
        }
        loop {
            let name = self.read_scalar(&['=', ',', '}'])?;
            self.expect('=')?;
            let value = if self.peek() == Some('{') {
                PropertyValue::Multi(self.read_array()?)
            } else {
                PropertyValue::Single(self.read_scalar(&[',', '}'])?)
            };
            props.insert(name, value);
            if self.close_or_continue()? {
                return Ok(props);
            }
        }
    }

    fn read_array(&mut self) -> Result<Vec<String>, DescriptorError> {
        self.expect('{')?;
        let mut values = Vec::new();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(values);
        }
        loop {
            values.push(self.read_scalar(&[',', '}'])?);
            if self.close_or_continue()? {
                return Ok(values);
            }
        }
    }

    /// Consumes `,` (returns false) or `}` (returns true).
    fn close_or_continue(&mut self) -> Result<bool, DescriptorError> {
        match self.peek() {
            Some(',') => {
                self.pos += 1;
                Ok(false)
            }
            Some('}') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected ',' or '}'")),
        }
    }

    /// Reads an escaped value up to (not including) an unescaped terminator.
    fn read_scalar(&mut self, terminators: &[char]) -> Result<String, DescriptorError> {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if terminators.contains(&c) {
                break;
            }
            self.pos += 1;
            if c != '\\' {
                value.push(c);
                continue;
            }
            match self.peek() {
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('e') => {}
                Some(escaped) => value.push(escaped),
                None => return Err(self.error("dangling escape")),
            }
            self.pos += 1;
        }
        Ok(value)
    }

    fn expect(&mut self, expected: char) -> Result<(), DescriptorError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", expected)))
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: impl Into<String>) -> DescriptorError {
        DescriptorError {
            line: self.line,
            column: self.column_offset + self.pos,
            message: message.into(),
        }
    }
}
