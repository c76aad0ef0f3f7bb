//! Service Filter Validation
//!
//! Filters are LDAP-style boolean expressions such as
//! `(&(objectClass=com.acme.Store)(region=eu*))`. The compiler never evaluates
//! them; it only rejects malformed ones as early as possible.

use thiserror::Error;

/// A malformed filter, with the character offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct FilterSyntaxError {
    pub position: usize,
    pub message: String,
}

impl FilterSyntaxError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Checks the syntax of a service filter string.
pub trait FilterValidator: Send + Sync {
    fn validate(&self, filter: &str) -> Result<(), FilterSyntaxError>;
}

/// Validator for RFC 1960 style filters with the OSGi operator set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LdapFilterValidator;

impl FilterValidator for LdapFilterValidator {
    fn validate(&self, filter: &str) -> Result<(), FilterSyntaxError> {
        FilterParser::new(filter).parse()
    }
}

struct FilterParser {
    chars: Vec<char>,
    pos: usize,
}

impl FilterParser {
    fn new(filter: &str) -> Self {
        Self {
            chars: filter.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<(), FilterSyntaxError> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(FilterSyntaxError::new(0, "empty filter"));
        }
        self.parse_filter()?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(FilterSyntaxError::new(
                self.pos,
                "unexpected characters after the end of the filter",
            ));
        }
        Ok(())
    }

    fn parse_filter(&mut self) -> Result<(), FilterSyntaxError> {
        self.expect('(')?;
        self.skip_whitespace();
        match self.peek() {
            Some('&') | Some('|') => {
                self.pos += 1;
                self.parse_filter_list()?;
            }
            Some('!') => {
                self.pos += 1;
                self.skip_whitespace();
                self.parse_filter()?;
            }
            Some(_) => self.parse_item()?,
            None => return Err(FilterSyntaxError::new(self.pos, "unterminated filter")),
        }
        self.skip_whitespace();
        self.expect(')')
    }

    fn parse_filter_list(&mut self) -> Result<(), FilterSyntaxError> {
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Err(FilterSyntaxError::new(
                self.pos,
                "expected at least one operand",
            ));
        }
        while self.peek() == Some('(') {
            self.parse_filter()?;
            self.skip_whitespace();
        }
        Ok(())
    }

    fn parse_item(&mut self) -> Result<(), FilterSyntaxError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '=' | '<' | '>' | '~' | '(' | ')') {
                break;
            }
            self.pos += 1;
        }
        let attr: String = self.chars[start..self.pos].iter().collect();
        if attr.trim().is_empty() {
            return Err(FilterSyntaxError::new(start, "missing attribute name"));
        }

        match self.peek() {
            Some('=') => self.pos += 1,
            Some('~') | Some('<') | Some('>') => {
                self.pos += 1;
                if self.peek() != Some('=') {
                    return Err(FilterSyntaxError::new(self.pos, "invalid operator"));
                }
                self.pos += 1;
                if matches!(self.peek(), Some(')') | None) {
                    return Err(FilterSyntaxError::new(self.pos, "missing value"));
                }
            }
            _ => return Err(FilterSyntaxError::new(self.pos, "missing operator")),
        }

        self.parse_value()
    }

    fn parse_value(&mut self) -> Result<(), FilterSyntaxError> {
        while let Some(c) = self.peek() {
            match c {
                ')' => return Ok(()),
                '(' => {
                    return Err(FilterSyntaxError::new(
                        self.pos,
                        "unescaped '(' in value",
                    ))
                }
                '\\' => {
                    self.pos += 1;
                    if self.at_end() {
                        return Err(FilterSyntaxError::new(self.pos, "dangling escape"));
                    }
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        Err(FilterSyntaxError::new(self.pos, "unterminated filter"))
    }

    fn expect(&mut self, expected: char) -> Result<(), FilterSyntaxError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(FilterSyntaxError::new(
                self.pos,
                format!("expected '{}' but found '{}'", expected, c),
            )),
            None => Err(FilterSyntaxError::new(
                self.pos,
                format!("expected '{}' but reached end of filter", expected),
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
