//! Component Descriptor
//!
//! The text form of a compiled class. One line per entry, provider first:
//!
//! ```text
//! Component: impl=com.acme.Foo; provides={com.acme.IFoo}
//! ServiceDependency: service=com.acme.IBar; autoConfig=bar
//! ```
//!
//! A line is the entry kind, optionally followed by `: ` and `key=value`
//! pairs separated by `; `. Arrays are written as `{a,b}` and the
//! `properties` map as `{name=value,name={a,b}}`. Inside values the
//! characters `\ ; , = { }` are escaped with a backslash, newlines as `\n`
//! and carriage returns as `\r`. An empty array item is written `\e`, so
//! `{\e}` holds one empty string while `{}` is the empty array.
//! [`Descriptor::parse`] reads the same text back into identical entries.

mod reader;
mod writer;

pub use reader::parse_entry;
pub use writer::{escape, write_entry};

use crate::entry::Entry;
use std::fmt;
use std::io;
use thiserror::Error;

/// A malformed descriptor line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("descriptor line {line}, column {column}: {message}")]
pub struct DescriptorError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Entries of one class in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    entries: Vec<Entry>,
}

impl Descriptor {
    /// Builds the descriptor from entries in discovery order. Entries are
    /// emitted in reverse, so the provider (always discovered last) leads
    /// and dependencies follow newest first.
    pub fn from_discovery_order(entries: &[Entry]) -> Self {
        Self {
            entries: entries.iter().rev().cloned().collect(),
        }
    }

    /// Entries in emission order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The leading entry, which the runtime treats as the component itself.
    pub fn provider(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(write_entry)
    }

    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// Parses descriptor text. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, DescriptorError> {
        let entries = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| parse_entry(line, index + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
