// Console Logger
//
// Writes compiler messages to the terminal. Info goes to stdout, everything
// else to stderr. Every line of a message carries the level tag, so the
// multi-line class summaries stay greppable.

use super::logger::{LogLevel, Logger};

pub struct ConsoleLogger {
    level: LogLevel,
    /// Tool name shown before the level tag, e.g. `dm-annotate`.
    prefix: Option<String>,
}

impl ConsoleLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            prefix: None,
        }
    }

    pub fn with_prefix(level: LogLevel, prefix: impl Into<String>) -> Self {
        Self {
            level,
            prefix: Some(prefix.into()),
        }
    }

    /// Renders `msg` as it is printed, one tagged line per message line.
    pub fn format(&self, level: LogLevel, msg: &str) -> String {
        let tag = match &self.prefix {
            Some(prefix) => format!("{} [{}]", prefix, level.label()),
            None => format!("[{}]", level.label()),
        };
        if msg.is_empty() {
            return tag;
        }
        msg.lines()
            .map(|line| format!("{} {}", tag, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Logger for ConsoleLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        if self.is_enabled(LogLevel::Debug) {
            eprintln!("{}", self.format(LogLevel::Debug, msg));
        }
    }

    fn info(&self, msg: &str) {
        if self.is_enabled(LogLevel::Info) {
            println!("{}", self.format(LogLevel::Info, msg));
        }
    }

    fn warn(&self, msg: &str) {
        if self.is_enabled(LogLevel::Warn) {
            eprintln!("{}", self.format(LogLevel::Warn, msg));
        }
    }

    fn error(&self, msg: &str) {
        if self.is_enabled(LogLevel::Error) {
            eprintln!("{}", self.format(LogLevel::Error, msg));
        }
    }
}
