//! Logging
//!
//! Logger abstraction shared by every collector of a compiler run.

mod capturing_logger;
mod console_logger;
mod logger;

pub use capturing_logger::CapturingLogger;
pub use console_logger::ConsoleLogger;
pub use logger::{LogLevel, Logger, NullLogger};

#[cfg(test)]
mod test;
