#![deny(clippy::all)]

/**
 * Dependency Manager Annotation Compiler
 *
 * Collects dependency-manager annotations from the structural events of one
 * class and compiles them into a validated, line-oriented component descriptor.
 */

// Core modules
pub mod annotation;
pub mod batch;
pub mod collector;
pub mod config;
pub mod descriptor;
pub mod entry;
pub mod error;
pub mod events;
pub mod filter;
pub mod logging;
pub mod metatype;
pub mod patterns;

// Re-exports
pub use annotation::{Annotation, AnnotationKind, AttributeValue};
pub use batch::{compile_batch, compile_class, BatchReport, ClassOutcome, CompiledClass};
pub use collector::Collector;
pub use config::CompilerOptions;
pub use descriptor::{Descriptor, DescriptorError};
pub use entry::{BundleState, Entry, EntryKind, EntryParam, EntryValue, PropertyValue};
pub use error::{AnnotationError, Result};
pub use events::{ClassEvent, ClassEventSink, ClassScript};
pub use filter::{FilterSyntaxError, FilterValidator, LdapFilterValidator};
pub use logging::{CapturingLogger, ConsoleLogger, LogLevel, Logger, NullLogger};
pub use metatype::MetaTypeRegistry;

/// Compiler version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
