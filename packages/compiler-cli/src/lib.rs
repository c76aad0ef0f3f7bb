#![deny(clippy::all)]

/**
 * Dependency Manager Annotation CLI
 *
 * Replays recorded class event streams through the annotation compiler and
 * writes the generated descriptors.
 */
pub use dm_annotation_compiler as compiler;

pub mod perform_compile;


/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
