#![allow(dead_code)]

/**
 * Collector Test Utilities
 *
 * Helpers to drive a collector over a recorded class and inspect what it
 * produced.
 */
use dm_annotation_compiler::{
    Annotation, AnnotationError, AnnotationKind, AttributeValue, ClassScript, Collector,
    CompilerOptions, MetaTypeRegistry, NullLogger,
};

/// Result of running one class through a collector.
pub struct Compiled {
    pub found: bool,
    pub lines: Vec<String>,
    pub imported: Vec<String>,
    pub exported: Vec<String>,
}

pub fn annotation(kind: AnnotationKind) -> Annotation {
    Annotation::of(kind)
}

/// Nested `@Property(name=..., value=...)`.
pub fn property(name: &str, value: &str) -> AttributeValue {
    Annotation::new("Lorg/apache/felix/dm/annotation/api/Property;")
        .with("name", name)
        .with("value", value)
        .into()
}

/// Nested `@Property(name=..., values={...})`.
pub fn multi_property(name: &str, values: &[&str]) -> AttributeValue {
    Annotation::new("Lorg/apache/felix/dm/annotation/api/Property;")
        .with("name", name)
        .with("values", values.to_vec())
        .into()
}

pub fn compile(script: &ClassScript) -> Result<Compiled, AnnotationError> {
    compile_with(script, &CompilerOptions::default(), &MetaTypeRegistry::new())
}

pub fn compile_with(
    script: &ClassScript,
    options: &CompilerOptions,
    registry: &MetaTypeRegistry,
) -> Result<Compiled, AnnotationError> {
    let logger = NullLogger::new();
    let mut collector = Collector::new(&logger, registry).with_options(options);
    script.replay(&mut collector)?;
    let found = collector.finish()?;
    let lines = if found {
        collector.descriptor()?.lines().collect()
    } else {
        Vec::new()
    };
    Ok(Compiled {
        found,
        lines,
        imported: collector.imported_services().iter().cloned().collect(),
        exported: collector.exported_services().iter().cloned().collect(),
    })
}

/// Compiles a class expected to succeed and returns its descriptor lines.
pub fn lines_of(script: &ClassScript) -> Vec<String> {
    match compile(script) {
        Ok(compiled) => compiled.lines,
        Err(err) => panic!("class failed to compile: {}", err),
    }
}

/// Compiles a class expected to fail and returns the error.
pub fn error_of(script: &ClassScript) -> AnnotationError {
    match compile(script) {
        Ok(compiled) => panic!("class compiled unexpectedly: {:?}", compiled.lines),
        Err(err) => err,
    }
}
