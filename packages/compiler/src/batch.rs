//! Batch Compilation
//!
//! Runs one collector per recorded class. Classes are isolated from each
//! other: a failing class is reported and the others still compile.

use crate::collector::Collector;
use crate::config::CompilerOptions;
use crate::descriptor::Descriptor;
use crate::error::{AnnotationError, Result};
use crate::events::ClassScript;
use crate::logging::Logger;
use crate::metatype::MetaTypeRegistry;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Output of one successfully compiled class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledClass {
    pub class_name: String,
    pub descriptor: Descriptor,
    pub imported: Vec<String>,
    pub exported: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassOutcome {
    Compiled(CompiledClass),
    /// The class carries no dependency-manager annotation.
    Skipped { class_name: String },
    Failed(AnnotationError),
}

impl ClassOutcome {
    pub fn class_name(&self) -> &str {
        match self {
            ClassOutcome::Compiled(compiled) => &compiled.class_name,
            ClassOutcome::Skipped { class_name } => class_name,
            ClassOutcome::Failed(error) => error.class_name(),
        }
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ClassOutcome>,
}

impl BatchReport {
    pub fn compiled(&self) -> impl Iterator<Item = &CompiledClass> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ClassOutcome::Compiled(compiled) => Some(compiled),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &AnnotationError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ClassOutcome::Failed(error) => Some(error),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Services imported by any compiled class, sorted.
    pub fn imported_services(&self) -> BTreeSet<String> {
        self.compiled()
            .flat_map(|compiled| compiled.imported.iter().cloned())
            .collect()
    }

    /// Services exported by any compiled class, sorted.
    pub fn exported_services(&self) -> BTreeSet<String> {
        self.compiled()
            .flat_map(|compiled| compiled.exported.iter().cloned())
            .collect()
    }
}

/// Replays `script` into a fresh collector and finishes it.
///
/// Returns `Ok(None)` when the class has no recognized annotation. Metatype
/// definitions of the class are appended to `registry` only on success.
pub fn compile_class(
    script: &ClassScript,
    options: &CompilerOptions,
    logger: &dyn Logger,
    registry: &MetaTypeRegistry,
) -> Result<Option<CompiledClass>> {
    let mut collector = Collector::new(logger, registry).with_options(options);
    script.replay(&mut collector)?;
    if !collector.finish()? {
        return Ok(None);
    }
    Ok(Some(CompiledClass {
        class_name: collector.class_name().to_string(),
        descriptor: collector.descriptor()?,
        imported: collector.imported_services().iter().cloned().collect(),
        exported: collector.exported_services().iter().cloned().collect(),
    }))
}

/// Compiles every script, on the rayon pool when `options.parallel` is set.
///
/// Each class stages its metatype definitions in a private registry; they are
/// appended to `registry` in input order once all classes are done, so the
/// export does not depend on scheduling.
pub fn compile_batch(
    scripts: &[ClassScript],
    options: &CompilerOptions,
    logger: &dyn Logger,
    registry: &MetaTypeRegistry,
) -> BatchReport {
    let compile = |script: &ClassScript| {
        let local = MetaTypeRegistry::new();
        let outcome = match compile_class(script, options, logger, &local) {
            Ok(Some(compiled)) => ClassOutcome::Compiled(compiled),
            Ok(None) => ClassOutcome::Skipped {
                class_name: script
                    .class_name()
                    .map(crate::patterns::to_class_name)
                    .unwrap_or_else(|| crate::error::UNNAMED_CLASS.to_string()),
            },
            Err(error) => {
                logger.error(&error.to_string());
                ClassOutcome::Failed(error)
            }
        };
        (outcome, local)
    };

    let results: Vec<(ClassOutcome, MetaTypeRegistry)> = if options.parallel {
        scripts.par_iter().map(compile).collect()
    } else {
        scripts.iter().map(compile).collect()
    };

    let mut report = BatchReport::default();
    for (outcome, local) in results {
        registry.append(&local);
        report.outcomes.push(outcome);
    }
    logger.info(&format!(
        "Compiled {} of {} classes ({} failed)",
        report.compiled().count(),
        scripts.len(),
        report.failures().count()
    ));
    report
}
