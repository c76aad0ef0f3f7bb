//! Perform Compile
//!
//! Reads recorded class event streams, compiles them as one batch and writes
//! the descriptors, the metatype export and the service projections.

use anyhow::Context;
use dm_annotation_compiler::{
    compile_batch, BatchReport, ClassScript, CompilerOptions, Logger, MetaTypeRegistry,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one compiler run.
#[derive(Debug)]
pub struct CompilationResult {
    pub report: BatchReport,
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
}

impl CompilationResult {
    pub fn has_failures(&self) -> bool {
        self.report.has_failures()
    }
}

/// Build-tool view of a run: the services to declare in the bundle manifest
/// and the descriptors to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProjection {
    pub import_service: Vec<String>,
    pub export_service: Vec<String>,
    pub components: Vec<String>,
}

/// Loads options from `config`, or the defaults when no file is given.
pub fn read_configuration(config: Option<&Path>) -> anyhow::Result<CompilerOptions> {
    match config {
        Some(path) => CompilerOptions::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(CompilerOptions::default()),
    }
}

/// Expands glob patterns to the sorted set of matching files.
pub fn discover_files(patterns: &[String], logger: &dyn Logger) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(paths) => {
                for entry in paths {
                    match entry {
                        Ok(path) if path.is_file() => {
                            files.insert(path);
                        }
                        Ok(_) => {}
                        Err(e) => logger.warn(&format!("Unreadable path: {}", e)),
                    }
                }
            }
            Err(e) => logger.warn(&format!("Invalid glob pattern '{}': {}", pattern, e)),
        }
    }
    files.into_iter().collect()
}

pub fn load_scripts(files: &[PathBuf]) -> anyhow::Result<Vec<ClassScript>> {
    files
        .iter()
        .map(|file| {
            let content = fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            ClassScript::from_json(&content)
                .with_context(|| format!("invalid event script {}", file.display()))
        })
        .collect()
}

/// Compiles every script matched by `inputs` and writes the results under
/// `out_dir`.
pub fn perform_compile(
    inputs: &[String],
    out_dir: &Path,
    options: &CompilerOptions,
    logger: &dyn Logger,
) -> anyhow::Result<CompilationResult> {
    let files = discover_files(inputs, logger);
    if files.is_empty() {
        anyhow::bail!("no input matches {}", inputs.join(", "));
    }
    logger.debug(&format!("Compiling {} event scripts", files.len()));
    let scripts = load_scripts(&files)?;

    let registry = MetaTypeRegistry::new();
    let report = compile_batch(&scripts, options, logger, &registry);
    let mut written = Vec::new();

    let descriptor_dir = out_dir.join(&options.descriptor_dir);
    let mut components = Vec::new();
    for compiled in report.compiled() {
        let path = descriptor_dir.join(&compiled.class_name);
        write_file(&path, &compiled.descriptor.to_string())?;
        components.push(
            options
                .descriptor_dir
                .join(&compiled.class_name)
                .to_string_lossy()
                .replace('\\', "/"),
        );
        written.push(path);
    }

    if !registry.is_empty() {
        let path = out_dir.join(&options.metatype_file);
        write_file(&path, &registry.to_json()?)?;
        written.push(path);
    }

    let projection = ServiceProjection {
        import_service: report.imported_services().into_iter().collect(),
        export_service: report.exported_services().into_iter().collect(),
        components,
    };
    let path = out_dir.join(&options.services_file);
    write_file(&path, &serde_json::to_string_pretty(&projection)?)?;
    written.push(path);

    Ok(CompilationResult { report, written })
}

/// Process exit code for a finished run.
pub fn exit_code_from_result(result: &CompilationResult) -> i32 {
    if result.has_failures() {
        1
    } else {
        0
    }
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
