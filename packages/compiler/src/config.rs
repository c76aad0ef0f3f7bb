//! Compiler Options
//!
//! Options shared by every collector of a run, loadable from a JSON file.

use crate::logging::LogLevel;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    pub log_level: LogLevel,
    /// Fail a class that declares more than one provider annotation instead
    /// of emitting the extra provider as a trailing line.
    pub reject_duplicate_providers: bool,
    /// Directory (relative to the output root) receiving one descriptor per class.
    pub descriptor_dir: PathBuf,
    /// File (relative to the output root) receiving the metatype export.
    pub metatype_file: PathBuf,
    /// File (relative to the output root) receiving the service projections.
    pub services_file: PathBuf,
    /// Compile classes of a batch on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            reject_duplicate_providers: false,
            descriptor_dir: PathBuf::from("META-INF/dependencymanager"),
            metatype_file: PathBuf::from("OSGI-INF/metatype/metatype.json"),
            services_file: PathBuf::from("META-INF/services.json"),
            parallel: true,
        }
    }
}

impl CompilerOptions {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let options: CompilerOptions = serde_json::from_str(&content)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_missing_fields_with_defaults() {
        let options: CompilerOptions =
            serde_json::from_str(r#"{ "logLevel": "debug", "rejectDuplicateProviders": true }"#)
                .unwrap();
        assert_eq!(options.log_level, LogLevel::Debug);
        assert!(options.reject_duplicate_providers);
        assert_eq!(options.descriptor_dir, PathBuf::from("META-INF/dependencymanager"));
        assert!(options.parallel);
    }

    #[test]
    fn should_reject_unknown_log_level() {
        assert!(serde_json::from_str::<CompilerOptions>(r#"{ "logLevel": "loud" }"#).is_err());
    }
}
