/**
 * Dependency Manager Annotation CLI - dm-annotate
 *
 * Compiles recorded class event streams into component descriptors
 */
use clap::{Arg, ArgAction, Command};
use dm_annotation_cli::compiler::{ConsoleLogger, LogLevel, Logger};
use dm_annotation_cli::perform_compile::{exit_code_from_result, perform_compile, read_configuration};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let matches = Command::new("dm-annotate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dependency Manager annotation compiler")
        .arg(
            Arg::new("inputs")
                .value_name("PATTERN")
                .num_args(1..)
                .required(true)
                .help("Glob patterns of class event scripts (JSON)"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .default_value(".")
                .help("Output root for descriptors and metadata"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to a compiler options JSON file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every parsed event"),
        )
        .get_matches();

    let inputs: Vec<String> = matches
        .get_many::<String>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let out_dir = matches
        .get_one::<String>("out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = matches.get_one::<String>("config").map(Path::new);

    let options = read_configuration(config).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    });
    let level = if matches.get_flag("verbose") {
        LogLevel::Debug
    } else {
        options.log_level
    };
    let logger = ConsoleLogger::with_prefix(level, "dm-annotate");

    let result = perform_compile(&inputs, &out_dir, &options, &logger).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    });

    if result.has_failures() {
        eprintln!(
            "{} classes failed to compile",
            result.report.failures().count()
        );
    }
    logger.info(&format!(
        "Wrote {} files to {}",
        result.written.len(),
        out_dir.display()
    ));
    process::exit(exit_code_from_result(&result));
}
