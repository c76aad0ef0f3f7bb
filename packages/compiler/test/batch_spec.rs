//! Batch Compilation Tests

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::annotation;
    use dm_annotation_compiler::{
        compile_batch, compile_class, Annotation, AnnotationKind, CapturingLogger, ClassOutcome,
        ClassScript, CompilerOptions, LogLevel, MetaTypeRegistry, NullLogger,
    };

    fn component(class: &str, interface: &str) -> ClassScript {
        ClassScript::new()
            .begin_class(class)
            .implements([interface])
            .field("log", "Lorg/osgi/service/log/LogService;")
            .annotation(annotation(AnnotationKind::ServiceDependency))
            .annotation(annotation(AnnotationKind::Component))
    }

    fn configured(class: &str, pid: &str) -> ClassScript {
        let metadata = Annotation::new("Lorg/apache/felix/dm/annotation/api/PropertyMetaData;")
            .with("id", "size");
        ClassScript::new()
            .begin_class(class)
            .method("updated", "(Ljava/util/Dictionary;)V")
            .annotation(
                annotation(AnnotationKind::ConfigurationDependency)
                    .with("pid", pid)
                    .with("metadata", vec![metadata]),
            )
            .annotation(annotation(AnnotationKind::Component))
    }

    fn broken(class: &str) -> ClassScript {
        ClassScript::new()
            .begin_class(class)
            .field("log", "Lorg/osgi/service/log/LogService;")
            .annotation(annotation(AnnotationKind::ServiceDependency))
    }

    fn plain(class: &str) -> ClassScript {
        ClassScript::new().begin_class(class).method("run", "()V")
    }

    fn sequential() -> CompilerOptions {
        CompilerOptions {
            parallel: false,
            ..CompilerOptions::default()
        }
    }

    #[test]
    fn should_compile_single_class() {
        let logger = NullLogger::new();
        let registry = MetaTypeRegistry::new();
        let compiled = compile_class(
            &component("com/acme/Foo", "com/acme/IFoo"),
            &CompilerOptions::default(),
            &logger,
            &registry,
        )
        .unwrap()
        .unwrap();

        assert_eq!(compiled.class_name, "com.acme.Foo");
        assert_eq!(compiled.descriptor.len(), 2);
        assert_eq!(compiled.imported, vec!["org.osgi.service.log.LogService"]);
        assert_eq!(compiled.exported, vec!["com.acme.IFoo"]);
    }

    #[test]
    fn should_return_none_for_plain_class() {
        let logger = NullLogger::new();
        let registry = MetaTypeRegistry::new();
        let compiled = compile_class(
            &plain("com/acme/Plain"),
            &CompilerOptions::default(),
            &logger,
            &registry,
        )
        .unwrap();
        assert!(compiled.is_none());
    }

    #[test]
    fn should_isolate_failures_per_class() {
        let scripts = vec![
            component("com/acme/A", "com/acme/IA"),
            broken("com/acme/Broken"),
            plain("com/acme/Plain"),
            component("com/acme/B", "com/acme/IB"),
        ];
        let logger = CapturingLogger::new(LogLevel::Error);
        let registry = MetaTypeRegistry::new();
        let report = compile_batch(&scripts, &sequential(), &logger, &registry);

        let names: Vec<_> = report.outcomes.iter().map(ClassOutcome::class_name).collect();
        assert_eq!(
            names,
            vec!["com.acme.A", "com.acme.Broken", "com.acme.Plain", "com.acme.B"]
        );
        assert!(matches!(report.outcomes[1], ClassOutcome::Failed(ref e) if e.is_structural()));
        assert!(matches!(report.outcomes[2], ClassOutcome::Skipped { .. }));
        assert_eq!(report.compiled().count(), 2);
        assert!(report.has_failures());
        assert_eq!(logger.messages(LogLevel::Error).len(), 1);

        let exported: Vec<_> = report.exported_services().into_iter().collect();
        assert_eq!(exported, vec!["com.acme.IA", "com.acme.IB"]);
        let imported: Vec<_> = report.imported_services().into_iter().collect();
        assert_eq!(imported, vec!["org.osgi.service.log.LogService"]);
    }

    #[test]
    fn should_match_sequential_output_when_parallel() {
        let scripts: Vec<_> = (0..16)
            .map(|i| {
                if i % 5 == 0 {
                    broken(&format!("com/acme/C{}", i))
                } else {
                    configured(&format!("com/acme/C{}", i), &format!("pid.{}", i))
                }
            })
            .collect();
        let logger = NullLogger::new();

        let sequential_registry = MetaTypeRegistry::new();
        let sequential_report = compile_batch(&scripts, &sequential(), &logger, &sequential_registry);
        let parallel_registry = MetaTypeRegistry::new();
        let parallel_report = compile_batch(
            &scripts,
            &CompilerOptions::default(),
            &logger,
            &parallel_registry,
        );

        assert_eq!(parallel_report, sequential_report);
        assert_eq!(parallel_registry.snapshot(), sequential_registry.snapshot());

        let pids: Vec<_> = parallel_registry
            .designations()
            .into_iter()
            .map(|d| d.pid)
            .collect();
        let expected: Vec<_> = (0..16)
            .filter(|i| i % 5 != 0)
            .map(|i| format!("pid.{}", i))
            .collect();
        assert_eq!(pids, expected);
    }
}
