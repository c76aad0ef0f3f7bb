//! Dependency Annotation Tests

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{annotation, compile, error_of, lines_of};
    use dm_annotation_compiler::{AnnotationKind, AttributeValue, ClassScript};

    fn foo() -> ClassScript {
        ClassScript::new().begin_class("com/acme/Foo")
    }

    /// Appends the class-level component and returns the dependency line.
    fn dependency_line(script: ClassScript) -> String {
        let lines = lines_of(&script.annotation(annotation(AnnotationKind::Component)));
        assert_eq!(lines.len(), 2, "{:?}", lines);
        lines[1].clone()
    }

    mod service_dependency_tests {
        use super::*;

        #[test]
        fn should_infer_service_from_field_type() {
            let line = dependency_line(
                foo()
                    .field("store", "Lcom/acme/Store;")
                    .annotation(annotation(AnnotationKind::ServiceDependency)),
            );
            assert_eq!(line, "ServiceDependency: service=com.acme.Store; autoConfig=store");
        }

        #[test]
        fn should_infer_service_from_bind_method() {
            let line = dependency_line(
                foo()
                    .method("bind", "(Ljava/util/Map;Lcom/acme/Store;)V")
                    .annotation(annotation(AnnotationKind::ServiceDependency)),
            );
            assert_eq!(line, "ServiceDependency: service=com.acme.Store; added=bind");
        }

        #[test]
        fn should_keep_explicit_added_callback() {
            let line = dependency_line(
                foo().method("bind", "(Lcom/acme/Store;)V").annotation(
                    annotation(AnnotationKind::ServiceDependency)
                        .with("added", "onAdded")
                        .with("removed", "onRemoved"),
                ),
            );
            assert_eq!(
                line,
                "ServiceDependency: service=com.acme.Store; added=onAdded; removed=onRemoved"
            );
        }

        #[test]
        fn should_write_all_attributes_in_order() {
            let line = dependency_line(
                foo().field("store", "Lcom/acme/Store;").annotation(
                    annotation(AnnotationKind::ServiceDependency)
                        .with("propagate", true)
                        .with("name", "primary")
                        .with("changed", "changed")
                        .with("required", false)
                        .with("timeout", 10_000i64)
                        .with("defaultImpl", AttributeValue::class("com.acme.NullStore"))
                        .with("filter", "(&(region=eu)(!(tier=cold)))")
                        .with("service", AttributeValue::class("com.acme.SqlStore")),
                ),
            );
            assert_eq!(
                line,
                "ServiceDependency: service=com.acme.SqlStore; autoConfig=store; filter=(&(region\\=eu)(!(tier\\=cold))); defaultImpl=com.acme.NullStore; timeout=10000; required=false; changed=changed; name=primary; propagate=true"
            );
        }

        #[test]
        fn should_import_dependency_services() {
            let script = foo()
                .field("a", "Lcom/acme/A;")
                .annotation(annotation(AnnotationKind::ServiceDependency))
                .method("bindB", "(Lcom/acme/B;)V")
                .annotation(annotation(AnnotationKind::ServiceDependency))
                .field("a2", "Lcom/acme/A;")
                .annotation(annotation(AnnotationKind::ServiceDependency))
                .annotation(annotation(AnnotationKind::Component));
            let compiled = compile(&script).unwrap();
            assert_eq!(compiled.imported, vec!["com.acme.A", "com.acme.B"]);
        }

        #[test]
        fn should_accept_timeout_bounds() {
            for timeout in [-1i64, 0, 1] {
                let line = dependency_line(
                    foo()
                        .field("store", "Lcom/acme/Store;")
                        .annotation(annotation(AnnotationKind::ServiceDependency).with("timeout", timeout)),
                );
                assert!(line.ends_with(&format!("timeout={}", timeout)), "{}", line);
            }
        }

        #[test]
        fn should_reject_timeout_below_minus_one() {
            let script = foo()
                .field("store", "Lcom/acme/Store;")
                .annotation(annotation(AnnotationKind::ServiceDependency).with("timeout", -2i64));
            let err = error_of(&script);
            assert!(err.is_attribute());
            assert_eq!(err.class_name(), "com.acme.Foo");
        }

        #[test]
        fn should_reject_malformed_filter() {
            let script = foo().field("store", "Lcom/acme/Store;").annotation(
                annotation(AnnotationKind::ServiceDependency).with("filter", "region=eu"),
            );
            let err = error_of(&script);
            assert!(err.is_syntax());
            assert!(err.to_string().contains("region=eu"));
        }

        #[test]
        fn should_fail_when_service_cannot_be_inferred() {
            let primitive = foo()
                .field("count", "I")
                .annotation(annotation(AnnotationKind::ServiceDependency));
            assert!(error_of(&primitive).is_structural());

            let no_argument = foo()
                .method("bind", "()V")
                .annotation(annotation(AnnotationKind::ServiceDependency));
            assert!(error_of(&no_argument).is_structural());
        }
    }

    mod configuration_dependency_tests {
        use super::*;

        #[test]
        fn should_default_pid_to_class_name() {
            let line = dependency_line(
                foo()
                    .method("updated", "(Ljava/util/Dictionary;)V")
                    .annotation(annotation(AnnotationKind::ConfigurationDependency)),
            );
            assert_eq!(
                line,
                "ConfigurationDependency: pid=com.acme.Foo; updated=updated"
            );
        }

        #[test]
        fn should_write_explicit_pid_and_name() {
            let line = dependency_line(
                foo().method("configure", "(Ljava/util/Dictionary;)V").annotation(
                    annotation(AnnotationKind::ConfigurationDependency)
                        .with("pid", "acme.store")
                        .with("propagate", true)
                        .with("name", "config"),
                ),
            );
            assert_eq!(
                line,
                "ConfigurationDependency: pid=acme.store; updated=configure; propagate=true; name=config"
            );
        }

        #[test]
        fn should_require_updated_method() {
            let script = foo()
                .field("config", "Ljava/util/Dictionary;")
                .annotation(annotation(AnnotationKind::ConfigurationDependency));
            assert!(error_of(&script).is_structural());
        }
    }

    mod bundle_dependency_tests {
        use super::*;

        #[test]
        fn should_default_added_to_annotated_method() {
            let line = dependency_line(
                foo().method("bundleAdded", "(Lorg/osgi/framework/Bundle;)V").annotation(
                    annotation(AnnotationKind::BundleDependency)
                        .with("filter", "(Bundle-SymbolicName=acme.*)")
                        .with("stateMask", 32)
                        .with("required", false),
                ),
            );
            assert_eq!(
                line,
                "BundleDependency: filter=(Bundle-SymbolicName\\=acme.*); added=bundleAdded; required=false; stateMask=32"
            );
        }

        #[test]
        fn should_reject_malformed_filter() {
            let script = foo().method("bundleAdded", "(Lorg/osgi/framework/Bundle;)V").annotation(
                annotation(AnnotationKind::BundleDependency).with("filter", "(Bundle-SymbolicName=acme"),
            );
            let err = error_of(&script);
            assert!(err.is_syntax());
            assert_eq!(err.class_name(), "com.acme.Foo");
        }
    }

    mod resource_dependency_tests {
        use super::*;

        #[test]
        fn should_auto_configure_field() {
            let line = dependency_line(
                foo()
                    .field("resource", "Ljava/net/URL;")
                    .annotation(annotation(AnnotationKind::ResourceDependency).with("filter", "(path=/x)")),
            );
            assert_eq!(
                line,
                "ResourceDependency: filter=(path\\=/x); autoConfig=resource"
            );
        }

        #[test]
        fn should_default_added_to_annotated_method() {
            let line = dependency_line(
                foo().method("add", "(Ljava/net/URL;)V").annotation(
                    annotation(AnnotationKind::ResourceDependency)
                        .with("removed", "remove")
                        .with("factoryMethod", "create"),
                ),
            );
            assert_eq!(
                line,
                "ResourceDependency: added=add; removed=remove; factoryMethod=create"
            );
        }

        #[test]
        fn should_reject_malformed_filter() {
            let script = foo().field("resource", "Ljava/net/URL;").annotation(
                annotation(AnnotationKind::ResourceDependency).with("filter", "path=/x"),
            );
            assert!(error_of(&script).is_syntax());
        }
    }
}
