//! Member Descriptor Patterns
//!
//! Regular expressions over JVM type and method descriptors, used to infer
//! service types and to check the signature of annotated members.

use once_cell::sync::Lazy;
use regex::Regex;

/// A class literal or field type, e.g. `Lcom/acme/Store;`.
pub static CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^L([^;]+);$").unwrap());

/// A bind method taking the service, optionally preceded by a service
/// reference or map, e.g. `(Ljava/util/Map;Lcom/acme/Store;)V`.
pub static BIND_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((L[^;]+;)?L([^;]+);\)V$").unwrap());

pub static RUNNABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Ljava/lang/Runnable;$").unwrap());

/// A composition method: no arguments, returns `Object[]`.
pub static COMPOSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\)\[Ljava/lang/Object;$").unwrap());

pub static BUNDLE_CONTEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Lorg/osgi/framework/BundleContext;$").unwrap());

pub static DEPENDENCY_MANAGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Lorg/apache/felix/dm/DependencyManager;$").unwrap());

pub static COMPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Lorg/apache/felix/dm/Component;$").unwrap());

/// Extracts capture `group` of `pattern` from `descriptor` and converts the
/// internal name to a dotted class name. Returns `None` when the descriptor
/// does not match.
pub fn parse_class(descriptor: &str, pattern: &Regex, group: usize) -> Option<String> {
    pattern
        .captures(descriptor)
        .and_then(|caps| caps.get(group))
        .map(|m| to_class_name(m.as_str()))
}

/// Whether `descriptor` matches `pattern` as a whole.
pub fn matches(descriptor: &str, pattern: &Regex) -> bool {
    pattern.is_match(descriptor)
}

/// Dotted type name of a field type or class literal descriptor, including
/// the primitive descriptors (`I` -> `int`).
pub fn parse_type(descriptor: &str) -> Option<String> {
    let primitive = match descriptor {
        "Z" => "boolean",
        "B" => "byte",
        "C" => "char",
        "S" => "short",
        "I" => "int",
        "J" => "long",
        "F" => "float",
        "D" => "double",
        _ => return parse_class(descriptor, &CLASS, 1),
    };
    Some(primitive.to_string())
}

/// `com/acme/Store` -> `com.acme.Store`
pub fn to_class_name(internal_name: &str) -> String {
    internal_name.replace('/', ".")
}

/// `com.acme.Store` -> `Lcom/acme/Store;`
pub fn to_descriptor(class_name: &str) -> String {
    format!("L{};", class_name.replace('.', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_field_descriptor() {
        assert_eq!(
            parse_class("Lcom/acme/Store;", &CLASS, 1),
            Some("com.acme.Store".to_string())
        );
        assert_eq!(parse_class("I", &CLASS, 1), None);
        assert_eq!(parse_class("[Lcom/acme/Store;", &CLASS, 1), None);
    }

    #[test]
    fn should_parse_bind_method_descriptor() {
        assert_eq!(
            parse_class("(Lcom/acme/Store;)V", &BIND_CLASS, 2),
            Some("com.acme.Store".to_string())
        );
        assert_eq!(
            parse_class(
                "(Lorg/osgi/framework/ServiceReference;Lcom/acme/Store;)V",
                &BIND_CLASS,
                2
            ),
            Some("com.acme.Store".to_string())
        );
        assert_eq!(parse_class("()V", &BIND_CLASS, 2), None);
        assert_eq!(parse_class("(Lcom/acme/Store;)Z", &BIND_CLASS, 2), None);
    }

    #[test]
    fn should_match_whole_descriptors_only() {
        assert!(matches("()[Ljava/lang/Object;", &COMPOSITION));
        assert!(!matches("(I)[Ljava/lang/Object;", &COMPOSITION));
        assert!(matches("Ljava/lang/Runnable;", &RUNNABLE));
        assert!(!matches("Ljava/lang/Runnable;;", &RUNNABLE));
        assert!(matches("Lorg/osgi/framework/BundleContext;", &BUNDLE_CONTEXT));
    }

    #[test]
    fn should_parse_types() {
        assert_eq!(parse_type("J"), Some("long".to_string()));
        assert_eq!(parse_type("Ljava/lang/String;"), Some("java.lang.String".to_string()));
        assert_eq!(parse_type("V"), None);
    }

    #[test]
    fn should_convert_between_names_and_descriptors() {
        assert_eq!(to_descriptor("com.acme.Store"), "Lcom/acme/Store;");
        assert_eq!(to_class_name("com/acme/Store"), "com.acme.Store");
    }
}
