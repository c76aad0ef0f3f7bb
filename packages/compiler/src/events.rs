//! Class Events
//!
//! The structural event protocol between a class scanner and a collector,
//! and a serializable recording of it that can be replayed.

use crate::annotation::Annotation;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Consumer of the structural events describing one class.
///
/// Events arrive as: one `begin_class`, an optional `implements_interfaces`,
/// then members each followed by the annotations decorating them. Class-level
/// annotations may arrive without a preceding member.
pub trait ClassEventSink {
    fn begin_class(&mut self, name: &str) -> Result<()>;
    fn implements_interfaces(&mut self, interfaces: &[String]) -> Result<()>;
    fn declare_field(&mut self, name: &str, descriptor: &str) -> Result<()>;
    fn declare_method(&mut self, name: &str, descriptor: &str) -> Result<()>;
    fn annotate(&mut self, annotation: &Annotation) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClassEvent {
    BeginClass { name: String },
    Implements { interfaces: Vec<String> },
    Field { name: String, descriptor: String },
    Method { name: String, descriptor: String },
    Annotation(Annotation),
}

/// The recorded event stream of one class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassScript {
    pub events: Vec<ClassEvent>,
}

impl ClassScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn begin_class(mut self, name: impl Into<String>) -> Self {
        self.events.push(ClassEvent::BeginClass { name: name.into() });
        self
    }

    pub fn implements<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.push(ClassEvent::Implements {
            interfaces: interfaces.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.events.push(ClassEvent::Field {
            name: name.into(),
            descriptor: descriptor.into(),
        });
        self
    }

    pub fn method(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.events.push(ClassEvent::Method {
            name: name.into(),
            descriptor: descriptor.into(),
        });
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.events.push(ClassEvent::Annotation(annotation));
        self
    }

    /// Name given by the first `beginClass` event, in internal form.
    pub fn class_name(&self) -> Option<&str> {
        self.events.iter().find_map(|event| match event {
            ClassEvent::BeginClass { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Feeds every recorded event to `sink`, stopping at the first error.
    pub fn replay<S: ClassEventSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for event in &self.events {
            match event {
                ClassEvent::BeginClass { name } => sink.begin_class(name)?,
                ClassEvent::Implements { interfaces } => sink.implements_interfaces(interfaces)?,
                ClassEvent::Field { name, descriptor } => sink.declare_field(name, descriptor)?,
                ClassEvent::Method { name, descriptor } => sink.declare_method(name, descriptor)?,
                ClassEvent::Annotation(annotation) => sink.annotate(annotation)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ClassEventSink for Recorder {
        fn begin_class(&mut self, name: &str) -> Result<()> {
            self.calls.push(format!("class {}", name));
            Ok(())
        }
        fn implements_interfaces(&mut self, interfaces: &[String]) -> Result<()> {
            self.calls.push(format!("implements {}", interfaces.join(",")));
            Ok(())
        }
        fn declare_field(&mut self, name: &str, descriptor: &str) -> Result<()> {
            self.calls.push(format!("field {} {}", name, descriptor));
            Ok(())
        }
        fn declare_method(&mut self, name: &str, descriptor: &str) -> Result<()> {
            self.calls.push(format!("method {} {}", name, descriptor));
            Ok(())
        }
        fn annotate(&mut self, annotation: &Annotation) -> Result<()> {
            self.calls.push(format!("annotation {}", annotation));
            Ok(())
        }
    }

    #[test]
    fn should_parse_and_replay_json_script() {
        let json = r#"{ "events": [
            { "event": "beginClass", "name": "com/acme/Foo" },
            { "event": "implements", "interfaces": ["com/acme/IFoo"] },
            { "event": "field", "name": "bar", "descriptor": "Lcom/acme/IBar;" },
            { "event": "annotation", "name": "Lorg/apache/felix/dm/annotation/api/ServiceDependency;" },
            { "event": "method", "name": "start", "descriptor": "()V" },
            { "event": "annotation", "name": "Lorg/apache/felix/dm/annotation/api/Start;" }
        ] }"#;
        let script = ClassScript::from_json(json).unwrap();
        assert_eq!(script.class_name(), Some("com/acme/Foo"));

        let mut recorder = Recorder::default();
        script.replay(&mut recorder).unwrap();
        assert_eq!(
            recorder.calls,
            vec![
                "class com/acme/Foo",
                "implements com/acme/IFoo",
                "field bar Lcom/acme/IBar;",
                "annotation @ServiceDependency",
                "method start ()V",
                "annotation @Start",
            ]
        );
    }

    #[test]
    fn should_serialize_builder_script() {
        let script = ClassScript::new()
            .begin_class("com/acme/Foo")
            .annotation(Annotation::of(AnnotationKind::Component).with("factorySet", "foos"));
        let json = script.to_json().unwrap();
        assert_eq!(ClassScript::from_json(&json).unwrap(), script);
    }
}
