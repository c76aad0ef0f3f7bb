//! Annotation Model
//!
//! Annotations as the event source reports them: an identity (a JVM type
//! descriptor) and an ordered set of typed attribute values.

use crate::patterns;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal package name of the dependency manager annotations.
pub const ANNOTATION_PACKAGE: &str = "org/apache/felix/dm/annotation/api";

/// The closed set of annotations the collector reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Component,
    AspectService,
    AdapterService,
    BundleAdapterService,
    ResourceAdapterService,
    FactoryConfigurationAdapterService,
    Init,
    Start,
    Stop,
    Destroy,
    Composition,
    LifecycleController,
    Registered,
    Unregistered,
    Inject,
    ServiceDependency,
    ConfigurationDependency,
    BundleDependency,
    ResourceDependency,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 19] = [
        AnnotationKind::Component,
        AnnotationKind::AspectService,
        AnnotationKind::AdapterService,
        AnnotationKind::BundleAdapterService,
        AnnotationKind::ResourceAdapterService,
        AnnotationKind::FactoryConfigurationAdapterService,
        AnnotationKind::Init,
        AnnotationKind::Start,
        AnnotationKind::Stop,
        AnnotationKind::Destroy,
        AnnotationKind::Composition,
        AnnotationKind::LifecycleController,
        AnnotationKind::Registered,
        AnnotationKind::Unregistered,
        AnnotationKind::Inject,
        AnnotationKind::ServiceDependency,
        AnnotationKind::ConfigurationDependency,
        AnnotationKind::BundleDependency,
        AnnotationKind::ResourceDependency,
    ];

    pub fn simple_name(self) -> &'static str {
        match self {
            AnnotationKind::Component => "Component",
            AnnotationKind::AspectService => "AspectService",
            AnnotationKind::AdapterService => "AdapterService",
            AnnotationKind::BundleAdapterService => "BundleAdapterService",
            AnnotationKind::ResourceAdapterService => "ResourceAdapterService",
            AnnotationKind::FactoryConfigurationAdapterService => {
                "FactoryConfigurationAdapterService"
            }
            AnnotationKind::Init => "Init",
            AnnotationKind::Start => "Start",
            AnnotationKind::Stop => "Stop",
            AnnotationKind::Destroy => "Destroy",
            AnnotationKind::Composition => "Composition",
            AnnotationKind::LifecycleController => "LifecycleController",
            AnnotationKind::Registered => "Registered",
            AnnotationKind::Unregistered => "Unregistered",
            AnnotationKind::Inject => "Inject",
            AnnotationKind::ServiceDependency => "ServiceDependency",
            AnnotationKind::ConfigurationDependency => "ConfigurationDependency",
            AnnotationKind::BundleDependency => "BundleDependency",
            AnnotationKind::ResourceDependency => "ResourceDependency",
        }
    }

    /// The type descriptor identifying this annotation in the event stream.
    pub fn descriptor(self) -> String {
        format!("L{}/{};", ANNOTATION_PACKAGE, self.simple_name())
    }

    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        let simple = descriptor
            .strip_prefix('L')?
            .strip_suffix(';')?
            .strip_prefix(ANNOTATION_PACKAGE)?
            .strip_prefix('/')?;
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.simple_name() == simple)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.simple_name())
    }
}

/// A single annotation attribute value.
///
/// Class literals are carried as type descriptors (`Lcom/acme/Store;`), enum
/// constants and strings as plain strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Long(i64),
    Int(i32),
    String(String),
    Array(Vec<AttributeValue>),
    Annotation(Annotation),
}

impl AttributeValue {
    /// A class literal for the dotted class name.
    pub fn class(class_name: &str) -> Self {
        AttributeValue::String(patterns::to_descriptor(class_name))
    }

    /// An array of class literals.
    pub fn classes<'a>(class_names: impl IntoIterator<Item = &'a str>) -> Self {
        AttributeValue::Array(class_names.into_iter().map(Self::class).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(i64::from(*i)),
            AttributeValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            AttributeValue::Long(l) => i32::try_from(*l).ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&Annotation> {
        match self {
            AttributeValue::Annotation(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// String form of a scalar value; `None` for arrays and nested annotations.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            AttributeValue::String(s) => Some(s.clone()),
            AttributeValue::Int(i) => Some(i.to_string()),
            AttributeValue::Long(l) => Some(l.to_string()),
            AttributeValue::Bool(b) => Some(b.to_string()),
            AttributeValue::Array(_) | AttributeValue::Annotation(_) => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "boolean",
            AttributeValue::Long(_) => "long",
            AttributeValue::Int(_) => "integer",
            AttributeValue::String(_) => "string",
            AttributeValue::Array(_) => "array",
            AttributeValue::Annotation(_) => "annotation",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Long(l) => write!(f, "{}L", l),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::String(s) => write!(f, "{:?}", s),
            AttributeValue::Array(values) => {
                write!(f, "{{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "}}")
            }
            AttributeValue::Annotation(a) => write!(f, "{}", a),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Long(value)
    }
}

impl From<Annotation> for AttributeValue {
    fn from(value: Annotation) -> Self {
        AttributeValue::Annotation(value)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(values: Vec<T>) -> Self {
        AttributeValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// An annotation occurrence: identity plus explicitly set attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeValue>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// An annotation of one of the recognized kinds.
    pub fn of(kind: AnnotationKind) -> Self {
        Self::new(kind.descriptor())
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn kind(&self) -> Option<AnnotationKind> {
        AnnotationKind::from_descriptor(&self.name)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}", kind)?,
            None => write!(f, "@{}", self.name)?,
        }
        if !self.attributes.is_empty() {
            write!(f, "(")?;
            for (i, (key, value)) in self.attributes.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_resolve_kinds_from_descriptors() {
        for kind in AnnotationKind::ALL {
            assert_eq!(AnnotationKind::from_descriptor(&kind.descriptor()), Some(kind));
        }
        assert_eq!(
            AnnotationKind::from_descriptor("Ljava/lang/Deprecated;"),
            None
        );
        assert_eq!(
            AnnotationKind::from_descriptor("Lorg/apache/felix/dm/annotation/api/Property;"),
            None
        );
    }

    #[test]
    fn should_coerce_numbers() {
        assert_eq!(AttributeValue::Int(3).as_i64(), Some(3));
        assert_eq!(AttributeValue::Long(3).as_i32(), Some(3));
        assert_eq!(AttributeValue::Long(i64::MAX).as_i32(), None);
        assert_eq!(AttributeValue::from("3").as_i64(), None);
    }

    #[test]
    fn should_deserialize_attribute_values_from_json() {
        let json = r#"{
            "name": "Lorg/apache/felix/dm/annotation/api/Component;",
            "attributes": {
                "provides": ["Lcom/acme/Store;"],
                "factorySet": "stores",
                "ranking": 10,
                "required": false,
                "properties": [{ "name": "Lorg/apache/felix/dm/annotation/api/Property;",
                                 "attributes": { "name": "region", "value": "eu" } }]
            }
        }"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.kind(), Some(AnnotationKind::Component));
        assert_eq!(
            annotation.get("provides"),
            Some(&AttributeValue::classes(["com.acme.Store"]))
        );
        assert_eq!(annotation.get("ranking").and_then(AttributeValue::as_i32), Some(10));
        assert_eq!(annotation.get("required").and_then(AttributeValue::as_bool), Some(false));
        let property = annotation.get("properties").unwrap().as_array().unwrap()[0]
            .as_annotation()
            .unwrap();
        assert_eq!(property.get("value").and_then(AttributeValue::as_str), Some("eu"));
    }

    #[test]
    fn should_display_annotation() {
        let annotation = Annotation::of(AnnotationKind::ServiceDependency)
            .with("filter", "(a=b)")
            .with("timeout", 10i64);
        assert_eq!(
            annotation.to_string(),
            "@ServiceDependency(filter=\"(a=b)\", timeout=10L)"
        );
    }
}
