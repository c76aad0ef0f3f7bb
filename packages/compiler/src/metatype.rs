//! MetaType Model
//!
//! Configuration schema metadata derived from property-schema annotations:
//! object class definitions with their attribute definitions, and the
//! designation binding a definition to a pid or factory pid.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Value type of a configuration attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttributeType {
    #[default]
    String,
    Long,
    Integer,
    Short,
    Character,
    Byte,
    Double,
    Float,
    Boolean,
}

impl AttributeType {
    /// Maps a dotted Java type name (boxed or primitive) to an attribute type.
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        let ty = match class_name {
            "java.lang.String" => AttributeType::String,
            "java.lang.Long" | "long" => AttributeType::Long,
            "java.lang.Integer" | "int" => AttributeType::Integer,
            "java.lang.Short" | "short" => AttributeType::Short,
            "java.lang.Character" | "char" => AttributeType::Character,
            "java.lang.Byte" | "byte" => AttributeType::Byte,
            "java.lang.Double" | "double" => AttributeType::Double,
            "java.lang.Float" | "float" => AttributeType::Float,
            "java.lang.Boolean" | "boolean" => AttributeType::Boolean,
            _ => return None,
        };
        Some(ty)
    }
}

/// One `value`/`label` choice offered for an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub defaults: Vec<String>,
    pub heading: Option<String>,
    pub description: Option<String>,
    pub cardinality: i32,
    pub required: bool,
    pub options: Vec<AttributeOption>,
}

impl AttributeDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ty: AttributeType::String,
            defaults: Vec::new(),
            heading: None,
            description: None,
            cardinality: 0,
            required: true,
            options: Vec::new(),
        }
    }

    pub fn add_option(&mut self, value: impl Into<String>, label: impl Into<String>) {
        self.options.push(AttributeOption {
            value: value.into(),
            label: label.into(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectClassDefinition {
    pub pid: String,
    pub heading: Option<String>,
    pub description: Option<String>,
    pub attributes: Vec<AttributeDefinition>,
}

impl ObjectClassDefinition {
    pub fn new(pid: impl Into<String>, heading: Option<String>, description: Option<String>) -> Self {
        Self {
            pid: pid.into(),
            heading,
            description,
            attributes: Vec::new(),
        }
    }

    pub fn add(&mut self, attribute: AttributeDefinition) {
        self.attributes.push(attribute);
    }
}

/// Binds an object class definition to a configuration pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Designation {
    pub pid: String,
    pub is_factory: bool,
}

/// A definition together with its single designation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTypeDescriptor {
    pub object_class: ObjectClassDefinition,
    pub designation: Designation,
}

/// Schema metadata collected over one compiler run.
///
/// Shared by every class compiled in the run; appends are serialized through
/// a mutex so collectors on different threads can publish concurrently.
#[derive(Debug, Default)]
pub struct MetaTypeRegistry {
    descriptors: Mutex<Vec<MetaTypeDescriptor>>,
}

impl MetaTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, descriptor: MetaTypeDescriptor) {
        self.lock().push(descriptor);
    }

    /// Appends several descriptors as one contiguous run.
    pub fn extend(&self, descriptors: impl IntoIterator<Item = MetaTypeDescriptor>) {
        self.lock().extend(descriptors);
    }

    /// Moves everything out of `other`, preserving order.
    pub fn append(&self, other: &MetaTypeRegistry) {
        let drained: Vec<_> = other.lock().drain(..).collect();
        self.extend(drained);
    }

    pub fn snapshot(&self) -> Vec<MetaTypeDescriptor> {
        self.lock().clone()
    }

    pub fn object_class_definitions(&self) -> Vec<ObjectClassDefinition> {
        self.lock().iter().map(|d| d.object_class.clone()).collect()
    }

    pub fn designations(&self) -> Vec<Designation> {
        self.lock().iter().map(|d| d.designation.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// JSON export consumed by the configuration schema emitter.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MetaTypeDescriptor>> {
        self.descriptors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
