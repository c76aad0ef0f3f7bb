// Attribute Reader
//
// Typed access to annotation attributes, failing with an attribute error that
// names the class and the annotation.

use crate::annotation::{Annotation, AttributeValue};
use crate::entry::{Entry, EntryParam};
use crate::error::{AnnotationError, Result};
use crate::patterns;

pub struct Attrs<'a> {
    annotation: &'a Annotation,
    class_name: String,
}

impl<'a> Attrs<'a> {
    pub fn new(annotation: &'a Annotation, class_name: impl Into<String>) -> Self {
        Self {
            annotation,
            class_name: class_name.into(),
        }
    }

    pub fn annotation(&self) -> &'a Annotation {
        self.annotation
    }

    fn get(&self, key: &str) -> Option<&'a AttributeValue> {
        self.annotation.get(key)
    }

    fn wrong_type(&self, key: &str, expected: &str, found: &AttributeValue) -> AnnotationError {
        AnnotationError::attribute(
            self.class_name.as_str(),
            format!(
                "attribute \"{}\" of {} must be {}, found {}",
                key,
                self.annotation,
                expected,
                found.type_name()
            ),
        )
    }

    /// String form of a scalar attribute.
    pub fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .to_scalar_string()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a scalar", value)),
        }
    }

    /// A string attribute, borrowed.
    pub fn text(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a string", value)),
        }
    }

    pub fn int(&self, key: &str) -> Result<Option<i32>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i32()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "an integer", value)),
        }
    }

    pub fn long(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a long", value)),
        }
    }

    pub fn boolean(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a boolean", value)),
        }
    }

    /// A class literal, as a dotted class name.
    pub fn class(&self, key: &str) -> Result<Option<String>> {
        let Some(descriptor) = self.text(key)? else {
            return Ok(None);
        };
        self.parse_class_literal(key, descriptor).map(Some)
    }

    /// A class literal that may also name a primitive type.
    pub fn type_name(&self, key: &str) -> Result<Option<String>> {
        let Some(descriptor) = self.text(key)? else {
            return Ok(None);
        };
        patterns::parse_type(descriptor).map(Some).ok_or_else(|| {
            self.invalid_class_literal(key, descriptor)
        })
    }

    /// An array of class literals. A lone class literal counts as a
    /// one-element array.
    pub fn classes(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::String(descriptor)) => {
                Ok(Some(vec![self.parse_class_literal(key, descriptor)?]))
            }
            Some(AttributeValue::Array(values)) => values
                .iter()
                .map(|value| match value.as_str() {
                    Some(descriptor) => self.parse_class_literal(key, descriptor),
                    None => Err(self.wrong_type(key, "an array of class literals", value)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(value) => Err(self.wrong_type(key, "an array of class literals", value)),
        }
    }

    /// An array of scalars, stringified. A lone scalar counts as a
    /// one-element array.
    pub fn scalars(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Array(values)) => values
                .iter()
                .map(|value| {
                    value
                        .to_scalar_string()
                        .ok_or_else(|| self.wrong_type(key, "an array of scalars", value))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(value) => value
                .to_scalar_string()
                .map(|s| Some(vec![s]))
                .ok_or_else(|| self.wrong_type(key, "an array of scalars", value)),
        }
    }

    /// An array of nested annotations. A lone nested annotation counts as a
    /// one-element array.
    pub fn annotations(&self, key: &str) -> Result<Option<Vec<&'a Annotation>>> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Annotation(nested)) => Ok(Some(vec![nested])),
            Some(AttributeValue::Array(values)) => values
                .iter()
                .map(|value| {
                    value
                        .as_annotation()
                        .ok_or_else(|| self.wrong_type(key, "an array of annotations", value))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(value) => Err(self.wrong_type(key, "an array of annotations", value)),
        }
    }

    /// Copies the scalar attribute named after `param` into `entry`, falling
    /// back to `default`. Returns the value written, if any.
    pub fn put_string(
        &self,
        entry: &mut Entry,
        param: EntryParam,
        default: Option<&str>,
    ) -> Result<Option<String>> {
        let value = self
            .string(param.as_str())?
            .or_else(|| default.map(str::to_string));
        if let Some(value) = &value {
            entry.put(param, value.as_str());
        }
        Ok(value)
    }

    /// Copies the class literal attribute named after `param` into `entry`.
    pub fn put_class(&self, entry: &mut Entry, param: EntryParam) -> Result<Option<String>> {
        let value = self.class(param.as_str())?;
        if let Some(value) = &value {
            entry.put(param, value.as_str());
        }
        Ok(value)
    }

    fn parse_class_literal(&self, key: &str, descriptor: &str) -> Result<String> {
        patterns::parse_class(descriptor, &patterns::CLASS, 1)
            .ok_or_else(|| self.invalid_class_literal(key, descriptor))
    }

    fn invalid_class_literal(&self, key: &str, descriptor: &str) -> AnnotationError {
        AnnotationError::attribute(
            self.class_name.as_str(),
            format!(
                "attribute \"{}\" of {} is not a valid class literal: {}",
                key, self.annotation, descriptor
            ),
        )
    }
}
