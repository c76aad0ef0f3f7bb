// Property Schema Parsing
//
// Builds the object class definition and designation described by the
// `metadata` attribute of configuration annotations. Results are staged on
// the collector until the class finishes.

use super::attributes::Attrs;
use super::Collector;
use crate::annotation::Annotation;
use crate::error::Result;
use crate::metatype::{
    AttributeDefinition, AttributeType, Designation, MetaTypeDescriptor, ObjectClassDefinition,
};

impl Collector<'_> {
    pub(super) fn parse_metatypes(&mut self, attrs: &Attrs<'_>, pid: &str, factory: bool) -> Result<()> {
        let Some(properties) = attrs.annotations("metadata")? else {
            return Ok(());
        };
        let mut object_class = ObjectClassDefinition::new(
            pid,
            attrs.string("heading")?,
            attrs.string("description")?,
        );
        for property in properties {
            object_class.add(self.parse_attribute_definition(property)?);
        }
        self.pending_metatypes.push(MetaTypeDescriptor {
            object_class,
            designation: Designation {
                pid: pid.to_string(),
                is_factory: factory,
            },
        });
        self.logger
            .info(&format!("Parsed MetaType Properties from class {}", self.class_name()));
        Ok(())
    }

    fn parse_attribute_definition(&self, property: &Annotation) -> Result<AttributeDefinition> {
        let attrs = Attrs::new(property, self.class_name());
        let id = attrs.string("id")?.ok_or_else(|| {
            self.attribute_error(format!("property metadata {} has no \"id\"", property))
        })?;

        let mut definition = AttributeDefinition::new(id.as_str());
        if let Some(type_name) = attrs.type_name("type")? {
            definition.ty = AttributeType::from_class_name(&type_name).ok_or_else(|| {
                self.attribute_error(format!(
                    "unsupported type {} for property {}",
                    type_name, id
                ))
            })?;
        }
        definition.defaults = attrs.scalars("defaults")?.unwrap_or_default();
        definition.heading = attrs.string("heading")?;
        definition.description = attrs.string("description")?;
        definition.cardinality = attrs.int("cardinality")?.unwrap_or(0);
        definition.required = attrs.boolean("required")?.unwrap_or(true);

        let labels = attrs.scalars("optionLabels")?;
        let values = attrs.scalars("optionValues")?;
        match (labels, values) {
            (None, None) => {}
            (Some(labels), Some(values)) if labels.len() == values.len() => {
                for (value, label) in values.into_iter().zip(labels) {
                    definition.add_option(value, label);
                }
            }
            _ => {
                return Err(self.structural(format!(
                    "invalid option labels/values specified for property {}",
                    id
                )))
            }
        }
        Ok(definition)
    }
}
