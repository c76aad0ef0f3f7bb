// Provider Annotations
//
// Component and the adapter/aspect kinds. Each builds one provider entry from
// the recorded lifecycle state and the annotation attributes.

use super::attributes::Attrs;
use super::Collector;
use crate::annotation::AnnotationKind;
use crate::entry::{BundleState, Entry, EntryKind, EntryParam, PropertyValue};
use crate::error::Result;
use indexmap::IndexMap;

/// Service type exported by a component declaring a `factorySet`.
const FACTORY_SET_SERVICE: &str = "java.util.Set";

impl Collector<'_> {
    pub(super) fn parse_component(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::Component);
        self.add_common_params(&mut entry)?;
        entry.put(EntryParam::Impl, self.class_name());
        self.put_properties(attrs, &mut entry)?;
        self.put_provides(attrs, &mut entry)?;
        if attrs.put_string(&mut entry, EntryParam::FactorySet, None)?.is_some() {
            self.exported.insert(FACTORY_SET_SERVICE.to_string());
        }
        attrs.put_string(&mut entry, EntryParam::FactoryConfigure, None)?;
        attrs.put_string(&mut entry, EntryParam::FactoryMethod, None)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_aspect_service(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::AspectService);
        self.add_common_params(&mut entry)?;
        self.put_filter(attrs, &mut entry, EntryParam::Filter)?;
        let ranking = attrs.int(EntryParam::Ranking.as_str())?.ok_or_else(|| {
            self.attribute_error(format!(
                "{} requires a \"ranking\" attribute",
                AnnotationKind::AspectService
            ))
        })?;
        entry.put(EntryParam::Ranking, ranking.to_string());
        entry.put(EntryParam::Impl, self.class_name());
        self.put_properties(attrs, &mut entry)?;
        self.put_callback_params(attrs, &mut entry)?;

        let service = match attrs.class(EntryParam::Service.as_str())? {
            Some(service) => service,
            None => match self.state.interfaces() {
                [single] => single.clone(),
                [] => {
                    return Err(self.structural(format!(
                        "{}: the service attribute has not been set and the class does not implement any interface",
                        AnnotationKind::AspectService
                    )))
                }
                _ => {
                    return Err(self.structural(format!(
                        "{}: the service attribute has not been set and the class implements more than one interface",
                        AnnotationKind::AspectService
                    )))
                }
            },
        };
        entry.put(EntryParam::Service, service);
        attrs.put_string(&mut entry, EntryParam::FactoryMethod, None)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_adapter_service(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::AdapterService);
        self.add_common_params(&mut entry)?;
        entry.put(EntryParam::Impl, self.class_name());
        self.put_filter(attrs, &mut entry, EntryParam::AdapteeFilter)?;
        if attrs.put_class(&mut entry, EntryParam::AdapteeService)?.is_none() {
            return Err(self.attribute_error(format!(
                "{} requires an \"adapteeService\" attribute",
                AnnotationKind::AdapterService
            )));
        }
        self.put_properties(attrs, &mut entry)?;
        self.put_provides(attrs, &mut entry)?;
        attrs.put_string(&mut entry, EntryParam::FactoryMethod, None)?;
        self.put_callback_params(attrs, &mut entry)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_bundle_adapter_service(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::BundleAdapterService);
        self.add_common_params(&mut entry)?;
        entry.put(EntryParam::Impl, self.class_name());
        self.put_filter(attrs, &mut entry, EntryParam::Filter)?;
        let default_mask = BundleState::DEFAULT_ADAPTER_MASK.bits().to_string();
        attrs.put_string(&mut entry, EntryParam::StateMask, Some(default_mask.as_str()))?;
        self.put_properties(attrs, &mut entry)?;
        self.put_provides(attrs, &mut entry)?;
        attrs.put_string(&mut entry, EntryParam::Propagate, Some("false"))?;
        attrs.put_string(&mut entry, EntryParam::FactoryMethod, None)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_resource_adapter_service(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::ResourceAdapterService);
        self.add_common_params(&mut entry)?;
        entry.put(EntryParam::Impl, self.class_name());
        self.put_filter(attrs, &mut entry, EntryParam::Filter)?;
        self.put_properties(attrs, &mut entry)?;
        self.put_provides(attrs, &mut entry)?;
        attrs.put_string(&mut entry, EntryParam::Propagate, Some("false"))?;
        attrs.put_string(&mut entry, EntryParam::Changed, None)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_factory_configuration_adapter_service(
        &mut self,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        let mut entry = Entry::new(EntryKind::FactoryConfigurationAdapterService);
        self.add_common_params(&mut entry)?;
        let class_name = self.class_name().to_string();
        entry.put(EntryParam::Impl, class_name.as_str());
        let factory_pid = attrs
            .put_string(&mut entry, EntryParam::FactoryPid, Some(class_name.as_str()))?
            .unwrap_or(class_name);
        attrs.put_string(&mut entry, EntryParam::Updated, Some("updated"))?;
        attrs.put_string(&mut entry, EntryParam::Propagate, Some("false"))?;
        self.put_provides(attrs, &mut entry)?;
        self.put_properties(attrs, &mut entry)?;
        attrs.put_string(&mut entry, EntryParam::FactoryMethod, None)?;
        self.parse_metatypes(attrs, &factory_pid, true)?;
        self.push_entry(entry);
        Ok(())
    }

    /// Writes `provides` from the explicit attribute or the implemented
    /// interfaces, and exports each provided service. A provider with no
    /// service can't have registration callbacks.
    fn put_provides(&mut self, attrs: &Attrs<'_>, entry: &mut Entry) -> Result<()> {
        let provides = match attrs.classes(EntryParam::Provides.as_str())? {
            Some(explicit) => explicit,
            None => self.state.interfaces().to_vec(),
        };
        if provides.is_empty() {
            return self.check_registered_unregistered_absent();
        }
        self.exported.extend(provides.iter().cloned());
        entry.put(EntryParam::Provides, provides);
        Ok(())
    }

    pub(super) fn check_registered_unregistered_absent(&self) -> Result<()> {
        for (kind, method) in [
            (AnnotationKind::Registered, &self.state.callbacks.registered),
            (AnnotationKind::Unregistered, &self.state.callbacks.unregistered),
        ] {
            if let Some(method) = method {
                return Err(self.structural(format!(
                    "{} can't be used on method {} of a component which does not provide a service",
                    kind, method
                )));
            }
        }
        Ok(())
    }

    /// `field` and the `added`/`changed`/`removed` callbacks of aspects and
    /// adapters.
    fn put_callback_params(&self, attrs: &Attrs<'_>, entry: &mut Entry) -> Result<()> {
        let field = attrs.string(EntryParam::Field.as_str())?;
        let added = attrs.string(EntryParam::Added.as_str())?;
        let changed = attrs.string(EntryParam::Changed.as_str())?;
        let removed = attrs.string(EntryParam::Removed.as_str())?;

        if field.is_some() && (added.is_some() || changed.is_some() || removed.is_some()) {
            return Err(self.structural(format!(
                "{} can't mix the \"field\" attribute with \"added/changed/removed\" attributes",
                attrs.annotation()
            )));
        }
        if field.is_none() && added.is_none() && (changed.is_some() || removed.is_some()) {
            return Err(self.structural(format!(
                "{} must define an \"added\" callback",
                attrs.annotation()
            )));
        }

        for (param, value) in [
            (EntryParam::Field, field),
            (EntryParam::Added, added),
            (EntryParam::Changed, changed),
            (EntryParam::Removed, removed),
        ] {
            if let Some(value) = value {
                entry.put(param, value);
            }
        }
        Ok(())
    }

    /// Builds the `properties` map from nested property annotations.
    fn put_properties(&self, attrs: &Attrs<'_>, entry: &mut Entry) -> Result<()> {
        let Some(nested) = attrs.annotations(EntryParam::Properties.as_str())? else {
            return Ok(());
        };
        let mut properties = IndexMap::new();
        for property in nested {
            let property_attrs = Attrs::new(property, self.class_name());
            let name = property_attrs.string("name")?.ok_or_else(|| {
                self.attribute_error(format!(
                    "property in {} has no \"name\"",
                    attrs.annotation()
                ))
            })?;
            let value = if let Some(value) = property_attrs.string("value")? {
                PropertyValue::Single(value)
            } else if let Some(values) = property_attrs.scalars("values")? {
                PropertyValue::Multi(values)
            } else {
                return Err(self.attribute_error(format!(
                    "invalid property \"{}\" in {}: neither \"value\" nor \"values\" is set",
                    name,
                    attrs.annotation()
                )));
            };
            properties.insert(name, value);
        }
        entry.put(EntryParam::Properties, properties);
        Ok(())
    }
}
