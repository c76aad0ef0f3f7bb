// Dependency Annotations

use super::attributes::Attrs;
use super::state::MemberKind;
use super::Collector;
use crate::annotation::AnnotationKind;
use crate::entry::{Entry, EntryKind, EntryParam};
use crate::error::Result;
use crate::patterns;

impl Collector<'_> {
    pub(super) fn parse_service_dependency(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::ServiceDependency);

        let service = match attrs.class(EntryParam::Service.as_str())? {
            Some(service) => service,
            None => self.infer_service_type()?,
        };
        entry.put(EntryParam::Service, service.as_str());
        self.imported.insert(service);

        let field = self.state.field_name().map(str::to_string);
        if let Some(field) = &field {
            entry.put(EntryParam::AutoConfig, field.as_str());
        }
        self.put_filter(attrs, &mut entry, EntryParam::Filter)?;
        attrs.put_class(&mut entry, EntryParam::DefaultImpl)?;
        let bind_method = self.state.method_name().map(str::to_string);
        attrs.put_string(&mut entry, EntryParam::Added, bind_method.as_deref())?;

        if let Some(timeout) = attrs.long(EntryParam::Timeout.as_str())? {
            if timeout < -1 {
                return Err(self.attribute_error(format!(
                    "invalid timeout value {} in {}",
                    timeout,
                    AnnotationKind::ServiceDependency
                )));
            }
            entry.put(EntryParam::Timeout, timeout.to_string());
        }

        attrs.put_string(&mut entry, EntryParam::Required, None)?;
        attrs.put_string(&mut entry, EntryParam::Changed, None)?;
        attrs.put_string(&mut entry, EntryParam::Removed, None)?;
        self.put_dependency_name(attrs, &mut entry)?;
        attrs.put_string(&mut entry, EntryParam::Propagate, None)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_configuration_dependency(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::ConfigurationDependency);
        let class_name = self.class_name().to_string();
        let pid = attrs
            .put_string(&mut entry, EntryParam::Pid, Some(class_name.as_str()))?
            .unwrap_or(class_name);
        let updated = self.require_method(AnnotationKind::ConfigurationDependency)?;
        entry.put(EntryParam::Updated, updated.name);
        attrs.put_string(&mut entry, EntryParam::Propagate, None)?;
        self.put_dependency_name(attrs, &mut entry)?;
        self.parse_metatypes(attrs, &pid, false)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_bundle_dependency(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::BundleDependency);
        self.put_filter(attrs, &mut entry, EntryParam::Filter)?;
        let method = self.state.method_name().map(str::to_string);
        attrs.put_string(&mut entry, EntryParam::Added, method.as_deref())?;
        attrs.put_string(&mut entry, EntryParam::Changed, None)?;
        attrs.put_string(&mut entry, EntryParam::Removed, None)?;
        attrs.put_string(&mut entry, EntryParam::Required, None)?;
        attrs.put_string(&mut entry, EntryParam::StateMask, None)?;
        attrs.put_string(&mut entry, EntryParam::Propagate, None)?;
        self.put_dependency_name(attrs, &mut entry)?;
        self.push_entry(entry);
        Ok(())
    }

    pub(super) fn parse_resource_dependency(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let mut entry = Entry::new(EntryKind::ResourceDependency);
        self.put_filter(attrs, &mut entry, EntryParam::Filter)?;
        if let Some(field) = self.state.field_name() {
            entry.put(EntryParam::AutoConfig, field);
        }
        let method = self.state.method_name().map(str::to_string);
        attrs.put_string(&mut entry, EntryParam::Added, method.as_deref())?;
        attrs.put_string(&mut entry, EntryParam::Changed, None)?;
        attrs.put_string(&mut entry, EntryParam::Removed, None)?;
        attrs.put_string(&mut entry, EntryParam::Required, None)?;
        attrs.put_string(&mut entry, EntryParam::Propagate, None)?;
        attrs.put_string(&mut entry, EntryParam::FactoryMethod, None)?;
        self.put_dependency_name(attrs, &mut entry)?;
        self.push_entry(entry);
        Ok(())
    }

    /// Service type of a dependency without an explicit `service`: the field
    /// type, or the service argument of the bind method.
    fn infer_service_type(&self) -> Result<String> {
        let Some(member) = &self.state.member else {
            return Err(self.structural(format!(
                "{} on the class itself must set the \"service\" attribute",
                AnnotationKind::ServiceDependency
            )));
        };
        let (pattern, group) = match member.kind {
            MemberKind::Field => (&patterns::CLASS, 1),
            MemberKind::Method => (&patterns::BIND_CLASS, 2),
        };
        patterns::parse_class(&member.descriptor, pattern, group).ok_or_else(|| {
            self.structural(format!(
                "can't infer the service type of {} from the descriptor {} of {}",
                AnnotationKind::ServiceDependency,
                member.descriptor,
                member.name
            ))
        })
    }

    /// Copies the `name` attribute, which must be unique among every
    /// dependency of the class.
    fn put_dependency_name(&mut self, attrs: &Attrs<'_>, entry: &mut Entry) -> Result<()> {
        let Some(name) = attrs.string(EntryParam::Name.as_str())? else {
            return Ok(());
        };
        if !self.dependency_names.insert(name.clone()) {
            return Err(self.structural(format!(
                "duplicate dependency name {} in {}",
                name,
                attrs.annotation()
            )));
        }
        entry.put(EntryParam::Name, name);
        Ok(())
    }
}
