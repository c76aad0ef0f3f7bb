// Lifecycle Annotations
//
// Scalar-recording annotations: callback methods, lifecycle controller fields
// and injected container fields. They only update the parse state; the next
// provider entry copies them.

use super::attributes::Attrs;
use super::state::Callback;
use super::Collector;
use crate::annotation::AnnotationKind;
use crate::entry::{Entry, EntryParam};
use crate::error::Result;
use crate::patterns;

impl Collector<'_> {
    pub(super) fn record_callback(&mut self, callback: Callback) -> Result<()> {
        let kind = callback.annotation_kind();
        let method = self.require_method(kind)?.name;
        if let Some(previous) = self.state.callbacks.slot_mut(callback).replace(method) {
            self.logger
                .debug(&format!("{} callback {} replaced", kind, previous));
        }
        Ok(())
    }

    pub(super) fn record_composition(&mut self) -> Result<()> {
        let method = self.require_method(AnnotationKind::Composition)?;
        if !patterns::matches(&method.descriptor, &patterns::COMPOSITION) {
            return Err(self.structural(format!(
                "{} method {} must take no argument and return Object[], found {}",
                AnnotationKind::Composition,
                method.name,
                method.descriptor
            )));
        }
        self.state.callbacks.composition = Some(method.name);
        Ok(())
    }

    pub(super) fn parse_lifecycle_controller(&mut self, attrs: &Attrs<'_>) -> Result<()> {
        let field = self.require_field(AnnotationKind::LifecycleController)?;
        if !patterns::matches(&field.descriptor, &patterns::RUNNABLE) {
            return Err(self.structural(format!(
                "{} field {} must be a java.lang.Runnable, found {}",
                AnnotationKind::LifecycleController,
                field.name,
                field.descriptor
            )));
        }
        let start = attrs.boolean(EntryParam::Start.as_str())?.unwrap_or(true);
        let slot = if start {
            &self.state.starter
        } else {
            &self.state.stopper
        };
        if let Some(existing) = slot {
            return Err(self.structural(format!(
                "lifecycle annotation already defined on field {}",
                existing
            )));
        }
        if start {
            self.state.starter = Some(field.name);
        } else {
            self.state.stopper = Some(field.name);
        }
        Ok(())
    }

    pub(super) fn parse_inject(&mut self) -> Result<()> {
        let field = self.require_field(AnnotationKind::Inject)?;
        let injected = &mut self.state.injected;
        if patterns::matches(&field.descriptor, &patterns::BUNDLE_CONTEXT) {
            injected.bundle_context = Some(field.name);
        } else if patterns::matches(&field.descriptor, &patterns::DEPENDENCY_MANAGER) {
            injected.dependency_manager = Some(field.name);
        } else if patterns::matches(&field.descriptor, &patterns::COMPONENT) {
            injected.component = Some(field.name);
        } else {
            return Err(self.structural(format!(
                "{} can't be applied on the field \"{}\" of type {}",
                AnnotationKind::Inject,
                field.name,
                field.descriptor
            )));
        }
        Ok(())
    }

    /// Copies the recorded lifecycle state into a provider entry.
    pub(super) fn add_common_params(&self, entry: &mut Entry) -> Result<()> {
        let callbacks = &self.state.callbacks;
        let injected = &self.state.injected;
        let params = [
            (EntryParam::Init, &callbacks.init),
            (EntryParam::Start, &callbacks.start),
            (EntryParam::Registered, &callbacks.registered),
            (EntryParam::Stop, &callbacks.stop),
            (EntryParam::Unregistered, &callbacks.unregistered),
            (EntryParam::Destroy, &callbacks.destroy),
            (EntryParam::Composition, &callbacks.composition),
            (EntryParam::Starter, &self.state.starter),
            (EntryParam::Stopper, &self.state.stopper),
            (EntryParam::BundleContextField, &injected.bundle_context),
            (EntryParam::DependencyManagerField, &injected.dependency_manager),
            (EntryParam::ComponentField, &injected.component),
        ];
        for (param, value) in params {
            if let Some(value) = value {
                entry.put(param, value.as_str());
            }
        }
        self.check_stopper_has_starter()
    }

    pub(super) fn check_stopper_has_starter(&self) -> Result<()> {
        if self.state.stopper.is_some() && self.state.starter.is_none() {
            return Err(self.structural(format!(
                "can't use a {} annotation for stopping a service without declaring a {} that starts the component",
                AnnotationKind::LifecycleController,
                AnnotationKind::LifecycleController
            )));
        }
        Ok(())
    }
}
