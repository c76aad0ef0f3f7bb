//! Annotation Collector
//!
//! Consumes the structural events of one class, turns the dependency-manager
//! annotations found on it into descriptor entries and validates them.
//!
//! Entries are appended in discovery order. Class-level annotations are
//! reported after every member, so a well-formed class ends with its provider
//! entry; the descriptor emits the entries in reverse so the provider comes
//! first.

mod attributes;
mod dependencies;
mod lifecycle;
mod metatype;
mod providers;
mod state;


use crate::annotation::{Annotation, AnnotationKind};
use crate::config::CompilerOptions;
use crate::descriptor::Descriptor;
use crate::entry::{Entry, EntryKind, EntryParam};
use crate::error::{AnnotationError, Result, UNNAMED_CLASS};
use crate::events::ClassEventSink;
use crate::filter::{FilterValidator, LdapFilterValidator};
use crate::logging::Logger;
use crate::metatype::{MetaTypeDescriptor, MetaTypeRegistry};
use attributes::Attrs;
use indexmap::IndexSet;
use state::{Callback, Member, MemberKind, ParseState};
use std::collections::HashSet;

static DEFAULT_FILTER_VALIDATOR: LdapFilterValidator = LdapFilterValidator;

/// Position of the collector in the event protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Named,
    MemberDeclared,
    Finished { found: bool },
    Aborted,
}

/// Collects the annotations of exactly one class.
pub struct Collector<'a> {
    logger: &'a dyn Logger,
    metatype: &'a MetaTypeRegistry,
    filters: &'a dyn FilterValidator,
    reject_duplicate_providers: bool,
    phase: Phase,
    state: ParseState,
    entries: Vec<Entry>,
    dependency_names: HashSet<String>,
    imported: IndexSet<String>,
    exported: IndexSet<String>,
    // Published to `metatype` once `finish` succeeds.
    pending_metatypes: Vec<MetaTypeDescriptor>,
}

impl<'a> Collector<'a> {
    pub fn new(logger: &'a dyn Logger, metatype: &'a MetaTypeRegistry) -> Self {
        Self {
            logger,
            metatype,
            filters: &DEFAULT_FILTER_VALIDATOR,
            reject_duplicate_providers: false,
            phase: Phase::Fresh,
            state: ParseState::default(),
            entries: Vec::new(),
            dependency_names: HashSet::new(),
            imported: IndexSet::new(),
            exported: IndexSet::new(),
            pending_metatypes: Vec::new(),
        }
    }

    pub fn with_filter_validator(mut self, filters: &'a dyn FilterValidator) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_options(mut self, options: &CompilerOptions) -> Self {
        self.reject_duplicate_providers = options.reject_duplicate_providers;
        self
    }

    /// Dotted name of the class, or `<unnamed>` before `begin_class`.
    pub fn class_name(&self) -> &str {
        self.state.class_name.as_deref().unwrap_or(UNNAMED_CLASS)
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Service types this class depends on.
    pub fn imported_services(&self) -> &IndexSet<String> {
        &self.imported
    }

    /// Service types this class registers.
    pub fn exported_services(&self) -> &IndexSet<String> {
        &self.exported
    }

    /// Runs the class-wide validation.
    ///
    /// Returns `Ok(false)` when the class carried no recognized annotation.
    /// On success the staged metatype definitions are published to the shared
    /// registry.
    pub fn finish(&mut self) -> Result<bool> {
        match self.phase {
            Phase::Named | Phase::MemberDeclared => {}
            Phase::Fresh => return Err(self.protocol("finish called before the class was named")),
            Phase::Finished { .. } => return Err(self.protocol("finish called twice")),
            Phase::Aborted => return Err(self.protocol("collector was aborted by an earlier error")),
        }
        let result = self.validate();
        match result {
            Ok(found) => {
                if found {
                    self.metatype.extend(self.pending_metatypes.drain(..));
                    self.log_summary();
                }
                self.phase = Phase::Finished { found };
            }
            Err(_) => self.phase = Phase::Aborted,
        }
        result
    }

    /// The descriptor of a class whose `finish` returned `true`.
    pub fn descriptor(&self) -> Result<Descriptor> {
        match self.phase {
            Phase::Finished { found: true } => Ok(Descriptor::from_discovery_order(&self.entries)),
            Phase::Finished { found: false } => {
                Err(self.protocol("no annotation was found, there is no descriptor"))
            }
            _ => Err(self.protocol("descriptor requested before a successful finish")),
        }
    }

    fn validate(&self) -> Result<bool> {
        let Some(last) = self.entries.last() else {
            return Ok(false);
        };
        if !last.kind().is_provider() {
            let kinds: Vec<&str> = EntryKind::PROVIDERS.iter().map(|k| k.as_str()).collect();
            return Err(self.structural(format!(
                "the class must be annotated with one of the following types: [{}]",
                kinds.join(", ")
            )));
        }
        let providers = self.entries.iter().filter(|e| e.kind().is_provider()).count();
        if providers > 1 && self.reject_duplicate_providers {
            return Err(self.structural(format!(
                "the class declares {} provider annotations, only one is allowed",
                providers
            )));
        }
        // Lifecycle state recorded after the provider was built. Aspects
        // always provide the service they decorate.
        self.check_stopper_has_starter()?;
        if last.kind() != EntryKind::AspectService && !last.contains(EntryParam::Provides) {
            self.check_registered_unregistered_absent()?;
        }
        Ok(true)
    }

    fn log_summary(&self) {
        let mut summary = format!("Parsed annotation for class {}", self.class_name());
        for entry in self.entries.iter().rev() {
            summary.push_str("\n\t");
            summary.push_str(&crate::descriptor::write_entry(entry));
        }
        self.logger.info(&summary);
    }

    /// Rejects events outside the `Named`/`MemberDeclared` phases.
    fn expect_open(&self, event: &str) -> Result<()> {
        match self.phase {
            Phase::Named | Phase::MemberDeclared => Ok(()),
            Phase::Fresh => Err(self.protocol(format!("{} before the class was named", event))),
            Phase::Finished { .. } => Err(self.protocol(format!("{} after finish", event))),
            Phase::Aborted => Err(self.protocol(format!(
                "{} after the collector was aborted by an earlier error",
                event
            ))),
        }
    }

    /// Moves to `Aborted` when `result` is an error.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.phase = Phase::Aborted;
        }
        result
    }

    fn dispatch(&mut self, annotation: &Annotation) -> Result<()> {
        let Some(kind) = annotation.kind() else {
            self.logger
                .debug(&format!("Ignoring annotation {} on class {}", annotation.name, self.class_name()));
            return Ok(());
        };
        let attrs = Attrs::new(annotation, self.class_name());
        match kind {
            AnnotationKind::Component => self.parse_component(&attrs),
            AnnotationKind::AspectService => self.parse_aspect_service(&attrs),
            AnnotationKind::AdapterService => self.parse_adapter_service(&attrs),
            AnnotationKind::BundleAdapterService => self.parse_bundle_adapter_service(&attrs),
            AnnotationKind::ResourceAdapterService => self.parse_resource_adapter_service(&attrs),
            AnnotationKind::FactoryConfigurationAdapterService => {
                self.parse_factory_configuration_adapter_service(&attrs)
            }
            AnnotationKind::Init => self.record_callback(Callback::Init),
            AnnotationKind::Start => self.record_callback(Callback::Start),
            AnnotationKind::Registered => self.record_callback(Callback::Registered),
            AnnotationKind::Stop => self.record_callback(Callback::Stop),
            AnnotationKind::Unregistered => self.record_callback(Callback::Unregistered),
            AnnotationKind::Destroy => self.record_callback(Callback::Destroy),
            AnnotationKind::Composition => self.record_composition(),
            AnnotationKind::LifecycleController => self.parse_lifecycle_controller(&attrs),
            AnnotationKind::Inject => self.parse_inject(),
            AnnotationKind::ServiceDependency => self.parse_service_dependency(&attrs),
            AnnotationKind::ConfigurationDependency => self.parse_configuration_dependency(&attrs),
            AnnotationKind::BundleDependency => self.parse_bundle_dependency(&attrs),
            AnnotationKind::ResourceDependency => self.parse_resource_dependency(&attrs),
        }
    }

    fn push_entry(&mut self, entry: Entry) {
        if entry.kind().is_provider() {
            if let Some(previous) = self.entries.iter().rev().find(|e| e.kind().is_provider()) {
                self.logger.warn(&format!(
                    "class {} declares both {} and {}; only the last one is the primary provider",
                    self.class_name(),
                    previous.kind(),
                    entry.kind()
                ));
            }
        }
        self.entries.push(entry);
    }

    /// Validates and copies a filter attribute.
    fn put_filter(&self, attrs: &Attrs<'_>, entry: &mut Entry, param: EntryParam) -> Result<()> {
        if let Some(filter) = attrs.text(param.as_str())? {
            self.filters
                .validate(filter)
                .map_err(|source| AnnotationError::syntax(self.class_name(), filter, source))?;
            entry.put(param, filter);
        }
        Ok(())
    }

    /// The member the current annotation decorates, which must be a method.
    fn require_method(&self, kind: AnnotationKind) -> Result<Member> {
        self.require_member(kind, MemberKind::Method)
    }

    /// The member the current annotation decorates, which must be a field.
    fn require_field(&self, kind: AnnotationKind) -> Result<Member> {
        self.require_member(kind, MemberKind::Field)
    }

    fn require_member(&self, kind: AnnotationKind, expected: MemberKind) -> Result<Member> {
        let what = match expected {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        };
        match &self.state.member {
            Some(member) if member.kind == expected => Ok(member.clone()),
            Some(member) => Err(self.structural(format!(
                "{} must be applied on a {}, not on {}",
                kind, what, member.name
            ))),
            None => Err(self.structural(format!("{} must be applied on a {}", kind, what))),
        }
    }

    fn structural(&self, message: impl Into<String>) -> AnnotationError {
        AnnotationError::structural(self.class_name(), message)
    }

    fn attribute_error(&self, message: impl Into<String>) -> AnnotationError {
        AnnotationError::attribute(self.class_name(), message)
    }

    fn protocol(&self, message: impl Into<String>) -> AnnotationError {
        AnnotationError::protocol(self.class_name(), message)
    }
}

impl ClassEventSink for Collector<'_> {
    fn begin_class(&mut self, name: &str) -> Result<()> {
        match self.phase {
            Phase::Fresh => {}
            Phase::Named | Phase::MemberDeclared => {
                let error = self.protocol(format!("class named twice (second name: {})", name));
                return self.track(Err(error));
            }
            Phase::Finished { .. } | Phase::Aborted => {
                return Err(self.protocol(format!("class named after finish (name: {})", name)))
            }
        }
        let class_name = crate::patterns::to_class_name(name);
        self.logger.debug(&format!("class name: {}", class_name));
        self.state.class_name = Some(class_name);
        self.phase = Phase::Named;
        Ok(())
    }

    fn implements_interfaces(&mut self, interfaces: &[String]) -> Result<()> {
        self.expect_open("implements event")?;
        if self.state.interfaces.is_some() {
            let error = self.protocol("implemented interfaces reported twice");
            return self.track(Err(error));
        }
        let interfaces = interfaces
            .iter()
            .map(|name| crate::patterns::to_class_name(name))
            .collect::<smallvec::SmallVec<[String; 4]>>();
        self.logger
            .debug(&format!("implements: [{}]", interfaces.join(", ")));
        self.state.interfaces = Some(interfaces);
        Ok(())
    }

    fn declare_field(&mut self, name: &str, descriptor: &str) -> Result<()> {
        self.expect_open("field event")?;
        self.logger
            .debug(&format!("Parsed field {}, descriptor={}", name, descriptor));
        self.state.member = Some(Member {
            kind: MemberKind::Field,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
        self.phase = Phase::MemberDeclared;
        Ok(())
    }

    fn declare_method(&mut self, name: &str, descriptor: &str) -> Result<()> {
        self.expect_open("method event")?;
        self.logger
            .debug(&format!("Parsed method {}, descriptor={}", name, descriptor));
        self.state.member = Some(Member {
            kind: MemberKind::Method,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
        self.phase = Phase::MemberDeclared;
        Ok(())
    }

    fn annotate(&mut self, annotation: &Annotation) -> Result<()> {
        self.expect_open("annotation event")?;
        self.logger
            .debug(&format!("Parsed annotation: {}", annotation));
        let result = self.dispatch(annotation);
        self.track(result)
    }
}
