// Parse State
//
// Transient per-class state recorded by scalar annotations and read back when
// a provider entry is built.

use crate::annotation::AnnotationKind;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

/// The member the next annotations decorate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: MemberKind,
    pub name: String,
    pub descriptor: String,
}

/// Lifecycle callback method names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleCallbacks {
    pub init: Option<String>,
    pub start: Option<String>,
    pub registered: Option<String>,
    pub stop: Option<String>,
    pub unregistered: Option<String>,
    pub destroy: Option<String>,
    pub composition: Option<String>,
}

/// Method callbacks recorded by the lifecycle annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Init,
    Start,
    Registered,
    Stop,
    Unregistered,
    Destroy,
}

impl Callback {
    pub fn annotation_kind(self) -> AnnotationKind {
        match self {
            Callback::Init => AnnotationKind::Init,
            Callback::Start => AnnotationKind::Start,
            Callback::Registered => AnnotationKind::Registered,
            Callback::Stop => AnnotationKind::Stop,
            Callback::Unregistered => AnnotationKind::Unregistered,
            Callback::Destroy => AnnotationKind::Destroy,
        }
    }
}

impl LifecycleCallbacks {
    pub fn slot_mut(&mut self, callback: Callback) -> &mut Option<String> {
        match callback {
            Callback::Init => &mut self.init,
            Callback::Start => &mut self.start,
            Callback::Registered => &mut self.registered,
            Callback::Stop => &mut self.stop,
            Callback::Unregistered => &mut self.unregistered,
            Callback::Destroy => &mut self.destroy,
        }
    }
}

/// Fields receiving container objects through `@Inject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectedFields {
    pub bundle_context: Option<String>,
    pub dependency_manager: Option<String>,
    pub component: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParseState {
    pub class_name: Option<String>,
    pub interfaces: Option<SmallVec<[String; 4]>>,
    pub member: Option<Member>,
    pub callbacks: LifecycleCallbacks,
    /// Lifecycle controller fields.
    pub starter: Option<String>,
    pub stopper: Option<String>,
    pub injected: InjectedFields,
}

impl ParseState {
    pub fn interfaces(&self) -> &[String] {
        self.interfaces.as_deref().unwrap_or(&[])
    }

    /// Name of the current member if it is a field.
    pub fn field_name(&self) -> Option<&str> {
        self.member_name(MemberKind::Field)
    }

    /// Name of the current member if it is a method.
    pub fn method_name(&self) -> Option<&str> {
        self.member_name(MemberKind::Method)
    }

    fn member_name(&self, kind: MemberKind) -> Option<&str> {
        self.member
            .as_ref()
            .filter(|member| member.kind == kind)
            .map(|member| member.name.as_str())
    }
}
