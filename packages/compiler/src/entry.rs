//! Entry Model
//!
//! One entry per discovered component or dependency annotation. An entry is a
//! kind tag plus an ordered parameter map; the parameter order is the order in
//! which the collector wrote them, and it is what the descriptor emits.

use bitflags::bitflags;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Kind of a descriptor entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Component,
    AspectService,
    AdapterService,
    BundleAdapterService,
    ResourceAdapterService,
    FactoryConfigurationAdapterService,
    ServiceDependency,
    ConfigurationDependency,
    BundleDependency,
    ResourceDependency,
}

impl EntryKind {
    pub const PROVIDERS: [EntryKind; 6] = [
        EntryKind::Component,
        EntryKind::AspectService,
        EntryKind::AdapterService,
        EntryKind::BundleAdapterService,
        EntryKind::ResourceAdapterService,
        EntryKind::FactoryConfigurationAdapterService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Component => "Component",
            EntryKind::AspectService => "AspectService",
            EntryKind::AdapterService => "AdapterService",
            EntryKind::BundleAdapterService => "BundleAdapterService",
            EntryKind::ResourceAdapterService => "ResourceAdapterService",
            EntryKind::FactoryConfigurationAdapterService => "FactoryConfigurationAdapterService",
            EntryKind::ServiceDependency => "ServiceDependency",
            EntryKind::ConfigurationDependency => "ConfigurationDependency",
            EntryKind::BundleDependency => "BundleDependency",
            EntryKind::ResourceDependency => "ResourceDependency",
        }
    }

    /// Whether entries of this kind register the class as a service provider.
    pub fn is_provider(self) -> bool {
        Self::PROVIDERS.contains(&self)
    }

    pub fn is_dependency(self) -> bool {
        !self.is_provider()
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "Component" => EntryKind::Component,
            "AspectService" => EntryKind::AspectService,
            "AdapterService" => EntryKind::AdapterService,
            "BundleAdapterService" => EntryKind::BundleAdapterService,
            "ResourceAdapterService" => EntryKind::ResourceAdapterService,
            "FactoryConfigurationAdapterService" => EntryKind::FactoryConfigurationAdapterService,
            "ServiceDependency" => EntryKind::ServiceDependency,
            "ConfigurationDependency" => EntryKind::ConfigurationDependency,
            "BundleDependency" => EntryKind::BundleDependency,
            "ResourceDependency" => EntryKind::ResourceDependency,
            other => return Err(format!("unknown entry kind '{}'", other)),
        };
        Ok(kind)
    }
}

macro_rules! entry_params {
    ($($variant:ident => $name:literal,)*) => {
        /// Parameter keys understood by the runtime container.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EntryParam {
            $($variant,)*
        }

        impl EntryParam {
            pub const ALL: &'static [EntryParam] = &[$(EntryParam::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(EntryParam::$variant => $name,)*
                }
            }
        }

        impl FromStr for EntryParam {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(EntryParam::$variant),)*
                    other => Err(format!("unknown entry parameter '{}'", other)),
                }
            }
        }
    };
}

entry_params! {
    Init => "init",
    Start => "start",
    Registered => "registered",
    Stop => "stop",
    Unregistered => "unregistered",
    Destroy => "destroy",
    Composition => "composition",
    Starter => "starter",
    Stopper => "stopper",
    BundleContextField => "bundleContextField",
    DependencyManagerField => "dependencyManagerField",
    ComponentField => "componentField",
    Impl => "impl",
    Provides => "provides",
    Properties => "properties",
    FactorySet => "factorySet",
    FactoryConfigure => "factoryConfigure",
    FactoryMethod => "factoryMethod",
    Service => "service",
    Filter => "filter",
    DefaultImpl => "defaultImpl",
    Required => "required",
    Added => "added",
    Changed => "changed",
    Removed => "removed",
    AutoConfig => "autoConfig",
    Pid => "pid",
    FactoryPid => "factoryPid",
    Field => "field",
    Ranking => "ranking",
    AdapteeService => "adapteeService",
    AdapteeFilter => "adapteeFilter",
    StateMask => "stateMask",
    Updated => "updated",
    Timeout => "timeout",
    Propagate => "propagate",
    Name => "name",
}

impl fmt::Display for EntryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Bundle states, as used by the `stateMask` parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BundleState: u32 {
        const UNINSTALLED = 0x01;
        const INSTALLED = 0x02;
        const RESOLVED = 0x04;
        const STARTING = 0x08;
        const STOPPING = 0x10;
        const ACTIVE = 0x20;
    }
}

impl BundleState {
    /// States tracked by a bundle adapter when no mask is given.
    pub const DEFAULT_ADAPTER_MASK: BundleState = BundleState::INSTALLED
        .union(BundleState::RESOLVED)
        .union(BundleState::ACTIVE);
}

/// Value of a service property: one string or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Single(String),
    Multi(Vec<String>),
}

/// Value of an entry parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    String(String),
    Array(Vec<String>),
    Properties(IndexMap<String, PropertyValue>),
}

impl EntryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            EntryValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_properties(&self) -> Option<&IndexMap<String, PropertyValue>> {
        match self {
            EntryValue::Properties(props) => Some(props),
            _ => None,
        }
    }
}

impl From<&str> for EntryValue {
    fn from(value: &str) -> Self {
        EntryValue::String(value.to_string())
    }
}

impl From<String> for EntryValue {
    fn from(value: String) -> Self {
        EntryValue::String(value)
    }
}

impl From<Vec<String>> for EntryValue {
    fn from(values: Vec<String>) -> Self {
        EntryValue::Array(values)
    }
}

impl From<IndexMap<String, PropertyValue>> for EntryValue {
    fn from(props: IndexMap<String, PropertyValue>) -> Self {
        EntryValue::Properties(props)
    }
}

/// A descriptor entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    kind: EntryKind,
    params: IndexMap<EntryParam, EntryValue>,
}

impl Entry {
    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            params: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Sets a parameter. Re-setting a parameter keeps its original position.
    pub fn put(&mut self, param: EntryParam, value: impl Into<EntryValue>) {
        self.params.insert(param, value.into());
    }

    pub fn get(&self, param: EntryParam) -> Option<&EntryValue> {
        self.params.get(&param)
    }

    pub fn get_str(&self, param: EntryParam) -> Option<&str> {
        self.get(param).and_then(EntryValue::as_str)
    }

    pub fn contains(&self, param: EntryParam) -> bool {
        self.params.contains_key(&param)
    }

    pub fn params(&self) -> impl Iterator<Item = (EntryParam, &EntryValue)> {
        self.params.iter().map(|(param, value)| (*param, value))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
