//! Declared bindings: the ways a key can be satisfied.
//!
//! [`Binding`] is a closed union over the three variants the resolver knows
//! about. Every consumption site matches exhaustively, so a new variant fails
//! to compile until each site handles it.
//!
//! Bindings never mutate after construction and never carry values: the
//! resolver reasons about binding existence and shape only.

use crate::foundation::{Element, Scope, TypeRef};
use crate::key::{BindingKey, DependencyRequest, Key};

/// Whether a contribution is the sole provider for its key or one of many
/// feeding a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingType {
    /// The single binding for its key.
    Unique,
    /// One contribution into a set aggregate.
    Set,
    /// One entry contributed into a map aggregate.
    Map,
}

impl BindingType {
    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            BindingType::Unique => "unique",
            BindingType::Set => "set",
            BindingType::Map => "map",
        }
    }
}

/// Where a contribution binding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionKind {
    /// Synthesized from an injectable constructor.
    InjectionConstructor,
    /// Declared by a module provider method.
    ProviderMethod,
    /// The component instance itself.
    ComponentInstance,
    /// A provision method exposed by a dependency component.
    DependencyMethod,
    /// Synthesized by the resolver (multibinding aggregates).
    Synthetic,
}

/// A binding that provides a value synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionBinding {
    key: Key,
    element: Element,
    kind: ContributionKind,
    binding_type: BindingType,
    scope: Option<Scope>,
    dependencies: Vec<DependencyRequest>,
}

impl ProvisionBinding {
    /// Creates a provision binding.
    pub fn new(
        key: Key,
        element: Element,
        kind: ContributionKind,
        binding_type: BindingType,
        scope: Option<Scope>,
        dependencies: Vec<DependencyRequest>,
    ) -> Self {
        Self {
            key,
            element,
            kind,
            binding_type,
            scope,
            dependencies,
        }
    }

    /// The key this binding satisfies.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The declaring element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Where this binding came from.
    pub fn kind(&self) -> ContributionKind {
        self.kind
    }

    /// Unique, set contribution, or map contribution.
    pub fn binding_type(&self) -> BindingType {
        self.binding_type
    }

    /// The binding's scope annotation, if any.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// The binding's own dependency requests, in declaration order.
    pub fn dependencies(&self) -> &[DependencyRequest] {
        &self.dependencies
    }
}

/// A binding whose value is produced asynchronously by the emitting backend.
///
/// Production bindings are never scoped; lifetime is managed by the
/// production pipeline, not the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionBinding {
    key: Key,
    element: Element,
    binding_type: BindingType,
    dependencies: Vec<DependencyRequest>,
}

impl ProductionBinding {
    /// Creates a production binding.
    pub fn new(
        key: Key,
        element: Element,
        binding_type: BindingType,
        dependencies: Vec<DependencyRequest>,
    ) -> Self {
        Self {
            key,
            element,
            binding_type,
            dependencies,
        }
    }

    /// The key this binding satisfies.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The declaring element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Unique, set contribution, or map contribution.
    pub fn binding_type(&self) -> BindingType {
        self.binding_type
    }

    /// The binding's own dependency requests.
    pub fn dependencies(&self) -> &[DependencyRequest] {
        &self.dependencies
    }
}

/// A binding that populates the members of an already-constructed instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersInjectionBinding {
    target: TypeRef,
    element: Element,
    dependencies: Vec<DependencyRequest>,
}

impl MembersInjectionBinding {
    /// Creates a members-injection binding for `target`.
    pub fn new(target: TypeRef, element: Element, dependencies: Vec<DependencyRequest>) -> Self {
        Self {
            target,
            element,
            dependencies,
        }
    }

    /// The type whose members are injected.
    pub fn target(&self) -> &TypeRef {
        &self.target
    }

    /// The declaring element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Requests for each injected member, in declaration order.
    pub fn dependencies(&self) -> &[DependencyRequest] {
        &self.dependencies
    }
}

/// A declared way to satisfy a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Synchronous provision.
    Provision(ProvisionBinding),
    /// Asynchronous production.
    Production(ProductionBinding),
    /// Members injection into an existing instance.
    MembersInjection(MembersInjectionBinding),
}

impl Binding {
    /// The binding key this binding satisfies.
    pub fn binding_key(&self) -> BindingKey {
        match self {
            Binding::Provision(b) => BindingKey::contribution(b.key().clone()),
            Binding::Production(b) => BindingKey::contribution(b.key().clone()),
            Binding::MembersInjection(b) => {
                BindingKey::members_injection(Key::for_type(b.target().clone()))
            }
        }
    }

    /// The declaring element, for diagnostics.
    pub fn element(&self) -> &Element {
        match self {
            Binding::Provision(b) => b.element(),
            Binding::Production(b) => b.element(),
            Binding::MembersInjection(b) => b.element(),
        }
    }

    /// The binding's own dependency requests.
    pub fn dependencies(&self) -> &[DependencyRequest] {
        match self {
            Binding::Provision(b) => b.dependencies(),
            Binding::Production(b) => b.dependencies(),
            Binding::MembersInjection(b) => b.dependencies(),
        }
    }

    /// The contribution type, for contribution bindings.
    pub fn binding_type(&self) -> Option<BindingType> {
        match self {
            Binding::Provision(b) => Some(b.binding_type()),
            Binding::Production(b) => Some(b.binding_type()),
            Binding::MembersInjection(_) => None,
        }
    }

    /// The scope annotation, if this binding can carry one.
    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Binding::Provision(b) => b.scope(),
            Binding::Production(_) | Binding::MembersInjection(_) => None,
        }
    }

    /// Whether this is a contribution (provision or production) binding.
    pub fn is_contribution(&self) -> bool {
        match self {
            Binding::Provision(_) | Binding::Production(_) => true,
            Binding::MembersInjection(_) => false,
        }
    }
}
