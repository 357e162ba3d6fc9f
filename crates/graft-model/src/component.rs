//! Module and component descriptors: the declared shape of an injection
//! configuration, as resolved by the front-end.

use crate::binding::Binding;
use crate::foundation::{Element, Scope, TypeRef};
use crate::key::{DependencyRequest, Key, RequestKind};

/// A module: a named bag of declared contribution bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    ty: TypeRef,
    element: Element,
    bindings: Vec<Binding>,
}

impl ModuleDescriptor {
    /// Creates a module descriptor.
    ///
    /// Every binding should be a contribution; members-injection bindings are
    /// synthesized by the registry, never declared by modules.
    pub fn new(ty: TypeRef, element: Element, bindings: Vec<Binding>) -> Self {
        Self {
            ty,
            element,
            bindings,
        }
    }

    /// The module's defining type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The module's declaring element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The module's declared bindings, in declaration order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// The declared shape of one component.
///
/// Dependency components are carried as full descriptors: the chain they form
/// is what scope-hierarchy validation walks, and their provision-like entry
/// points are the surface they expose to dependents. A descriptor may appear
/// in more than one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    definition: TypeRef,
    element: Element,
    scope: Option<Scope>,
    modules: Vec<ModuleDescriptor>,
    dependencies: Vec<ComponentDescriptor>,
    entry_points: Vec<DependencyRequest>,
}

impl ComponentDescriptor {
    /// Creates a component descriptor.
    pub fn new(
        definition: TypeRef,
        element: Element,
        scope: Option<Scope>,
        modules: Vec<ModuleDescriptor>,
        dependencies: Vec<ComponentDescriptor>,
        entry_points: Vec<DependencyRequest>,
    ) -> Self {
        Self {
            definition,
            element,
            scope,
            modules,
            dependencies,
            entry_points,
        }
    }

    /// The component's defining type.
    pub fn definition(&self) -> &TypeRef {
        &self.definition
    }

    /// The component's declaring element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The component's scope annotation, if any.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Declared modules.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Declared dependency components.
    pub fn dependencies(&self) -> &[ComponentDescriptor] {
        &self.dependencies
    }

    /// Entry-point requests, in declaration order.
    pub fn entry_points(&self) -> &[DependencyRequest] {
        &self.entry_points
    }

    /// The entry point exposing `key` as a provision, if any.
    ///
    /// This is the surface a dependent component resolves against: only
    /// provision-like entry points (not members injection) count.
    pub fn exposed_provision(&self, key: &Key) -> Option<&DependencyRequest> {
        self.entry_points
            .iter()
            .find(|ep| ep.kind() != RequestKind::MembersInjection && ep.key() == key)
    }
}
