//! The binding registry: the lookup capability behind graph construction.
//!
//! [`BindingSource`] is the seam between the resolver and the front-end's
//! knowledge of declared bindings. [`InjectBindingRegistry`] is the standard
//! implementation: module-declared contributions indexed by key, plus lazily
//! synthesized bindings for injectable constructors and members injection.
//!
//! Synthesis is memoized in maps owned by the registry; entries are never
//! recomputed or invalidated. A second request for the same type returns the
//! same `Rc`.

use std::rc::Rc;

use graft_model::{
    Binding, BindingType, ComponentDescriptor, ContributionKind, DependencyRequest, Element, Key,
    MembersInjectionBinding, ProvisionBinding, Scope, TypeRef,
};
use indexmap::IndexMap;
use tracing::debug;

/// Lookup capability injected into the graph builder.
pub trait BindingSource {
    /// The module-declared contribution bindings for a key.
    ///
    /// Multibinding contributions are never deduplicated: every contributing
    /// method is a distinct binding even when their keys collide.
    fn resolve_declared(&self, key: &Key) -> Vec<Rc<Binding>>;

    /// The provision binding synthesized from `ty`'s injectable constructor,
    /// if it has one. Memoized.
    fn synthesize_injectable(&mut self, ty: &TypeRef) -> Option<Rc<Binding>>;

    /// The members-injection binding for `ty`, if it declares injectable
    /// members. Memoized.
    fn synthesize_members_injection(&mut self, ty: &TypeRef) -> Option<Rc<Binding>>;
}

/// An injectable-constructor fact: enough to synthesize a provision binding
/// on first reference.
#[derive(Debug, Clone)]
struct InjectableConstructor {
    element: Element,
    scope: Option<Scope>,
    dependencies: Vec<DependencyRequest>,
}

/// Declared member-injection sites for one type.
#[derive(Debug, Clone)]
struct MemberSites {
    element: Element,
    dependencies: Vec<DependencyRequest>,
}

/// The standard [`BindingSource`]: declared contributions plus lazy,
/// memoized synthesis.
#[derive(Debug, Default)]
pub struct InjectBindingRegistry {
    declared: IndexMap<Key, Vec<Rc<Binding>>>,
    constructors: IndexMap<TypeRef, InjectableConstructor>,
    member_sites: IndexMap<TypeRef, MemberSites>,
    synthesized_provisions: IndexMap<TypeRef, Rc<Binding>>,
    synthesized_members: IndexMap<TypeRef, Rc<Binding>>,
}

impl InjectBindingRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every binding declared by `component`'s own modules.
    ///
    /// Dependency components are deliberately not merged: their bindings are
    /// reachable only through the provision methods they expose, which the
    /// graph builder synthesizes per key.
    pub fn install_component(&mut self, component: &ComponentDescriptor) {
        for module in component.modules() {
            for binding in module.bindings() {
                self.install_binding(binding.clone());
            }
        }
    }

    /// Indexes one declared binding.
    pub fn install_binding(&mut self, binding: Binding) {
        let key = binding.binding_key().key().clone();
        self.declared.entry(key).or_default().push(Rc::new(binding));
    }

    /// Records that `ty` has an injectable constructor.
    ///
    /// The provision binding itself is synthesized lazily on first reference.
    pub fn register_injectable(
        &mut self,
        ty: TypeRef,
        element: Element,
        scope: Option<Scope>,
        dependencies: Vec<DependencyRequest>,
    ) {
        self.constructors.insert(
            ty,
            InjectableConstructor {
                element,
                scope,
                dependencies,
            },
        );
    }

    /// Records that `ty` declares injectable members.
    pub fn register_members_injection(
        &mut self,
        ty: TypeRef,
        element: Element,
        dependencies: Vec<DependencyRequest>,
    ) {
        self.member_sites.insert(
            ty,
            MemberSites {
                element,
                dependencies,
            },
        );
    }
}

impl BindingSource for InjectBindingRegistry {
    fn resolve_declared(&self, key: &Key) -> Vec<Rc<Binding>> {
        self.declared.get(key).cloned().unwrap_or_default()
    }

    fn synthesize_injectable(&mut self, ty: &TypeRef) -> Option<Rc<Binding>> {
        if let Some(existing) = self.synthesized_provisions.get(ty) {
            return Some(Rc::clone(existing));
        }
        let fact = self.constructors.get(ty)?;
        debug!(ty = %ty, "synthesizing injectable-constructor binding");
        let binding = Rc::new(Binding::Provision(ProvisionBinding::new(
            Key::for_type(ty.clone()),
            fact.element.clone(),
            ContributionKind::InjectionConstructor,
            BindingType::Unique,
            fact.scope.clone(),
            fact.dependencies.clone(),
        )));
        self.synthesized_provisions
            .insert(ty.clone(), Rc::clone(&binding));
        Some(binding)
    }

    fn synthesize_members_injection(&mut self, ty: &TypeRef) -> Option<Rc<Binding>> {
        if let Some(existing) = self.synthesized_members.get(ty) {
            return Some(Rc::clone(existing));
        }
        let sites = self.member_sites.get(ty)?;
        debug!(ty = %ty, "synthesizing members-injection binding");
        let binding = Rc::new(Binding::MembersInjection(MembersInjectionBinding::new(
            ty.clone(),
            sites.element.clone(),
            sites.dependencies.clone(),
        )));
        self.synthesized_members
            .insert(ty.clone(), Rc::clone(&binding));
        Some(binding)
    }
}
