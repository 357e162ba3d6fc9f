//! Binding-graph construction.
//!
//! [`build_graph`] computes the transitive closure of bindings reachable from
//! a component's entry points. Each [`BindingKey`] is resolved exactly once;
//! the resulting map covers every reachable key, including keys that resolved
//! to nothing. Construction never fails and never diagnoses: missing and
//! conflicting bindings are recorded as-is and judged by the validator.
//!
//! # Resolution order for a contribution key
//!
//! 1. bindings declared by the component's own modules;
//! 2. a synthetic dependency-method binding for each declared dependency
//!    component exposing the key through a provision-like entry point;
//! 3. a synthetic component-instance binding when the key is the component's
//!    own definition type, unqualified and unwrapped;
//! 4. if nothing was found, a binding synthesized from the type's injectable
//!    constructor.
//!
//! Members-injection keys resolve solely through synthesis.

use std::collections::VecDeque;
use std::rc::Rc;

use graft_model::{
    Binding, BindingKey, BindingKeyKind, BindingType, ComponentDescriptor, ContributionKind,
    DependencyRequest, Key, ProvisionBinding, TypeRef,
};
use indexmap::IndexMap;
use tracing::debug;

use crate::registry::BindingSource;

/// Everything one binding key resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedBindings {
    key: BindingKey,
    owner: TypeRef,
    bindings: Vec<Rc<Binding>>,
}

impl ResolvedBindings {
    fn new(key: BindingKey, owner: TypeRef, bindings: Vec<Rc<Binding>>) -> Self {
        Self {
            key,
            owner,
            bindings,
        }
    }

    /// The key these bindings satisfy.
    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    /// The component the bindings belong to.
    ///
    /// This is the dependency component when the key is satisfied only by
    /// that dependency's provision methods, otherwise the component the graph
    /// was built for.
    pub fn owner(&self) -> &TypeRef {
        &self.owner
    }

    /// The satisfying bindings, in resolution order.
    pub fn bindings(&self) -> &[Rc<Binding>] {
        &self.bindings
    }

    /// True when the key resolved to nothing.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The resolved dependency graph of one component.
#[derive(Debug, Clone)]
pub struct BindingGraph {
    component: ComponentDescriptor,
    resolved: IndexMap<BindingKey, ResolvedBindings>,
}

impl BindingGraph {
    /// The component this graph was built for.
    pub fn component(&self) -> &ComponentDescriptor {
        &self.component
    }

    /// All resolved keys, in resolution order.
    ///
    /// Iteration order is the deterministic declaration order downstream
    /// passes rely on.
    pub fn resolved(&self) -> &IndexMap<BindingKey, ResolvedBindings> {
        &self.resolved
    }

    /// The resolution of one key, if it is reachable in this graph.
    pub fn get(&self, key: &BindingKey) -> Option<&ResolvedBindings> {
        self.resolved.get(key)
    }

    /// The component's entry-point requests.
    pub fn entry_points(&self) -> &[DependencyRequest] {
        self.component.entry_points()
    }
}

/// Builds the binding graph for `component`, resolving every key reachable
/// from its entry points through `source`.
pub fn build_graph(component: &ComponentDescriptor, source: &mut dyn BindingSource) -> BindingGraph {
    let mut resolved: IndexMap<BindingKey, ResolvedBindings> = IndexMap::new();
    let mut worklist: VecDeque<BindingKey> = component
        .entry_points()
        .iter()
        .map(BindingKey::for_request)
        .collect();

    while let Some(key) = worklist.pop_front() {
        if resolved.contains_key(&key) {
            continue;
        }
        let entry = resolve_key(component, &key, source);
        debug!(key = %key, bindings = entry.bindings().len(), "resolved binding key");
        for binding in entry.bindings() {
            for dependency in binding.dependencies() {
                let dependency_key = BindingKey::for_request(dependency);
                if !resolved.contains_key(&dependency_key) {
                    worklist.push_back(dependency_key);
                }
            }
        }
        resolved.insert(key, entry);
    }

    BindingGraph {
        component: component.clone(),
        resolved,
    }
}

fn resolve_key(
    component: &ComponentDescriptor,
    key: &BindingKey,
    source: &mut dyn BindingSource,
) -> ResolvedBindings {
    match key.kind() {
        BindingKeyKind::Contribution => resolve_contribution(component, key, source),
        BindingKeyKind::MembersInjection => {
            let bindings = source
                .synthesize_members_injection(key.key().ty())
                .into_iter()
                .collect();
            ResolvedBindings::new(key.clone(), component.definition().clone(), bindings)
        }
    }
}

fn resolve_contribution(
    component: &ComponentDescriptor,
    key: &BindingKey,
    source: &mut dyn BindingSource,
) -> ResolvedBindings {
    let mut bindings = source.resolve_declared(key.key());
    let declared_count = bindings.len();

    let mut dependency_owner: Option<TypeRef> = None;
    collect_dependency_methods(component.dependencies(), key.key(), &mut bindings, &mut |owner| {
        dependency_owner = match dependency_owner.take() {
            None => Some(owner.clone()),
            // Two different ancestors exposing the key is a duplicate the
            // validator reports; attribution falls back to this component.
            Some(existing) if existing == *owner => Some(existing),
            Some(_) => Some(component.definition().clone()),
        };
    });

    if key.key() == &Key::for_type(component.definition().clone()) {
        bindings.push(Rc::new(Binding::Provision(ProvisionBinding::new(
            key.key().clone(),
            component.element().clone(),
            ContributionKind::ComponentInstance,
            BindingType::Unique,
            None,
            vec![],
        ))));
    }

    if bindings.is_empty() {
        bindings.extend(source.synthesize_injectable(key.key().ty()));
    }

    let only_dependency_methods = declared_count == 0 && bindings.len() > declared_count;
    let owner = match dependency_owner {
        Some(owner) if only_dependency_methods && bindings.len() == 1 => owner,
        _ => component.definition().clone(),
    };
    ResolvedBindings::new(key.clone(), owner, bindings)
}

/// Walks the dependency-component chain collecting a synthetic provision
/// binding for every ancestor exposing `key`.
fn collect_dependency_methods(
    dependencies: &[ComponentDescriptor],
    key: &Key,
    bindings: &mut Vec<Rc<Binding>>,
    on_owner: &mut dyn FnMut(&TypeRef),
) {
    for dependency in dependencies {
        if let Some(entry_point) = dependency.exposed_provision(key) {
            bindings.push(Rc::new(Binding::Provision(ProvisionBinding::new(
                key.clone(),
                entry_point.site().clone(),
                ContributionKind::DependencyMethod,
                BindingType::Unique,
                None,
                vec![],
            ))));
            on_owner(dependency.definition());
        }
        collect_dependency_methods(dependency.dependencies(), key, bindings, on_owner);
    }
}
