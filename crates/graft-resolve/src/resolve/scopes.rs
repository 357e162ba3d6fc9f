//! Scope validation: binding/component compatibility and the
//! scoped-dependency hierarchy.

use graft_model::{ComponentDescriptor, Scope, TypeRef};
use tracing::debug;

use crate::error::{Diagnostic, ErrorKind, Severity, ValidationReport};
use crate::resolve::graph::BindingGraph;
use crate::resolve::validation::ValidatorOptions;

/// Checks every resolved provision binding's scope against the component's.
///
/// A scoped binding may only be installed in a component carrying the same
/// scope. Unscoped bindings are usable anywhere and are never flagged. All
/// offenders are aggregated into a single diagnostic.
pub fn validate_binding_scopes(graph: &BindingGraph, report: &mut ValidationReport) {
    let component_scope = graph.component().scope();
    let mut offenders = Vec::new();

    for resolved in graph.resolved().values() {
        for binding in resolved.bindings() {
            if let Some(scope) = binding.scope() {
                if Some(scope) != component_scope {
                    offenders.push((scope.clone(), binding.element().clone()));
                }
            }
        }
    }

    if offenders.is_empty() {
        return;
    }

    let component_rendering = match component_scope {
        Some(scope) => format!("{} (scoped {scope})", graph.component().definition()),
        None => format!("{} (unscoped)", graph.component().definition()),
    };
    let mut message = format!(
        "{component_rendering} may not reference bindings with different scopes:"
    );
    for (scope, element) in &offenders {
        message.push_str(&format!("\n    {scope} binding at {element}"));
    }
    report.push(
        Diagnostic::new(ErrorKind::ScopeMismatch, message)
            .with_elements(offenders.into_iter().map(|(_, element)| element)),
    );
}

/// Structural rules for the component's scoped dependencies, then the chain
/// walk for repeated scopes.
///
/// The structural rules are always errors. Only the chain walk is subject to
/// [`ValidatorOptions::scope_hierarchy`].
pub fn validate_scope_hierarchy(
    component: &ComponentDescriptor,
    options: &ValidatorOptions,
    report: &mut ValidationReport,
) {
    let scoped: Vec<&ComponentDescriptor> = component
        .dependencies()
        .iter()
        .filter(|dependency| dependency.scope().is_some())
        .collect();

    if scoped.len() > 1 {
        let mut message = format!(
            "{} depends on more than one scoped component:",
            component.definition()
        );
        for dependency in &scoped {
            message.push_str(&format!("\n    {}", dependency.definition()));
        }
        report.push(
            Diagnostic::new(ErrorKind::ScopeHierarchyViolation, message)
                .with_element(component.element().clone()),
        );
        return;
    }

    match component.scope() {
        Some(scope) if scope.is_root() => {
            if let Some(dependency) = scoped.first() {
                // Terminality is never downgraded or suppressed.
                let message = format!(
                    "{scope} component {} may not depend on scoped component {}",
                    component.definition(),
                    dependency.definition()
                );
                report.push(
                    Diagnostic::new(ErrorKind::ScopeHierarchyViolation, message)
                        .with_element(component.element().clone()),
                );
            }
        }
        Some(_) => {
            let Some(severity) = options.scope_hierarchy.severity() else {
                debug!("scoped-dependency chain walk disabled");
                return;
            };
            let mut seen = Vec::new();
            let mut chain = Vec::new();
            walk_chain(component, severity, &mut seen, &mut chain, report);
        }
        None => {
            if let Some(dependency) = scoped.first() {
                let message = format!(
                    "unscoped component {} may not depend on scoped component {}",
                    component.definition(),
                    dependency.definition()
                );
                report.push(
                    Diagnostic::new(ErrorKind::ScopeHierarchyViolation, message)
                        .with_element(component.element().clone()),
                );
            }
        }
    }
}

/// Walks the scoped-dependency chain from `component` outward, tracking the
/// scopes seen so far. A component whose scope is already on the stack closes
/// a scope cycle; the diagnostic carries the chain from the root to the
/// repeat.
fn walk_chain(
    component: &ComponentDescriptor,
    severity: Severity,
    seen: &mut Vec<Scope>,
    chain: &mut Vec<TypeRef>,
    report: &mut ValidationReport,
) {
    let Some(scope) = component.scope() else {
        return;
    };

    if seen.contains(scope) {
        chain.push(component.definition().clone());
        let mut message = format!("{scope} is used more than once in a component dependency chain:");
        for definition in chain.iter() {
            message.push_str(&format!("\n    {definition}"));
        }
        report.push(
            Diagnostic::with_severity(ErrorKind::ScopeHierarchyViolation, severity, message)
                .with_element(component.element().clone()),
        );
        chain.pop();
        return;
    }

    seen.push(scope.clone());
    chain.push(component.definition().clone());
    for dependency in component.dependencies() {
        if dependency.scope().is_some() {
            walk_chain(dependency, severity, seen, chain, report);
        }
    }
    chain.pop();
    seen.pop();
}
