//! Graph validation: cycles, cardinality, and scope rules.
//!
//! [`validate_graph`] walks a built [`BindingGraph`] and accumulates every
//! finding into a [`ValidationReport`]. It never stops at the first problem:
//! a cycle prunes only the branch that closed it, and every entry point is
//! traversed regardless of earlier findings. The only aborts are
//! [`GraphFault`]s, which signal the engine's own invariants were violated.
//!
//! Traversal state is explicit: the request path, the per-entry-point visited
//! set, and the report are threaded through the recursion as arguments.

use std::collections::HashSet;

use graft_model::{
    BindingKey, BindingKeyKind, BindingType, DependencyRequest, Element,
};
use indexmap::IndexSet;
use tracing::debug;

use crate::error::{Diagnostic, ErrorKind, GraphFault, Severity, ValidationReport};
use crate::resolve::graph::{BindingGraph, ResolvedBindings};
use crate::resolve::scopes;

/// How many offending bindings a duplicate diagnostic lists before
/// summarizing the rest.
const DUPLICATE_LIMIT: usize = 10;

/// Whether, and how loudly, to check the scoped-dependency chain for
/// repeated scopes.
///
/// Only the chain walk is configurable. The structural scope rules (at most
/// one scoped dependency, root-scope terminality, no scoped dependencies on
/// an unscoped component) are always enforced as errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeHierarchyCheck {
    /// Report repeated scopes as errors.
    #[default]
    Error,
    /// Report repeated scopes as warnings.
    Warning,
    /// Skip the chain walk entirely.
    Disabled,
}

impl ScopeHierarchyCheck {
    /// The severity a chain finding is reported at, or `None` when disabled.
    pub fn severity(self) -> Option<Severity> {
        match self {
            ScopeHierarchyCheck::Error => Some(Severity::Error),
            ScopeHierarchyCheck::Warning => Some(Severity::Warning),
            ScopeHierarchyCheck::Disabled => None,
        }
    }
}

/// Validator configuration, fixed for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Scoped-dependency chain checking.
    pub scope_hierarchy: ScopeHierarchyCheck,
}

/// Validates a built graph, returning the complete report.
pub fn validate_graph(
    graph: &BindingGraph,
    options: &ValidatorOptions,
) -> Result<ValidationReport, GraphFault> {
    let mut report = ValidationReport::about(graph.component().definition().clone());

    scopes::validate_binding_scopes(graph, &mut report);
    scopes::validate_scope_hierarchy(graph.component(), options, &mut report);

    for entry_point in graph.entry_points() {
        debug!(entry = %entry_point.site(), "validating entry point");
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        traverse(graph, entry_point, &mut path, &mut visited, &mut report)?;
    }

    Ok(report)
}

/// Validates one request and everything below it.
///
/// `path` holds the requests from the entry point down to (and including)
/// `request` while its subtree is being validated. `visited` memoizes fully
/// validated keys for the current entry point.
fn traverse<'g>(
    graph: &'g BindingGraph,
    request: &'g DependencyRequest,
    path: &mut Vec<&'g DependencyRequest>,
    visited: &mut HashSet<BindingKey>,
    report: &mut ValidationReport,
) -> Result<(), GraphFault> {
    path.push(request);
    let key = BindingKey::for_request(request);

    // Cycle check before the memo: every frame above the current one
    // participates, the root included.
    let cycle = path[..path.len() - 1]
        .iter()
        .any(|ancestor| BindingKey::for_request(ancestor) == key);
    if cycle {
        report.push(cycle_diagnostic(path));
        path.pop();
        return Ok(());
    }

    if !visited.insert(key.clone()) {
        path.pop();
        return Ok(());
    }

    let resolved = graph
        .get(&key)
        .ok_or_else(|| GraphFault::UnresolvedKey {
            key: key.to_string(),
        })?;
    validate_resolved(resolved, path, report)?;

    for binding in resolved.bindings() {
        for dependency in binding.dependencies() {
            traverse(graph, dependency, path, visited, report)?;
        }
    }

    path.pop();
    Ok(())
}

/// Cardinality rules for one key's resolved set.
fn validate_resolved(
    resolved: &ResolvedBindings,
    path: &[&DependencyRequest],
    report: &mut ValidationReport,
) -> Result<(), GraphFault> {
    let key = resolved.key();
    for binding in resolved.bindings() {
        let kind_matches = match key.kind() {
            BindingKeyKind::Contribution => binding.is_contribution(),
            BindingKeyKind::MembersInjection => !binding.is_contribution(),
        };
        if !kind_matches {
            return Err(GraphFault::MixedBindingKinds {
                key: key.to_string(),
            });
        }
    }

    if resolved.is_empty() {
        report.push(missing_binding_diagnostic(key, path));
        return Ok(());
    }

    if key.kind() == BindingKeyKind::MembersInjection {
        // Cannot occur with a memoizing registry; reported rather than
        // ignored if a source misbehaves.
        if resolved.bindings().len() > 1 {
            report.push(
                Diagnostic::new(
                    ErrorKind::DuplicateBindings,
                    format!("{key} is bound multiple times"),
                )
                .with_elements(resolved.bindings().iter().map(|b| b.element().clone())),
            );
        }
        return Ok(());
    }

    let binding_types: IndexSet<BindingType> = resolved
        .bindings()
        .iter()
        .filter_map(|b| b.binding_type())
        .collect();
    if binding_types.len() > 1 {
        let mut message = format!("{key} is bound with conflicting binding types:");
        for binding in resolved.bindings() {
            if let Some(binding_type) = binding.binding_type() {
                message.push_str(&format!(
                    "\n    {} binding at {}",
                    binding_type.name(),
                    binding.element()
                ));
            }
        }
        report.push(
            Diagnostic::new(ErrorKind::MultipleBindingTypes, message)
                .with_elements(resolved.bindings().iter().map(|b| b.element().clone())),
        );
        return Ok(());
    }

    let unique = binding_types.first() == Some(&BindingType::Unique);
    if unique && resolved.bindings().len() > 1 {
        let mut message = format!("{key} is bound multiple times:");
        for binding in resolved.bindings().iter().take(DUPLICATE_LIMIT) {
            message.push_str(&format!("\n    {}", binding.element()));
        }
        let rest = resolved.bindings().len().saturating_sub(DUPLICATE_LIMIT);
        if rest > 0 {
            message.push_str(&format!("\n    and {rest} others"));
        }
        report.push(
            Diagnostic::new(ErrorKind::DuplicateBindings, message)
                .with_elements(resolved.bindings().iter().map(|b| b.element().clone())),
        );
    }

    Ok(())
}

fn missing_binding_diagnostic(key: &BindingKey, path: &[&DependencyRequest]) -> Diagnostic {
    let mut message = match key.kind() {
        BindingKeyKind::Contribution => format!("{key} cannot be provided"),
        BindingKeyKind::MembersInjection => {
            format!("members of {} cannot be injected", key.key())
        }
    };
    // The entry-point frame is elided; it is the diagnostic's attribution.
    for request in path.iter().skip(1) {
        message.push_str(&format!("\n    {} requested at {}", request.key(), request.site()));
    }
    Diagnostic::new(ErrorKind::MissingBinding, message).with_element(entry_element(path))
}

fn cycle_diagnostic(path: &[&DependencyRequest]) -> Diagnostic {
    let mut message = String::from("found a dependency cycle:");
    for request in path.iter().skip(1) {
        message.push_str(&format!("\n    {} requested at {}", request.key(), request.site()));
    }
    Diagnostic::new(ErrorKind::DependencyCycle, message).with_element(entry_element(path))
}

fn entry_element(path: &[&DependencyRequest]) -> Element {
    path.first()
        .map(|request| request.site().clone())
        .unwrap_or_else(|| Element::new("<unknown>", graft_model::Span::new(0, 0, 0, 0)))
}
