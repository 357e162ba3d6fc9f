//! Validation diagnostics and engine faults.
//!
//! Two distinct failure channels, deliberately kept apart:
//!
//! - [`Diagnostic`]: a problem in the *input program* (missing binding,
//!   duplicate bindings, cycle, scope violation). Accumulated into a
//!   [`ValidationReport`]; validation always runs to completion.
//! - [`GraphFault`]: a violated invariant of the *engine itself*. Aborts
//!   processing of the component; never shown as a user diagnostic.

use std::fmt;

use graft_model::{Element, TypeRef};
use thiserror::Error;

/// Category of validation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A requested key has zero satisfying bindings.
    MissingBinding,
    /// More than one binding satisfies a key where only one is allowed.
    DuplicateBindings,
    /// A key is satisfied by bindings disagreeing on binding type
    /// (unique vs. set vs. map).
    MultipleBindingTypes,
    /// A request path revisits one of its own ancestor keys.
    DependencyCycle,
    /// A resolved binding's scope disagrees with its owning component's.
    ScopeMismatch,
    /// The component's scoped-dependency declarations violate the hierarchy
    /// rules.
    ScopeHierarchyViolation,
}

impl ErrorKind {
    /// Human-readable name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::MissingBinding => "missing binding",
            ErrorKind::DuplicateBindings => "duplicate bindings",
            ErrorKind::MultipleBindingTypes => "multiple binding types",
            ErrorKind::DependencyCycle => "dependency cycle",
            ErrorKind::ScopeMismatch => "scope mismatch",
            ErrorKind::ScopeHierarchyViolation => "scope hierarchy violation",
        }
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious but not fatal to the run.
    Warning,
    /// The graph cannot be emitted from.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One validation finding: a kind, a severity, a message, and the syntactic
/// elements it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of this diagnostic.
    pub kind: ErrorKind,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message. May span multiple lines; offending bindings
    /// are aggregated into one message rather than one diagnostic each.
    pub message: String,
    /// Elements for source-location attribution.
    pub elements: Vec<Element>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self::with_severity(kind, Severity::Error, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(kind: ErrorKind, message: String) -> Self {
        Self::with_severity(kind, Severity::Warning, message)
    }

    /// Internal constructor with explicit severity.
    pub fn with_severity(kind: ErrorKind, severity: Severity, message: String) -> Self {
        Self {
            kind,
            severity,
            message,
            elements: Vec::new(),
        }
    }

    /// Attributes an additional element. Returns self for chaining.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Attributes several elements at once.
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity,
            self.kind.name(),
            self.message
        )
    }
}

/// The accumulated findings for one component's graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    component: TypeRef,
    items: Vec<Diagnostic>,
}

impl ValidationReport {
    /// An empty report about `component`.
    pub fn about(component: TypeRef) -> Self {
        Self {
            component,
            items: Vec::new(),
        }
    }

    /// The component this report describes.
    pub fn component(&self) -> &TypeRef {
        &self.component
    }

    /// All findings, in the order they were detected.
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    /// Adds a finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// True when the report contains no error-severity findings.
    ///
    /// Warnings do not make a report unclean; emission may proceed.
    pub fn is_clean(&self) -> bool {
        self.items.iter().all(|d| d.severity != Severity::Error)
    }
}

/// An unrecoverable defect in graph construction.
///
/// These indicate the engine's own invariants were violated, not a problem in
/// the input program. Processing of the affected component stops.
#[derive(Debug, Error)]
pub enum GraphFault {
    /// A contribution key resolved to members-injection bindings or vice
    /// versa.
    #[error("binding key '{key}' holds bindings of the wrong kind")]
    MixedBindingKinds {
        /// Display rendering of the offending binding key.
        key: String,
    },

    /// A key reachable from an entry point has no entry in the resolved map.
    ///
    /// Graph construction guarantees closure over reachable keys; an absent
    /// entry means the builder and validator disagree about the graph.
    #[error("key '{key}' is reachable but was never resolved")]
    UnresolvedKey {
        /// Display rendering of the missing binding key.
        key: String,
    },

    /// The planner could not make progress on a graph that was reported
    /// clean. Only a cyclic graph can stall the planner, and clean graphs
    /// are acyclic.
    #[error("initialization planning stalled with {remaining} keys unordered")]
    PlanStalled {
        /// Number of keys left without a position.
        remaining: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_model::Span;

    fn element(name: &str) -> Element {
        Element::new(name, Span::new(0, 0, 0, 1))
    }

    #[test]
    fn test_error_creation() {
        let d = Diagnostic::new(
            ErrorKind::MissingBinding,
            "Widget cannot be provided".to_string(),
        );
        assert_eq!(d.kind, ErrorKind::MissingBinding);
        assert_eq!(d.severity, Severity::Error);
        assert!(d.elements.is_empty());
    }

    #[test]
    fn test_element_chaining() {
        let d = Diagnostic::new(ErrorKind::DuplicateBindings, "two providers".to_string())
            .with_element(element("ModuleA.provide()"))
            .with_element(element("ModuleB.provide()"));
        assert_eq!(d.elements.len(), 2);
    }

    #[test]
    fn test_report_clean_with_warnings_only() {
        let mut report = ValidationReport::about(TypeRef::named("AppComponent"));
        assert!(report.is_clean());

        report.push(Diagnostic::warning(
            ErrorKind::ScopeHierarchyViolation,
            "non-hierarchical scopes".to_string(),
        ));
        assert!(report.is_clean());

        report.push(Diagnostic::new(
            ErrorKind::MissingBinding,
            "Widget cannot be provided".to_string(),
        ));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(
            ErrorKind::DependencyCycle,
            "A depends on itself".to_string(),
        );
        let rendered = d.to_string();
        assert!(rendered.contains("error"));
        assert!(rendered.contains("dependency cycle"));
        assert!(rendered.contains("A depends on itself"));
    }
}
