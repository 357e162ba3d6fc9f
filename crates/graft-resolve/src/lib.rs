// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Binding-graph resolution for graft.
//!
//! Given the model facts a front-end produces (`graft-model`), this crate
//! builds one binding graph per component, validates it, and plans the order
//! in which a backend would initialize its bindings:
//!
//! 1. [`InjectBindingRegistry`] indexes declared bindings and synthesizes
//!    injectable-constructor and members-injection bindings on demand.
//! 2. [`build_graph`] closes over every key reachable from the component's
//!    entry points.
//! 3. [`validate_graph`] reports missing bindings, duplicates, conflicting
//!    binding types, dependency cycles, and scope violations.
//! 4. [`plan_initialization`] orders a clean graph into fixed-size batches,
//!    contributors ahead of their aggregates.
//!
//! All passes are deterministic: the same input produces byte-identical
//! reports and plans.

pub mod error;
pub mod registry;
pub mod resolve;

pub use error::{Diagnostic, ErrorKind, GraphFault, Severity, ValidationReport};
pub use registry::{BindingSource, InjectBindingRegistry};
pub use resolve::{
    build_graph, plan_initialization, validate_graph, BindingGraph, InitializationPlan, PlanStep,
    ResolvedBindings, ScopeHierarchyCheck, ValidatorOptions, DEFAULT_BATCH_SIZE,
};
