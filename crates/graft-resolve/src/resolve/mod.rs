//! The resolution pipeline: build, validate, plan.
//!
//! The three passes run in order per component. [`graph::build_graph`]
//! computes the reachable-binding closure and never diagnoses;
//! [`validation::validate_graph`] judges the closure and accumulates a
//! report; [`planner::plan_initialization`] orders a clean graph for the
//! emitting backend.

pub mod graph;
pub mod planner;
pub mod scopes;
pub mod validation;

pub use graph::{build_graph, BindingGraph, ResolvedBindings};
pub use planner::{plan_initialization, InitializationPlan, PlanStep, DEFAULT_BATCH_SIZE};
pub use validation::{validate_graph, ScopeHierarchyCheck, ValidatorOptions};
