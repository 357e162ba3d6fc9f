//! Initialization planning: a stable topological order over the graph's
//! keys, expanded into framework-initialization steps and partitioned into
//! fixed-size batches.
//!
//! The planner only accepts validated graphs. On a clean graph the order is
//! total; a stall means the graph was cyclic and is reported as a
//! [`GraphFault`], never as a user diagnostic.

use graft_model::{BindingKey, BindingType, Element};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GraphFault;
use crate::resolve::graph::{BindingGraph, ResolvedBindings};

/// The generated-method size cap batches default to.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// One framework-initialization action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStep {
    /// Initialize the single binding for a key.
    Binding {
        /// The key being initialized.
        key: BindingKey,
        /// The binding's declaring element.
        element: Element,
    },
    /// Initialize one contributor feeding a multibinding aggregate.
    Contribution {
        /// The aggregated key the contribution feeds.
        key: BindingKey,
        /// The contributing element.
        contributor: Element,
    },
    /// Assemble a multibinding aggregate from its initialized contributors.
    Aggregate {
        /// The aggregated key.
        key: BindingKey,
        /// Number of contributions feeding the aggregate.
        contributions: usize,
    },
}

impl PlanStep {
    /// The key this step initializes or feeds.
    pub fn key(&self) -> &BindingKey {
        match self {
            PlanStep::Binding { key, .. }
            | PlanStep::Contribution { key, .. }
            | PlanStep::Aggregate { key, .. } => key,
        }
    }
}

/// The ordered, batched initialization schedule for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializationPlan {
    batches: Vec<Vec<PlanStep>>,
}

impl InitializationPlan {
    /// The batches, in execution order.
    pub fn batches(&self) -> &[Vec<PlanStep>] {
        &self.batches
    }

    /// All steps across batches, in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &PlanStep> {
        self.batches.iter().flatten()
    }
}

/// Plans initialization for a validated graph.
///
/// Keys are ordered so that every key's dependencies precede it; ties break
/// by the graph's resolution order, so the output is identical across runs.
/// The ordered key list is chunked into batches of at most `batch_size`
/// keys, order preserved within and across batches.
pub fn plan_initialization(
    graph: &BindingGraph,
    batch_size: usize,
) -> Result<InitializationPlan, GraphFault> {
    let ordered = stable_topological_order(graph)?;
    debug!(keys = ordered.len(), batch_size, "planning initialization");

    let mut batches = Vec::new();
    for chunk in ordered.chunks(batch_size.max(1)) {
        let mut steps = Vec::new();
        for key in chunk {
            let resolved = graph.get(key).ok_or_else(|| GraphFault::UnresolvedKey {
                key: key.to_string(),
            })?;
            expand_key(resolved, &mut steps);
        }
        batches.push(steps);
    }

    Ok(InitializationPlan { batches })
}

/// Emits, in resolution order, every key whose dependency keys have already
/// been emitted, until the graph is exhausted.
fn stable_topological_order(graph: &BindingGraph) -> Result<Vec<BindingKey>, GraphFault> {
    let total = graph.resolved().len();
    let mut emitted: IndexSet<BindingKey> = IndexSet::with_capacity(total);

    while emitted.len() < total {
        let before = emitted.len();
        for (key, resolved) in graph.resolved() {
            if emitted.contains(key) {
                continue;
            }
            let ready = resolved.bindings().iter().all(|binding| {
                binding
                    .dependencies()
                    .iter()
                    .all(|dependency| emitted.contains(&BindingKey::for_request(dependency)))
            });
            if ready {
                emitted.insert(key.clone());
            }
        }
        if emitted.len() == before {
            return Err(GraphFault::PlanStalled {
                remaining: total - emitted.len(),
            });
        }
    }

    Ok(emitted.into_iter().collect())
}

/// Expands one key into its steps: contributors then the aggregate for
/// multibindings, a single binding step otherwise.
fn expand_key(resolved: &ResolvedBindings, steps: &mut Vec<PlanStep>) {
    let aggregated = resolved.bindings().iter().any(|binding| {
        matches!(
            binding.binding_type(),
            Some(BindingType::Set) | Some(BindingType::Map)
        )
    });

    if aggregated {
        for binding in resolved.bindings() {
            steps.push(PlanStep::Contribution {
                key: resolved.key().clone(),
                contributor: binding.element().clone(),
            });
        }
        steps.push(PlanStep::Aggregate {
            key: resolved.key().clone(),
            contributions: resolved.bindings().len(),
        });
    } else if let Some(binding) = resolved.bindings().first() {
        steps.push(PlanStep::Binding {
            key: resolved.key().clone(),
            element: binding.element().clone(),
        });
    }
}
