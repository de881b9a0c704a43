//! # Response Selection
//!
//! Picks which threats to respond to when the total response hours
//! available cannot cover the whole batch.
//!
//! Two independent strategies consume the same batch and budget:
//! - [`greedy::select_greedy`] - efficiency-ratio heuristic, O(n log n).
//! - [`knapsack::select_optimal`] - exact 0/1 knapsack, O(n * budget).
//!
//! Neither mutates its input. Both refuse threats with a zero resource
//! cost, which the intake layer never produces.

pub mod greedy;
pub mod knapsack;

pub use greedy::select_greedy;
pub use knapsack::select_optimal;

use crate::{Selection, SelectionConfig, SelectionStrategy, Threat, TriageError, TriageResult};

/// Reject any threat whose resource cost is zero.
fn ensure_positive_costs(threats: &[Threat]) -> TriageResult<()> {
    match threats.iter().find(|t| t.resource_cost == 0) {
        Some(t) => Err(TriageError::Contract(format!(
            "threat #{} has a resource cost of 0 hours; selection requires >= 1",
            t.id
        ))),
        None => Ok(()),
    }
}

/// Assemble a [`Selection`] from the chosen threats.
fn build_selection(
    strategy: SelectionStrategy,
    chosen: Vec<Threat>,
    budget: u32,
    config: &SelectionConfig,
) -> Selection {
    let total_severity = chosen.iter().map(|t| u64::from(t.severity)).sum();
    let total_hours: u64 = chosen.iter().map(|t| u64::from(t.resource_cost)).sum();

    Selection {
        strategy,
        chosen,
        total_severity,
        total_hours,
        budget,
        over_budget_advisory: total_hours > config.advisory_hours,
    }
}
