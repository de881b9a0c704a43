//! # Greedy Ratio Selector
//!
//! Orders the batch by severity per response hour (best first, ties by
//! ascending id) and accepts every threat that still fits in the remaining
//! budget. A threat that does not fit is skipped and the scan continues, so
//! cheaper threats further down the order can still fill the leftover
//! hours.
//!
//! Fast, but an early high-ratio pick can block a better combination. Use
//! [`super::knapsack::select_optimal`] when the exact optimum matters.

use crate::ordering::compare_efficiency;
use crate::{Selection, SelectionConfig, SelectionStrategy, Threat, TriageResult};

use super::{build_selection, ensure_positive_costs};

/// Select threats greedily by efficiency ratio.
///
/// # Arguments
/// * `threats` - The batch to choose from. Not modified.
/// * `budget` - Total response hours available.
/// * `config` - Advisory threshold settings.
///
/// # Returns
/// The chosen threats in acceptance order with their totals. Fails only
/// when a threat has a zero resource cost.
pub fn select_greedy(
    threats: &[Threat],
    budget: u32,
    config: &SelectionConfig,
) -> TriageResult<Selection> {
    ensure_positive_costs(threats)?;

    let mut ranked: Vec<&Threat> = threats.iter().collect();
    ranked.sort_by(|a, b| compare_efficiency(a, b));

    let limit = u64::from(budget);
    let mut used: u64 = 0;
    let mut chosen = Vec::new();

    for threat in ranked {
        let cost = u64::from(threat.resource_cost);
        if used + cost <= limit {
            used += cost;
            chosen.push(threat.clone());
        } else {
            log::debug!(
                "[GREEDY] Skipping #{} ({}h): would use {}h of {}h",
                threat.id,
                cost,
                used + cost,
                limit,
            );
        }
    }

    let selection = build_selection(SelectionStrategy::Greedy, chosen, budget, config);
    log::info!(
        "[GREEDY] Chose {} of {} threats: severity {}, {}h of {}h",
        selection.chosen.len(),
        threats.len(),
        selection.total_severity,
        selection.total_hours,
        budget,
    );

    Ok(selection)
}
