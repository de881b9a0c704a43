//! # Exact Knapsack Optimizer
//!
//! Classic bottom-up 0/1 knapsack over item index and integer capacity:
//!
//! ```text
//! dp[i][r] = max(dp[i-1][r], dp[i-1][r - cost_i] + severity_i)   if cost_i <= r
//! dp[i][r] = dp[i-1][r]                                           otherwise
//! ```
//!
//! The full `(n + 1) x (budget + 1)` table is kept so the chosen subset
//! can be recovered. Reconstruction walks items from last to first,
//! including item `i` only when `dp[i][r] != dp[i-1][r]`. At equal value a
//! later item is therefore left out, which favors earlier items in batch
//! order. The recovered indices are reversed so the result follows batch
//! order.
//!
//! Time and space are O(n * budget). Problems whose table would exceed
//! `SelectionConfig::max_table_cells` are refused.

use crate::{Selection, SelectionConfig, SelectionStrategy, Threat, TriageError, TriageResult};

use super::{build_selection, ensure_positive_costs};

/// Select the severity-maximizing subset that fits in `budget` hours.
///
/// # Arguments
/// * `threats` - The batch to choose from. Not modified.
/// * `budget` - Total response hours available.
/// * `config` - Advisory threshold and table size limit.
///
/// # Returns
/// The optimal subset in batch order. An empty batch or a zero budget
/// yields an empty selection. Fails when a threat has a zero resource cost
/// or the table would exceed the configured size.
pub fn select_optimal(
    threats: &[Threat],
    budget: u32,
    config: &SelectionConfig,
) -> TriageResult<Selection> {
    ensure_positive_costs(threats)?;

    if threats.is_empty() || budget == 0 {
        return Ok(build_selection(SelectionStrategy::Optimal, Vec::new(), budget, config));
    }

    let table = KnapsackTable::solve(threats, budget, config.max_table_cells)?;
    let indices = table.reconstruct(threats)?;
    let chosen: Vec<Threat> = indices.iter().map(|&i| threats[i].clone()).collect();

    let selection = build_selection(SelectionStrategy::Optimal, chosen, budget, config);
    if selection.total_severity != table.best() {
        return Err(TriageError::Contract(format!(
            "knapsack reconstruction recovered severity {} but the table optimum is {}",
            selection.total_severity,
            table.best(),
        )));
    }

    log::info!(
        "[KNAPSACK] Optimum severity {} using {}h of {}h ({} of {} threats, {} cells)",
        selection.total_severity,
        selection.total_hours,
        budget,
        selection.chosen.len(),
        threats.len(),
        table.cell_count(),
    );

    Ok(selection)
}

/// The filled dynamic-programming table. Row `i` holds the best severity
/// using the first `i` threats at every capacity.
struct KnapsackTable {
    rows: Vec<Vec<u64>>,
    capacity: usize,
}

impl KnapsackTable {
    fn solve(threats: &[Threat], budget: u32, max_cells: u64) -> TriageResult<Self> {
        let cells = (threats.len() as u64 + 1)
            .checked_mul(u64::from(budget) + 1)
            .filter(|&cells| cells <= max_cells)
            .ok_or_else(|| {
                TriageError::Contract(format!(
                    "knapsack table for {} threats and {}h exceeds the {} cell limit",
                    threats.len(),
                    budget,
                    max_cells,
                ))
            })?;

        let capacity = usize::try_from(budget)
            .map_err(|_| TriageError::Contract(format!("budget {} does not fit in memory", budget)))?;

        log::debug!("[KNAPSACK] Allocating {} table cells", cells);

        let mut rows = vec![vec![0u64; capacity + 1]; threats.len() + 1];

        for (i, threat) in threats.iter().enumerate() {
            let cost = threat.resource_cost as usize;
            let severity = u64::from(threat.severity);
            let (solved, pending) = rows.split_at_mut(i + 1);
            let prev = &solved[i];
            let current = &mut pending[0];

            for (r, cell) in current.iter_mut().enumerate() {
                *cell = match r.checked_sub(cost) {
                    Some(remaining) => prev[r].max(prev[remaining] + severity),
                    None => prev[r],
                };
            }
        }

        Ok(Self { rows, capacity })
    }

    /// Best total severity over all threats at full capacity.
    fn best(&self) -> u64 {
        self.rows
            .last()
            .and_then(|row| row.get(self.capacity))
            .copied()
            .unwrap_or(0)
    }

    fn cell_count(&self) -> usize {
        self.rows.len() * (self.capacity + 1)
    }

    fn value(&self, item: usize, capacity: usize) -> TriageResult<u64> {
        self.rows
            .get(item)
            .and_then(|row| row.get(capacity))
            .copied()
            .ok_or_else(|| {
                TriageError::Contract(format!(
                    "knapsack index ({}, {}) outside the {}x{} table",
                    item,
                    capacity,
                    self.rows.len(),
                    self.capacity + 1,
                ))
            })
    }

    /// Recover the chosen item indices, in batch order.
    fn reconstruct(&self, threats: &[Threat]) -> TriageResult<Vec<usize>> {
        let mut remaining = self.capacity;
        let mut chosen = Vec::new();

        for i in (1..self.rows.len()).rev() {
            if self.value(i, remaining)? != self.value(i - 1, remaining)? {
                let cost = threats[i - 1].resource_cost as usize;
                remaining = remaining.checked_sub(cost).ok_or_else(|| {
                    TriageError::Contract(format!(
                        "threat #{} costs {}h but only {}h remain during reconstruction",
                        threats[i - 1].id,
                        cost,
                        remaining,
                    ))
                })?;
                chosen.push(i - 1);
            }
        }

        chosen.reverse();
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::select_greedy;

    fn config() -> SelectionConfig {
        SelectionConfig {
            advisory_hours: 30,
            max_table_cells: 1_000_000,
        }
    }

    fn threat(id: i64, severity: u32, cost: u32) -> Threat {
        Threat {
            id,
            base_severity: severity,
            resource_cost: cost,
            pre_deform_percent: 0,
            severity,
            ip: format!("172.16.0.{}", id),
            threat_type: "Virus".to_string(),
            location: "China".to_string(),
            status: "Detected".to_string(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let threats = vec![threat(1, 50, 10), threat(2, 40, 4), threat(3, 30, 6)];
        let selection = select_optimal(&threats, 10, &config()).unwrap();

        assert_eq!(selection.chosen_ids(), vec![2, 3]);
        assert_eq!(selection.total_severity, 70);
        assert_eq!(selection.total_hours, 10);
        assert_eq!(selection.strategy, SelectionStrategy::Optimal);
    }

    #[test]
    fn test_beats_greedy_when_early_pick_blocks() {
        // Greedy grabs #1 (ratio 10) and then nothing else fits.
        let threats = vec![threat(1, 60, 6), threat(2, 45, 5), threat(3, 45, 5)];

        let greedy = select_greedy(&threats, 10, &config()).unwrap();
        let optimal = select_optimal(&threats, 10, &config()).unwrap();

        assert_eq!(greedy.total_severity, 60);
        assert_eq!(optimal.total_severity, 90);
        assert!(optimal.total_severity > greedy.total_severity);
        assert_eq!(optimal.chosen_ids(), vec![2, 3]);
    }

    #[test]
    fn test_empty_batch() {
        let selection = select_optimal(&[], 25, &config()).unwrap();
        assert!(selection.chosen.is_empty());
        assert_eq!(selection.total_severity, 0);
        assert_eq!(selection.total_hours, 0);
        assert_eq!(selection.budget, 25);
    }

    #[test]
    fn test_zero_budget() {
        let threats = vec![threat(1, 50, 1)];
        let selection = select_optimal(&threats, 0, &config()).unwrap();
        assert!(selection.chosen.is_empty());
        assert_eq!(selection.total_severity, 0);
        assert_eq!(selection.total_hours, 0);
    }

    #[test]
    fn test_nothing_fits() {
        let threats = vec![threat(1, 50, 11), threat(2, 70, 12)];
        let selection = select_optimal(&threats, 10, &config()).unwrap();
        assert!(selection.chosen.is_empty());
    }

    #[test]
    fn test_ties_prefer_earlier_threats() {
        let threats = vec![threat(7, 10, 5), threat(3, 10, 5)];
        let selection = select_optimal(&threats, 5, &config()).unwrap();
        assert_eq!(selection.chosen_ids(), vec![7]);
    }

    #[test]
    fn test_result_follows_batch_order() {
        let threats = vec![threat(1, 5, 1), threat(2, 5, 1), threat(3, 5, 1)];
        let selection = select_optimal(&threats, 3, &config()).unwrap();
        assert_eq!(selection.chosen_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_cost_is_rejected() {
        let threats = vec![threat(1, 10, 0)];
        let err = select_optimal(&threats, 10, &config()).unwrap_err();
        assert!(err.to_string().contains("resource cost of 0"));
    }

    #[test]
    fn test_oversized_table_is_refused() {
        let threats = vec![threat(1, 10, 1), threat(2, 10, 1)];
        let tight = SelectionConfig {
            advisory_hours: 30,
            max_table_cells: 10,
        };
        // 3 rows x 11 columns = 33 cells
        assert!(select_optimal(&threats, 10, &tight).is_err());
        // 3 rows x 3 columns = 9 cells
        assert!(select_optimal(&threats, 2, &tight).is_ok());
    }

    #[test]
    fn test_advisory_flag() {
        let threats = vec![threat(1, 10, 16), threat(2, 10, 16)];
        let selection = select_optimal(&threats, 40, &config()).unwrap();
        assert_eq!(selection.total_hours, 32);
        assert!(selection.over_budget_advisory);
    }
}
