//! # Batch Queries
//!
//! Read-only inspection helpers over a threat batch. An empty result is a
//! normal "nothing matched" outcome, never an error. The only rejected
//! request is a top-N query for zero threats.

use std::collections::HashMap;

use crate::ordering::by_severity;
use crate::{Summary, Threat, TriageError, TriageResult};

/// The `n` most severe threats, severity descending with ties by id.
///
/// Asking for more threats than the batch holds returns the whole batch.
pub fn top_n(threats: &[Threat], n: usize) -> TriageResult<Vec<Threat>> {
    if n == 0 {
        return Err(TriageError::InvalidQuery(
            "top-N count must be at least 1".to_string(),
        ));
    }
    let mut ranked = by_severity(threats);
    ranked.truncate(n);
    Ok(ranked)
}

/// All threats whose IP matches `ip` exactly, in batch order.
pub fn find_by_ip(threats: &[Threat], ip: &str) -> Vec<Threat> {
    threats.iter().filter(|t| t.ip == ip).cloned().collect()
}

/// Number of threats per literal `type` value.
pub fn count_by_type(threats: &[Threat]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for threat in threats {
        *counts.entry(threat.threat_type.clone()).or_insert(0) += 1;
    }
    counts
}

/// Totals for the batch paired with the available budget.
pub fn summary(threats: &[Threat], budget: u32) -> Summary {
    Summary {
        count: threats.len(),
        total_hours: threats.iter().map(|t| u64::from(t.resource_cost)).sum(),
        total_severity: threats.iter().map(|t| u64::from(t.severity)).sum(),
        budget,
    }
}
