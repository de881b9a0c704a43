//! # Threat Ordering
//!
//! The orderings every report and selection relies on:
//!
//! 1. **By id, ascending, stable.** Canonical display order. A top-down
//!    merge sort, so threats sharing an id keep their intake order.
//! 2. **By severity, descending,** ties broken by ascending id. Used for
//!    top-N queries.
//! 3. **By efficiency (severity per hour), descending,** ties broken by
//!    ascending id. Used by the greedy selector.

use std::cmp::Ordering;

use crate::Threat;

/// Sort a batch by ascending id in place. Stable.
pub fn sort_by_id(threats: &mut Vec<Threat>) {
    let owned = std::mem::take(threats);
    *threats = merge_sort(owned);
}

/// Return a copy of `threats` sorted by ascending id. Stable.
pub fn sorted_by_id(threats: &[Threat]) -> Vec<Threat> {
    merge_sort(threats.to_vec())
}

fn merge_sort(mut items: Vec<Threat>) -> Vec<Threat> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items);
    let right = merge_sort(right);
    merge(left, right)
}

/// Merge two id-sorted runs. On equal ids the left run wins, which is
/// what keeps the sort stable.
fn merge(left: Vec<Threat>, right: Vec<Threat>) -> Vec<Threat> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l.id <= r.id,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged
}

/// Severity descending, then id ascending.
pub fn compare_severity(a: &Threat, b: &Threat) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| a.id.cmp(&b.id))
}

/// Return a copy of `threats` ordered by [`compare_severity`].
pub fn by_severity(threats: &[Threat]) -> Vec<Threat> {
    let mut sorted = threats.to_vec();
    sorted.sort_by(compare_severity);
    sorted
}

/// Efficiency ratio (severity / hours) descending, then id ascending.
///
/// Ratios are compared by cross-multiplication in `u64`, so equal ratios
/// such as 50/10 and 30/6 tie exactly instead of depending on float
/// rounding. Both costs must be non-zero.
pub fn compare_efficiency(a: &Threat, b: &Threat) -> Ordering {
    debug_assert!(a.resource_cost > 0 && b.resource_cost > 0);
    let lhs = u64::from(b.severity) * u64::from(a.resource_cost);
    let rhs = u64::from(a.severity) * u64::from(b.resource_cost);
    lhs.cmp(&rhs).then_with(|| a.id.cmp(&b.id))
}
