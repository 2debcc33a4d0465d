use std::collections::HashSet;

use crate::{assemble::chain::Chain, foundation::core::SampleId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReconcileStats {
    /// Size of the larger (candidate) set.
    pub candidates: usize,
    /// Size of the smaller (validating) set.
    pub validators: usize,
    pub accepted: usize,
    pub discarded: usize,
}

/// Keep chains whose identity sequence appears verbatim in both projections.
///
/// The larger set is the candidate pool (x-keyed on a tie) and output follows its order.
pub fn reconcile(x_chains: &[Chain], y_chains: &[Chain]) -> (Vec<Chain>, ReconcileStats) {
    let (pool, filter) = if x_chains.len() >= y_chains.len() {
        (x_chains, y_chains)
    } else {
        (y_chains, x_chains)
    };

    let known: HashSet<&[SampleId]> = filter.iter().map(|c| c.ids()).collect();
    let accepted: Vec<Chain> = pool
        .iter()
        .filter(|c| known.contains(c.ids()))
        .cloned()
        .collect();

    let stats = ReconcileStats {
        candidates: pool.len(),
        validators: filter.len(),
        accepted: accepted.len(),
        discarded: pool.len() - accepted.len(),
    };
    if stats.discarded > 0 {
        tracing::debug!(
            x_chains = x_chains.len(),
            y_chains = y_chains.len(),
            discarded = stats.discarded,
            "discarded chains not confirmed by both projections"
        );
    }

    (accepted, stats)
}

#[cfg(test)]
#[path = "../../tests/unit/reconcile/reconciler.rs"]
mod tests;
