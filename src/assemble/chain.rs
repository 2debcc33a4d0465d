use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{
    assemble::graph::{EndpointGraph, EndpointKey, MatchTolerance},
    foundation::core::{Axis, SampleId},
    segment::index::Segment,
};

/// Ordered, end-to-start connected run of segments, by identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Chain {
    segments: Vec<SampleId>,
}

impl Chain {
    fn start(id: SampleId) -> Self {
        Self { segments: vec![id] }
    }

    pub fn from_ids(segments: Vec<SampleId>) -> Self {
        Self { segments }
    }

    pub fn ids(&self) -> &[SampleId] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Why each chain was started, plus totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssemblyStats {
    pub chains: usize,
    pub appended: usize,
    /// Start value is never an end value.
    pub roots: usize,
    /// Start value begins more than one segment.
    pub split_starts: usize,
    /// Several open chains end at the start value.
    pub ambiguous_starts: usize,
    /// The predecessor has not been placed yet.
    pub orphan_starts: usize,
}

/// One axis pass.
#[derive(Clone, Debug)]
pub struct Assembly {
    pub axis: Axis,
    pub chains: Vec<Chain>,
    pub stats: AssemblyStats,
}

/// Greedy endpoint chainer for a single matching axis.
///
/// Segments are placed in their given order. A segment extends an existing chain only when
/// exactly one open chain ends at its start key and that key is not a split point; in every
/// other case it opens a new chain. Each segment lands in exactly one chain.
#[derive(Clone, Copy, Debug)]
pub struct ChainAssembler {
    axis: Axis,
    tolerance: MatchTolerance,
}

impl ChainAssembler {
    pub fn new(axis: Axis, tolerance: MatchTolerance) -> Self {
        Self { axis, tolerance }
    }

    pub fn assemble(&self, segments: &[Segment]) -> Assembly {
        let graph = EndpointGraph::build(segments, self.axis, self.tolerance);
        let mut acc = Accumulator::default();

        for s in segments {
            let (a, b) = graph.keys(s);
            let target = if graph.is_root(a) {
                acc.stats.roots += 1;
                None
            } else if graph.is_split(a) {
                acc.stats.split_starts += 1;
                None
            } else {
                match acc.tails.get(&a).map(|open| open.as_slice()) {
                    Some([only]) => Some(*only),
                    Some(open) if open.len() > 1 => {
                        acc.stats.ambiguous_starts += 1;
                        None
                    }
                    _ => {
                        acc.stats.orphan_starts += 1;
                        None
                    }
                }
            };

            match target {
                Some(idx) => acc.extend(idx, s.id, a, b),
                None => acc.open(s.id, b),
            }
        }

        acc.stats.chains = acc.chains.len();
        tracing::debug!(
            axis = ?self.axis,
            segments = segments.len(),
            nodes = graph.node_count(),
            chains = acc.stats.chains,
            split_starts = acc.stats.split_starts,
            ambiguous_starts = acc.stats.ambiguous_starts,
            "assembled chains"
        );

        Assembly {
            axis: self.axis,
            chains: acc.chains,
            stats: acc.stats,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    chains: Vec<Chain>,
    // Chains whose most recent endpoint is the key, in the order they arrived there.
    tails: HashMap<EndpointKey, SmallVec<[usize; 2]>>,
    stats: AssemblyStats,
}

impl Accumulator {
    fn open(&mut self, id: SampleId, end: EndpointKey) {
        let idx = self.chains.len();
        self.chains.push(Chain::start(id));
        self.tails.entry(end).or_default().push(idx);
    }

    fn extend(&mut self, idx: usize, id: SampleId, from: EndpointKey, to: EndpointKey) {
        if let Some(open) = self.tails.get_mut(&from) {
            open.retain(|c| *c != idx);
            if open.is_empty() {
                self.tails.remove(&from);
            }
        }
        self.chains[idx].segments.push(id);
        self.tails.entry(to).or_default().push(idx);
        self.stats.appended += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/chain.rs"]
mod tests;
