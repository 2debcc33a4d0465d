use std::collections::HashMap;

use crate::{
    foundation::core::Axis,
    foundation::error::{ShowerError, ShowerResult},
    segment::index::Segment,
};

/// How endpoint coordinates are turned into graph node keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchTolerance {
    /// Bit-exact equality (`0.0` and `-0.0` share a key).
    #[default]
    Exact,
    /// Coordinates are snapped to a grid of `step` display units; values in the same cell
    /// match.
    Quantized { step: f64 },
}

/// Smallest accepted quantization step. Any coordinate decoded from an `f32` frame divided
/// by a step at least this large stays finite.
pub const MIN_QUANTIZED_STEP: f64 = 1.0e-200;

impl MatchTolerance {
    pub fn validate(self) -> ShowerResult<()> {
        if let Self::Quantized { step } = self
            && !(step.is_finite() && step >= MIN_QUANTIZED_STEP)
        {
            return Err(ShowerError::validation(format!(
                "quantized match step must be finite and >= {MIN_QUANTIZED_STEP:e} (got {step})"
            )));
        }
        Ok(())
    }

    /// Key for one coordinate. Cells are keyed by the bits of the rounded cell index, so far
    /// apart cells never share a key however large the index grows.
    pub fn key(self, v: f64) -> EndpointKey {
        match self {
            Self::Exact => float_key(v),
            Self::Quantized { step } => float_key((v / step).round()),
        }
    }
}

fn float_key(v: f64) -> EndpointKey {
    let v = if v == 0.0 { 0.0 } else { v };
    EndpointKey(v.to_bits() as i64)
}

/// Graph node: one endpoint coordinate on the matching axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointKey(pub i64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Degree {
    incoming: u32,
    outgoing: u32,
}

/// Endpoint adjacency over a whole segment list for one axis.
///
/// Edges are segments; a node's out-degree counts segments starting there and its in-degree
/// counts segments ending there.
#[derive(Clone, Debug)]
pub struct EndpointGraph {
    axis: Axis,
    tolerance: MatchTolerance,
    nodes: HashMap<EndpointKey, Degree>,
}

impl EndpointGraph {
    pub fn build(segments: &[Segment], axis: Axis, tolerance: MatchTolerance) -> Self {
        let mut nodes: HashMap<EndpointKey, Degree> = HashMap::with_capacity(segments.len() * 2);
        for s in segments {
            let (a, b) = endpoint_keys(s, axis, tolerance);
            nodes.entry(a).or_default().outgoing += 1;
            nodes.entry(b).or_default().incoming += 1;
        }
        Self {
            axis,
            tolerance,
            nodes,
        }
    }

    pub fn keys(&self, s: &Segment) -> (EndpointKey, EndpointKey) {
        endpoint_keys(s, self.axis, self.tolerance)
    }

    pub fn in_degree(&self, key: EndpointKey) -> u32 {
        self.nodes.get(&key).map_or(0, |d| d.incoming)
    }

    pub fn out_degree(&self, key: EndpointKey) -> u32 {
        self.nodes.get(&key).map_or(0, |d| d.outgoing)
    }

    /// No segment ends at `key`: anything starting there is a trajectory root.
    pub fn is_root(&self, key: EndpointKey) -> bool {
        self.in_degree(key) == 0
    }

    /// More than one segment starts at `key`.
    pub fn is_split(&self, key: EndpointKey) -> bool {
        self.out_degree(key) > 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn endpoint_keys(
    s: &Segment,
    axis: Axis,
    tolerance: MatchTolerance,
) -> (EndpointKey, EndpointKey) {
    let (a, b) = s.span(axis);
    (tolerance.key(a), tolerance.key(b))
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/graph.rs"]
mod tests;
