use crate::{
    assemble::chain::Chain,
    foundation::core::{Category, Point3, SampleId},
    foundation::error::{ShowerError, ShowerResult},
    segment::index::SegmentIndex,
};

/// A validated trajectory ready for keyframing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    pub category: Category,
    pub segments: Vec<SampleId>,
    /// Start of every segment, then the end of the last one.
    pub points: Vec<Point3>,
    pub start_tick: i64,
    pub end_tick: i64,
}

impl Curve {
    /// Re-apply the tick ordering rules. Running this more than once changes nothing.
    pub fn normalize_ticks(&mut self) {
        (self.start_tick, self.end_tick) = ordered_ticks(self.start_tick, self.end_tick);
    }

    pub fn duration_ticks(&self) -> i64 {
        self.end_tick.saturating_sub(self.start_tick)
    }
}

/// Round fractional tick times and order them, guaranteeing `end > start`.
///
/// Times beyond the `i64` range clamp to its ends.
pub fn tick_span(t0: f64, t1: f64) -> (i64, i64) {
    ordered_ticks(t0.round() as i64, t1.round() as i64)
}

fn ordered_ticks(start: i64, end: i64) -> (i64, i64) {
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    if start == end {
        match start.checked_add(1) {
            Some(next) => (start, next),
            None => (start - 1, start),
        }
    } else {
        (start, end)
    }
}

/// Turn a reconciled chain into a [`Curve`].
pub fn annotate(category: Category, chain: &Chain, index: &SegmentIndex) -> ShowerResult<Curve> {
    let mut segs = Vec::with_capacity(chain.len());
    for id in chain.ids() {
        let s = index.get(*id).ok_or_else(|| {
            ShowerError::validation(format!("chain references unknown sample {}", id.0))
        })?;
        segs.push(s);
    }
    let (Some(first), Some(last)) = (segs.first(), segs.last()) else {
        return Err(ShowerError::validation("cannot annotate an empty chain"));
    };

    let (start_tick, end_tick) = tick_span(first.t0, last.t1);
    let mut points: Vec<Point3> = segs.iter().map(|s| s.start).collect();
    points.push(last.end);

    Ok(Curve {
        category,
        segments: chain.ids().to_vec(),
        points,
        start_tick,
        end_tick,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/temporal/annotate.rs"]
mod tests;
