use std::collections::HashMap;

use crate::{
    filter::sample::IndexedSample,
    foundation::core::{Axis, Point3, SampleId, scale_position, scale_time},
};

/// Directed start→end piece of a track, in display units and ticks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub id: SampleId,
    pub start: Point3,
    /// Start time in (fractional) ticks.
    pub t0: f64,
    pub end: Point3,
    /// End time in (fractional) ticks.
    pub t1: f64,
    /// Opaque `f0, f1` payload.
    pub payload: [f32; 2],
}

impl Segment {
    pub fn from_indexed(s: &IndexedSample) -> Self {
        let [x0, y0, z0] = s.sample.start();
        let [x1, y1, z1] = s.sample.end();
        Self {
            id: SampleId(s.index),
            start: Point3::new(scale_position(x0), scale_position(y0), scale_position(z0)),
            t0: scale_time(s.sample.start_time()),
            end: Point3::new(scale_position(x1), scale_position(y1), scale_position(z1)),
            t1: scale_time(s.sample.end_time()),
            payload: s.sample.payload(),
        }
    }

    /// `(start, end)` coordinate on `axis`.
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        (self.start.along(axis), self.end.along(axis))
    }
}

/// Segments in original order with lookup by [`SampleId`].
#[derive(Clone, Debug, Default)]
pub struct SegmentIndex {
    segments: Vec<Segment>,
    by_id: HashMap<SampleId, usize>,
}

impl SegmentIndex {
    pub fn build(samples: &[IndexedSample]) -> Self {
        let segments: Vec<Segment> = samples.iter().map(Segment::from_indexed).collect();
        let by_id = segments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        Self { segments, by_id }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, id: SampleId) -> Option<&Segment> {
        self.by_id.get(&id).map(|&i| &self.segments[i])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/index.rs"]
mod tests;
