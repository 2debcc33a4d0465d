use crate::{
    decode::frame::TrackSample,
    foundation::error::{ShowerError, ShowerResult},
};

/// Counters reported by [`filter_samples`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub kept: usize,
    /// Samples whose start-x equals end-x.
    pub degenerate: usize,
    /// Samples with at least one NaN or infinite field.
    pub non_finite: usize,
    /// Valid samples dropped by the `max_samples` cap.
    pub capped: usize,
}

/// A kept sample together with its index in the decoded stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedSample {
    pub index: u32,
    pub sample: TrackSample,
}

/// Keep well-formed, non-degenerate samples in their original relative order.
///
/// `max_samples` caps the number of survivors (first N kept). Fails when a kept sample's
/// position in the stream does not fit a [`SampleId`](crate::SampleId).
pub fn filter_samples(
    samples: &[TrackSample],
    max_samples: Option<usize>,
) -> ShowerResult<(Vec<IndexedSample>, FilterStats)> {
    let mut stats = FilterStats {
        total: samples.len(),
        ..FilterStats::default()
    };
    let cap = max_samples.unwrap_or(usize::MAX);
    let mut out = Vec::with_capacity(samples.len().min(cap));

    for (i, s) in samples.iter().enumerate() {
        if !s.is_finite() {
            tracing::warn!(
                index = i,
                fields = ?s.fields,
                "dropping track sample with non-finite field"
            );
            stats.non_finite += 1;
            continue;
        }
        if is_degenerate(s) {
            stats.degenerate += 1;
            continue;
        }
        if out.len() == cap {
            stats.capped += 1;
            continue;
        }
        out.push(IndexedSample {
            index: sample_index(i)?,
            sample: *s,
        });
    }

    stats.kept = out.len();
    Ok((out, stats))
}

fn sample_index(i: usize) -> ShowerResult<u32> {
    u32::try_from(i).map_err(|_| {
        ShowerError::validation(format!(
            "track sample {i} is past the last addressable sample id {}",
            u32::MAX
        ))
    })
}

/// Zero extent along x carries no chaining information.
pub fn is_degenerate(s: &TrackSample) -> bool {
    s.start()[0] == s.end()[0]
}

#[cfg(test)]
#[path = "../../tests/unit/filter/sample.rs"]
mod tests;
