use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    assemble::{
        chain::{AssemblyStats, ChainAssembler},
        graph::MatchTolerance,
    },
    decode::frame::{ByteOrder, TrackSample, decode_frames, read_track_file},
    filter::sample::{FilterStats, filter_samples},
    foundation::core::{Axis, Category},
    foundation::error::{ShowerError, ShowerResult},
    reconcile::reconciler::{ReconcileStats, reconcile},
    segment::index::SegmentIndex,
    temporal::annotate::{Curve, annotate},
};

/// Options shared by every per-file pipeline in a run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineOpts {
    /// Byte order of the frame payload floats.
    pub byte_order: ByteOrder,
    /// Endpoint matching policy for both assembly passes.
    pub tolerance: MatchTolerance,
    /// Keep at most this many valid samples per file (first N, in file order).
    pub max_samples: Option<usize>,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Ticks appended after the last curve ends when computing the scene end.
    pub tail_padding_ticks: i64,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Native,
            tolerance: MatchTolerance::Exact,
            max_samples: None,
            threads: None,
            tail_padding_ticks: 10,
        }
    }
}

impl PipelineOpts {
    pub fn validate(&self) -> ShowerResult<()> {
        self.tolerance.validate()?;
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ShowerError::validation(
                "pipeline 'threads' must be >= 1 when set",
            ));
        }
        if self.tail_padding_ticks < 0 {
            return Err(ShowerError::validation(
                "pipeline 'tail_padding_ticks' must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Everything one category's pipeline produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryReport {
    pub category: Category,
    pub curves: Vec<Curve>,
    pub filter: FilterStats,
    pub x_pass: AssemblyStats,
    pub y_pass: AssemblyStats,
    pub reconcile: ReconcileStats,
}

/// Decode, filter, assemble, reconcile and annotate one in-memory track file.
#[tracing::instrument(skip(bytes, opts), fields(len = bytes.len()))]
pub fn process_bytes(
    category: Category,
    bytes: &[u8],
    opts: &PipelineOpts,
) -> ShowerResult<CategoryReport> {
    let samples = decode_frames(bytes, opts.byte_order)?;
    process_samples(category, &samples, opts)
}

/// Run the pipeline from already-decoded samples (for example, parsed text records).
#[tracing::instrument(skip(samples, opts), fields(samples = samples.len()))]
pub fn process_samples(
    category: Category,
    samples: &[TrackSample],
    opts: &PipelineOpts,
) -> ShowerResult<CategoryReport> {
    opts.tolerance.validate()?;

    let (kept, filter) = filter_samples(samples, opts.max_samples)?;
    let index = SegmentIndex::build(&kept);

    let x = ChainAssembler::new(Axis::X, opts.tolerance).assemble(index.segments());
    let y = ChainAssembler::new(Axis::Y, opts.tolerance).assemble(index.segments());
    let (validated, reconcile) = reconcile(&x.chains, &y.chains);

    let curves = validated
        .iter()
        .map(|c| annotate(category, c, &index))
        .collect::<ShowerResult<Vec<_>>>()?;

    tracing::debug!(
        %category,
        kept = filter.kept,
        x_chains = x.stats.chains,
        y_chains = y.stats.chains,
        curves = curves.len(),
        "category reconstructed"
    );

    Ok(CategoryReport {
        category,
        curves,
        filter,
        x_pass: x.stats,
        y_pass: y.stats,
        reconcile,
    })
}

/// Read and decode a track file from disk, then run [`process_samples`] on it.
#[tracing::instrument(skip(opts), fields(path = %path.display()))]
pub fn process_file(
    category: Category,
    path: &Path,
    opts: &PipelineOpts,
) -> ShowerResult<CategoryReport> {
    let samples = read_track_file(path, opts.byte_order)?;
    process_samples(category, &samples, opts)
}

/// Where each category's track file lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFiles {
    pub inputs: Vec<(Category, PathBuf)>,
}

impl CategoryFiles {
    /// Simulation output naming: `DAT{run:06}.track_{em,mu,hd}` under `dir`.
    pub fn for_run(dir: &Path, run: u32) -> Self {
        let inputs = Category::ALL
            .iter()
            .map(|&c| (c, dir.join(format!("DAT{run:06}.track_{}", c.tag()))))
            .collect();
        Self { inputs }
    }

    pub fn missing(&self) -> Vec<&Path> {
        self.inputs
            .iter()
            .filter(|(_, p)| !p.exists())
            .map(|(_, p)| p.as_path())
            .collect()
    }
}

/// Result of one category within a batch.
#[derive(Debug)]
pub enum CategoryOutcome {
    Done(CategoryReport),
    Failed {
        category: Category,
        error: ShowerError,
    },
}

impl CategoryOutcome {
    pub fn category(&self) -> Category {
        match self {
            Self::Done(r) => r.category,
            Self::Failed { category, .. } => *category,
        }
    }

    pub fn report(&self) -> Option<&CategoryReport> {
        match self {
            Self::Done(r) => Some(r),
            Self::Failed { .. } => None,
        }
    }
}

/// Per-category outcomes in input order.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<CategoryOutcome>,
    pub tail_padding_ticks: i64,
}

impl BatchReport {
    /// Wrap a single category's report, e.g. one file processed outside [`process_batch`].
    pub fn single(report: CategoryReport, opts: &PipelineOpts) -> Self {
        Self {
            outcomes: vec![CategoryOutcome::Done(report)],
            tail_padding_ticks: opts.tail_padding_ticks,
        }
    }

    /// All curves, grouped by category in input order.
    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.outcomes
            .iter()
            .filter_map(CategoryOutcome::report)
            .flat_map(|r| r.curves.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = (Category, &ShowerError)> {
        self.outcomes.iter().filter_map(|o| match o {
            CategoryOutcome::Failed { category, error } => Some((*category, error)),
            CategoryOutcome::Done(_) => None,
        })
    }

    /// Latest end tick over every curve, if any.
    pub fn last_tick(&self) -> Option<i64> {
        self.curves().map(|c| c.end_tick).max()
    }

    /// Scene end: last tick plus padding (`0` plus padding when there are no curves).
    pub fn frame_end(&self) -> i64 {
        self.last_tick()
            .unwrap_or(0)
            .saturating_add(self.tail_padding_ticks)
    }
}

/// Process several category files in parallel.
///
/// Each file runs its own sequential pipeline; a failing file is reported in its outcome and
/// never stops the others.
pub fn process_batch(files: &CategoryFiles, opts: &PipelineOpts) -> ShowerResult<BatchReport> {
    opts.validate()?;
    let pool = build_thread_pool(opts.threads)?;

    let outcomes: Vec<CategoryOutcome> = pool.install(|| {
        files
            .inputs
            .par_iter()
            .map(|(category, path)| match process_file(*category, path, opts) {
                Ok(report) => CategoryOutcome::Done(report),
                Err(error) => {
                    tracing::warn!(%category, path = %path.display(), %error, "category failed");
                    CategoryOutcome::Failed {
                        category: *category,
                        error,
                    }
                }
            })
            .collect()
    });

    Ok(BatchReport {
        outcomes,
        tail_padding_ticks: opts.tail_padding_ticks,
    })
}

fn build_thread_pool(threads: Option<usize>) -> ShowerResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ShowerError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
