//! showertrack reconstructs particle trajectories from air-shower track files.
//!
//! The simulation writes one binary file per particle category, each a flat list of 48-byte
//! frames describing a single straight step of one particle. showertrack stitches those steps
//! back into continuous, branch-aware curves with animation ticks attached.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: bytes → [`TrackSample`]s ([`decode_frames`], [`FrameReader`])
//! 2. **Filter**: drop non-finite and zero-x-extent samples ([`filter_samples`])
//! 3. **Index**: samples → [`Segment`]s in display units, keyed by [`SampleId`]
//! 4. **Assemble**: chain segments end-to-start, once on x and once on y ([`ChainAssembler`])
//! 5. **Reconcile**: keep chains both passes agree on ([`reconcile()`])
//! 6. **Annotate**: points and start/end ticks ([`Curve`])
//!
//! [`process_bytes`] runs all of it for one file; [`process_batch`] runs the three category
//! files in parallel.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: for a given sample order the output is always the same.
//! - **Identity, not floats**: chains are compared by [`SampleId`] sequences only.
#![forbid(unsafe_code)]

mod assemble;
mod decode;
mod filter;
mod foundation;
mod pipeline;
mod reconcile;
mod segment;
mod temporal;

pub use assemble::chain::{Assembly, AssemblyStats, Chain, ChainAssembler};
pub use assemble::graph::{EndpointGraph, EndpointKey, MIN_QUANTIZED_STEP, MatchTolerance};
pub use decode::frame::{
    ByteOrder, FIELD_COUNT, FRAME_LEN, FrameReader, RawFrame, TrackSample, decode_frames,
    read_track_file,
};
pub use decode::text::{ParsedRecords, format_record, parse_record, parse_records, write_records};
pub use filter::sample::{FilterStats, IndexedSample, filter_samples, is_degenerate};
pub use foundation::core::{
    Axis, Category, POSITION_SCALE, Point3, SampleId, TIME_SCALE, scale_position, scale_time,
};
pub use foundation::error::{ShowerError, ShowerResult};
pub use pipeline::run::{
    BatchReport, CategoryFiles, CategoryOutcome, CategoryReport, PipelineOpts, process_batch,
    process_bytes, process_file, process_samples,
};
pub use reconcile::reconciler::{ReconcileStats, reconcile};
pub use segment::index::{Segment, SegmentIndex};
pub use temporal::annotate::{Curve, annotate, tick_span};
