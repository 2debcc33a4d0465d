use super::*;
use crate::{
    decode::frame::{FRAME_LEN, RawFrame},
    foundation::core::SampleId,
};

fn frame(fields: [f32; 10]) -> [u8; FRAME_LEN] {
    RawFrame {
        header: [40, 0, 0, 0],
        sample: TrackSample::new(fields),
        trailer: [40, 0, 0, 0],
    }
    .encode(ByteOrder::Native)
}

fn track(x0: f32, y0: f32, t0: f32, x1: f32, y1: f32, t1: f32) -> [u8; FRAME_LEN] {
    frame([0.0, 0.0, x0, y0, 5.0e5, t0, x1, y1, 4.0e5, t1])
}

fn two_link_file() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&track(1.0e6, 2.0e6, 1.0e-5, 1.5e6, 2.5e6, 2.0e-5));
    bytes.extend_from_slice(&track(3.0e6, 0.0, 0.0, 3.0e6, 1.0, 1.0e-5));
    bytes.extend_from_slice(&track(1.5e6, 2.5e6, 2.0e-5, 2.0e6, 3.0e6, 4.0e-5));
    bytes.extend_from_slice(&track(7.0e6, 7.0e6, 0.0, 7.0e6, 8.0e6, 1.0e-5));
    bytes
}

#[test]
fn four_frames_yield_one_three_point_curve() {
    let report =
        process_bytes(Category::Muon, &two_link_file(), &PipelineOpts::default()).unwrap();

    assert_eq!(report.filter.total, 4);
    assert_eq!(report.filter.degenerate, 2);
    assert_eq!(report.curves.len(), 1);

    let curve = &report.curves[0];
    assert_eq!(curve.category, Category::Muon);
    assert_eq!(curve.points.len(), 3);
    assert!(curve.end_tick > curve.start_tick);
    assert_eq!((curve.start_tick, curve.end_tick), (10, 40));
    assert_eq!(curve.segments, vec![SampleId(0), SampleId(2)]);
}

#[test]
fn truncated_file_is_a_format_error() {
    let mut bytes = two_link_file();
    bytes.truncate(FRAME_LEN * 3 + 10);
    let err = process_bytes(Category::Hadronic, &bytes, &PipelineOpts::default()).unwrap_err();
    assert!(matches!(err, ShowerError::Format { offset: 144, len: 10 }));
}

#[test]
fn chain_matching_on_one_axis_only_is_rejected() {
    // x endpoints chain, y endpoints do not
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&track(1.0e6, 1.0e6, 0.0, 2.0e6, 2.0e6, 1.0e-5));
    bytes.extend_from_slice(&track(2.0e6, 9.0e6, 1.0e-5, 3.0e6, 3.0e6, 2.0e-5));

    let report =
        process_bytes(Category::Electromagnetic, &bytes, &PipelineOpts::default()).unwrap();
    assert_eq!(report.x_pass.chains, 1);
    assert_eq!(report.y_pass.chains, 2);
    assert!(report.curves.is_empty());
    assert_eq!(report.reconcile.candidates, 2);
    assert_eq!(report.reconcile.discarded, 2);
}

#[test]
fn opts_validation() {
    assert!(PipelineOpts::default().validate().is_ok());

    let opts = PipelineOpts {
        threads: Some(0),
        ..PipelineOpts::default()
    };
    assert!(opts.validate().is_err());

    let opts = PipelineOpts {
        tolerance: MatchTolerance::Quantized { step: -1.0 },
        ..PipelineOpts::default()
    };
    assert!(opts.validate().is_err());
    assert!(process_samples(Category::Muon, &[], &opts).is_err());
}

#[test]
fn opts_deserialize_with_defaults() {
    let opts: PipelineOpts = serde_json::from_str(
        r#"{ "tolerance": { "mode": "quantized", "step": 1e-9 }, "max_samples": 5000 }"#,
    )
    .unwrap();
    assert_eq!(opts.tolerance, MatchTolerance::Quantized { step: 1e-9 });
    assert_eq!(opts.max_samples, Some(5000));
    assert_eq!(opts.tail_padding_ticks, 10);
    assert_eq!(opts.byte_order, ByteOrder::Native);
}

#[test]
fn run_file_names_follow_simulation_output() {
    let files = CategoryFiles::for_run(Path::new("out"), 42);
    let names: Vec<String> = files
        .inputs
        .iter()
        .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["DAT000042.track_em", "DAT000042.track_mu", "DAT000042.track_hd"]
    );
    assert_eq!(files.missing().len(), 3);
}

#[test]
fn single_report_frame_end_pads_last_tick() {
    let report =
        process_bytes(Category::Muon, &two_link_file(), &PipelineOpts::default()).unwrap();
    let opts = PipelineOpts {
        tail_padding_ticks: 5,
        ..PipelineOpts::default()
    };
    let batch = BatchReport::single(report, &opts);

    assert_eq!(batch.last_tick(), Some(40));
    assert_eq!(batch.frame_end(), 45);
    assert_eq!(batch.curves().count(), 1);
    assert_eq!(batch.failures().count(), 0);
}

#[test]
fn missing_file_error_names_the_path() {
    let path = Path::new("no/such/dir/DAT000001.track_mu");
    let err = process_file(Category::Muon, path, &PipelineOpts::default()).unwrap_err();
    assert!(matches!(err, ShowerError::Other(_)));
    assert!(format!("{err:#}").contains("DAT000001.track_mu"));
}
