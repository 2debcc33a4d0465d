use super::*;
use crate::foundation::core::Point3;

fn seg(id: u32, x0: f64, x1: f64) -> Segment {
    seg_xy(id, (x0, x1), (0.0, 0.0))
}

fn seg_xy(id: u32, x: (f64, f64), y: (f64, f64)) -> Segment {
    Segment {
        id: SampleId(id),
        start: Point3::new(x.0, y.0, 0.0),
        t0: f64::from(id),
        end: Point3::new(x.1, y.1, 0.0),
        t1: f64::from(id) + 1.0,
        payload: [0.0, 0.0],
    }
}

fn ids(chains: &[Chain]) -> Vec<Vec<u32>> {
    chains
        .iter()
        .map(|c| c.ids().iter().map(|id| id.0).collect())
        .collect()
}

fn assemble_x(segs: &[Segment]) -> Assembly {
    ChainAssembler::new(Axis::X, MatchTolerance::Exact).assemble(segs)
}

#[test]
fn simple_chain_assembles_in_order() {
    // A->B, B->C, C->D
    let segs = vec![seg(0, 1.0, 2.0), seg(1, 2.0, 3.0), seg(2, 3.0, 4.0)];
    let out = assemble_x(&segs);
    assert_eq!(ids(&out.chains), vec![vec![0, 1, 2]]);
    assert_eq!(out.stats.chains, 1);
    assert_eq!(out.stats.roots, 1);
    assert_eq!(out.stats.appended, 2);
}

#[test]
fn branch_point_splits_into_separate_chains() {
    // A->B, B->C, B->D
    let segs = vec![seg(0, 1.0, 2.0), seg(1, 2.0, 3.0), seg(2, 2.0, 4.0)];
    let out = assemble_x(&segs);
    assert_eq!(ids(&out.chains), vec![vec![0], vec![1], vec![2]]);
    assert_eq!(out.stats.split_starts, 2);
}

#[test]
fn branches_continue_after_the_split() {
    // A->B, B->C, B->D, C->E, D->F
    let segs = vec![
        seg(0, 1.0, 2.0),
        seg(1, 2.0, 3.0),
        seg(2, 2.0, 4.0),
        seg(3, 3.0, 5.0),
        seg(4, 4.0, 6.0),
    ];
    let out = assemble_x(&segs);
    assert_eq!(ids(&out.chains), vec![vec![0], vec![1, 3], vec![2, 4]]);
}

#[test]
fn converging_chains_do_not_merge() {
    // A->C, B->C, C->D
    let segs = vec![seg(0, 1.0, 3.0), seg(1, 2.0, 3.0), seg(2, 3.0, 4.0)];
    let out = assemble_x(&segs);
    assert_eq!(ids(&out.chains), vec![vec![0], vec![1], vec![2]]);
    assert_eq!(out.stats.ambiguous_starts, 1);
}

#[test]
fn segment_before_its_predecessor_starts_a_chain() {
    // B->C appears before A->B
    let segs = vec![seg(0, 2.0, 3.0), seg(1, 1.0, 2.0)];
    let out = assemble_x(&segs);
    assert_eq!(ids(&out.chains), vec![vec![0], vec![1]]);
    assert_eq!(out.stats.orphan_starts, 1);
}

#[test]
fn every_segment_lands_in_exactly_one_chain() {
    let segs = vec![
        seg(0, 1.0, 2.0),
        seg(1, 2.0, 3.0),
        seg(2, 2.0, 5.0),
        seg(3, 7.0, 3.0),
        seg(4, 3.0, 9.0),
        seg(5, 9.0, 1.0),
        seg(6, 11.0, 12.0),
    ];
    let out = assemble_x(&segs);
    let mut all: Vec<u32> = ids(&out.chains).into_iter().flatten().collect();
    all.sort_unstable();
    assert_eq!(all, (0..7).collect::<Vec<_>>());
    assert!(out.chains.iter().all(|c| !c.is_empty()));
}

#[test]
fn assembly_is_deterministic() {
    let segs = vec![
        seg(0, 1.0, 2.0),
        seg(1, 2.0, 3.0),
        seg(2, 5.0, 6.0),
        seg(3, 3.0, 4.0),
        seg(4, 6.0, 7.0),
    ];
    let a = assemble_x(&segs);
    let b = assemble_x(&segs);
    assert_eq!(a.chains, b.chains);
    assert_eq!(ids(&a.chains), vec![vec![0, 1, 3], vec![2, 4]]);
}

#[test]
fn y_pass_uses_y_endpoints() {
    let segs = vec![
        seg_xy(0, (1.0, 2.0), (10.0, 20.0)),
        seg_xy(1, (2.0, 3.0), (21.0, 30.0)),
    ];
    let x = ChainAssembler::new(Axis::X, MatchTolerance::Exact).assemble(&segs);
    let y = ChainAssembler::new(Axis::Y, MatchTolerance::Exact).assemble(&segs);
    assert_eq!(ids(&x.chains), vec![vec![0, 1]]);
    assert_eq!(ids(&y.chains), vec![vec![0], vec![1]]);
    assert_eq!(y.axis, Axis::Y);
}

#[test]
fn exact_tolerance_rejects_near_miss_and_quantized_accepts_it() {
    let segs = vec![seg(0, 0.25, 0.5), seg(1, 0.5 + 1e-13, 0.75)];

    let exact = ChainAssembler::new(Axis::X, MatchTolerance::Exact).assemble(&segs);
    assert_eq!(exact.chains.len(), 2);

    let snapped =
        ChainAssembler::new(Axis::X, MatchTolerance::Quantized { step: 1e-9 }).assemble(&segs);
    assert_eq!(ids(&snapped.chains), vec![vec![0, 1]]);
}

#[test]
fn empty_input_yields_no_chains() {
    let out = assemble_x(&[]);
    assert!(out.chains.is_empty());
    assert_eq!(out.stats, AssemblyStats::default());
}
