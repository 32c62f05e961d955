// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Hand-built populations with known answers, checked under every lane
//! strategy and sweep shape the CPU can run.

use overlap_kernel::{Circle, CollisionKernel, ExecPolicy, KernelError, Lanes, Scenario, Sweep};

fn policies() -> Vec<ExecPolicy> {
    let mut out = Vec::new();
    for lanes in Lanes::available() {
        for sweep in [Sweep::Full, Sweep::Triangle] {
            for workers in [1, 2] {
                out.push(ExecPolicy { lanes, sweep, workers });
            }
        }
    }
    out
}

fn kernel(circles: &[Circle], policy: ExecPolicy) -> CollisionKernel {
    CollisionKernel::from_circles(circles, policy)
        .expect("kernel construction")
}

#[test]
fn three_circles_on_a_line() {
    let circles = [
        Circle::at(0.0, 0.0, 5.0).moving(1.0, 0.0),
        Circle::at(7.0, 0.0, 5.0).moving(1.0, 0.0),
        Circle::at(20.0, 0.0, 5.0).moving(1.0, 0.0),
    ];
    for policy in policies() {
        let mut k = kernel(&circles, policy);

        let m = k.detect_overlaps();
        assert!(m.get(0, 1) && m.get(1, 0), "0-1 at distance 7 < 10 ({policy:?})");
        assert!(!m.get(0, 2) && !m.get(2, 0), "0-2 at distance 20 ({policy:?})");
        assert!(!m.get(1, 2) && !m.get(2, 1), "1-2 at distance 13 ({policy:?})");
        assert_eq!(m.pairs().collect::<Vec<_>>(), vec![(0, 1)]);

        k.advance();
        assert_eq!(k.xs(), &[1.0, 8.0, 21.0]);
        assert_eq!(k.ys(), &[0.0, 0.0, 0.0]);

        let m = k.detect_overlaps();
        assert!(m.get(0, 1), "0-1 still 7 apart after a uniform step ({policy:?})");
        assert_eq!(m.pair_count(), 1);
    }
}

#[test]
fn touching_circles_do_not_overlap() {
    // Axis-aligned: distance 4 == 1.5 + 2.5.
    let touching = [Circle::at(0.0, 0.0, 1.5), Circle::at(4.0, 0.0, 2.5)];
    // 3-4-5 triangle: distance 5 == 2 + 3.
    let diagonal = [Circle::at(0.0, 0.0, 2.0), Circle::at(3.0, 4.0, 3.0)];
    for policy in policies() {
        assert!(!kernel(&touching, policy).detect_overlaps().get(0, 1), "{policy:?}");
        assert!(!kernel(&diagonal, policy).detect_overlaps().get(0, 1), "{policy:?}");
    }
}

#[test]
fn slightly_closer_than_touching_overlaps() {
    let eps = 1.0e-3;
    let near = [Circle::at(0.0, 0.0, 1.5), Circle::at(4.0 - eps, 0.0, 2.5)];
    let near_y = [Circle::at(0.0, 10.0, 1.5), Circle::at(0.0, 14.0 - eps, 2.5)];
    for policy in policies() {
        assert!(kernel(&near, policy).detect_overlaps().get(1, 0), "{policy:?}");
        assert!(kernel(&near_y, policy).detect_overlaps().get(0, 1), "{policy:?}");
    }
}

#[test]
fn coincident_circles_overlap_but_never_themselves() {
    let stacked = vec![Circle::at(3.0, 3.0, 1.0); 11];
    for policy in policies() {
        let mut k = kernel(&stacked, policy);
        let m = k.detect_overlaps();
        for i in 0..11 {
            assert!(!m.get(i, i), "self overlap at {i} ({policy:?})");
            assert_eq!(m.row(i).count(), 10, "row {i} ({policy:?})");
        }
        assert_eq!(m.pair_count(), 55);
    }
}

#[test]
fn padding_lanes_never_report_overlaps() {
    // A circle at the origin would "overlap" the zeroed padding lanes if they
    // leaked into the result.
    let circles = [Circle::at(0.0, 0.0, 50.0), Circle::at(500.0, 0.0, 1.0)];
    for policy in policies() {
        let mut k = kernel(&circles, policy);
        let m = k.detect_overlaps();
        assert_eq!(m.row_bytes(0), &[0]);
        assert_eq!(m.pair_count(), 0);
    }
}

#[test]
fn single_entity_population_has_no_pairs() {
    for policy in policies() {
        let mut k = kernel(&[Circle::at(1.0, 1.0, 1.0)], policy);
        assert_eq!(k.detect_overlaps().pair_count(), 0);
    }
}

#[test]
fn invalid_inputs_fail_construction() {
    let policy = ExecPolicy::default();
    assert_eq!(CollisionKernel::from_circles(&[], policy).err(), Some(KernelError::EmptyPopulation));
    assert_eq!(
        CollisionKernel::from_circles(&[Circle::at(0.0, 0.0, -1.0)], policy).err(),
        Some(KernelError::NonPositiveRadius { min: -1.0 })
    );
    let zero_workers = ExecPolicy { workers: 0, ..policy };
    assert_eq!(
        CollisionKernel::from_circles(&[Circle::at(0.0, 0.0, 1.0)], zero_workers).err(),
        Some(KernelError::ZeroWorkers)
    );
}

#[test]
fn unallocatable_population_fails_construction() {
    let huge = Scenario { population: usize::MAX, ..Scenario::default() };
    assert!(matches!(
        CollisionKernel::create(&huge),
        Err(KernelError::Allocation { .. })
    ));
}

#[test]
fn explicit_avx_matches_cpu_support() {
    let result = CollisionKernel::from_circles(
        &[Circle::at(0.0, 0.0, 1.0)],
        ExecPolicy::with_lanes(Lanes::Avx),
    );
    if Lanes::available().contains(&Lanes::Avx) {
        assert_eq!(result.map(|k| k.lanes()).ok(), Some(Lanes::Avx));
    } else {
        assert_eq!(result.err(), Some(KernelError::UnsupportedLanes(Lanes::Avx)));
    }
}
