// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The collision kernel: a fixed population plus its latest overlap matrix.

use tracing::{debug, instrument};

use crate::column::LANES;
use crate::error::KernelError;
use crate::lanes::{self, CpuFeatures, Lanes};
use crate::overlap::{finish_row, OverlapMatrix};
use crate::policy::{ExecPolicy, Sweep};
use crate::population::{Circle, Population, Scenario};

/// Owns a fixed population of circles and produces, on demand, advanced
/// positions and the all-pairs overlap matrix.
///
/// Calling pattern per tick: [`advance`](Self::advance), then
/// [`detect_overlaps`](Self::detect_overlaps). Both take `&mut self`, so a
/// sweep can never observe a half-applied advance.
#[derive(Debug, Clone)]
pub struct CollisionKernel {
    pop: Population,
    overlaps: OverlapMatrix,
    policy: ExecPolicy,
    ticks: u64,
}

impl CollisionKernel {
    /// Builds a seeded kernel with the default policy (auto lanes, full
    /// sweep, one worker).
    pub fn create(scenario: &Scenario) -> Result<Self, KernelError> {
        Self::with_policy(scenario, ExecPolicy::default())
    }

    /// Builds a seeded kernel with an explicit execution policy.
    #[instrument(skip_all, fields(population = scenario.population, seed = scenario.seed))]
    pub fn with_policy(scenario: &Scenario, policy: ExecPolicy) -> Result<Self, KernelError> {
        let policy = policy.resolve(CpuFeatures::detect())?;
        let pop = Population::seeded(scenario)?;
        Self::assemble(pop, policy)
    }

    /// Builds a kernel over explicit circles (synthetic scenarios, tests).
    pub fn from_circles(circles: &[Circle], policy: ExecPolicy) -> Result<Self, KernelError> {
        let policy = policy.resolve(CpuFeatures::detect())?;
        let pop = Population::from_circles(circles)?;
        Self::assemble(pop, policy)
    }

    fn assemble(pop: Population, policy: ExecPolicy) -> Result<Self, KernelError> {
        let overlaps = OverlapMatrix::zeroed(pop.len())?;
        debug!(
            entities = pop.len(),
            lanes = %policy.lanes,
            sweep = %policy.sweep,
            workers = policy.workers,
            "collision kernel ready"
        );
        Ok(Self { pop, overlaps, policy, ticks: 0 })
    }

    /// Moves every entity by its velocity: `x += vx; y += vy`.
    pub fn advance(&mut self) {
        lanes::advance(self.policy.lanes, &mut self.pop);
        self.ticks += 1;
    }

    /// Recomputes the whole overlap matrix from current positions and radii.
    ///
    /// `overlap[i][j]` is `(dx² + dy²) < (r_i + r_j)²`; touching circles do
    /// not overlap and the diagonal is always `false`.
    pub fn detect_overlaps(&mut self) -> &OverlapMatrix {
        let len = self.pop.len();
        let ExecPolicy { lanes, sweep, workers } = self.policy;
        let pop = &self.pop;
        let workers = workers.min(len);

        if workers <= 1 {
            for (i, row) in self.overlaps.rows_mut().enumerate() {
                sweep_one(lanes, sweep, pop, i, row);
            }
        } else {
            let stride = self.overlaps.stride();
            let rows_per_worker = len.div_ceil(workers);
            let bits = self.overlaps.bits_mut();
            // Static row split: every worker owns a disjoint run of rows.
            std::thread::scope(|s| {
                for (w, chunk) in bits.chunks_mut(rows_per_worker * stride).enumerate() {
                    s.spawn(move || {
                        let base = w * rows_per_worker;
                        for (k, row) in chunk.chunks_exact_mut(stride).enumerate() {
                            sweep_one(lanes, sweep, pop, base + k, row);
                        }
                    });
                }
            });
        }

        if sweep == Sweep::Triangle {
            self.overlaps.mirror_lower();
        }
        &self.overlaps
    }

    /// Result of the most recent [`detect_overlaps`](Self::detect_overlaps)
    /// (all `false` before the first call).
    pub fn overlaps(&self) -> &OverlapMatrix {
        &self.overlaps
    }

    /// Shifts every position by `(dx, dy)`.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pop.translate(dx, dy);
    }

    /// Read-only population columns.
    pub fn population(&self) -> &Population {
        &self.pop
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.pop.len()
    }

    /// Always `false`; construction rejects empty populations.
    pub fn is_empty(&self) -> bool {
        self.pop.is_empty()
    }

    /// Entity `i` as a [`Circle`].
    pub fn circle(&self, i: usize) -> Circle {
        self.pop.circle(i)
    }

    /// Current x positions.
    pub fn xs(&self) -> &[f32] {
        self.pop.xs()
    }

    /// Current y positions.
    pub fn ys(&self) -> &[f32] {
        self.pop.ys()
    }

    /// Velocity x column.
    pub fn vxs(&self) -> &[f32] {
        self.pop.vxs()
    }

    /// Velocity y column.
    pub fn vys(&self) -> &[f32] {
        self.pop.vys()
    }

    /// Radius column.
    pub fn radii(&self) -> &[f32] {
        self.pop.radii()
    }

    /// The resolved policy (never `Lanes::Auto`).
    pub fn policy(&self) -> ExecPolicy {
        self.policy
    }

    /// The resolved lane strategy.
    pub fn lanes(&self) -> Lanes {
        self.policy.lanes
    }

    /// Number of `advance` calls so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn sweep_one(lanes: Lanes, sweep: Sweep, pop: &Population, i: usize, row: &mut [u8]) {
    let first_block = match sweep {
        Sweep::Full => 0,
        Sweep::Triangle => i / LANES,
    };
    lanes::sweep_row(lanes, pop, i, first_block, row);
    finish_row(row, i, pop.len());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line_of(n: usize) -> Vec<Circle> {
        (0..n).map(|i| Circle::at(i as f32 * 3.0, 0.0, 2.0)).collect()
    }

    #[test]
    fn auto_never_survives_construction() {
        let kernel = CollisionKernel::from_circles(&line_of(3), ExecPolicy::default())
            .unwrap();
        assert_ne!(kernel.lanes(), Lanes::Auto);
    }

    #[test]
    fn neighbours_on_a_line_overlap_only_with_adjacent() {
        // Spacing 3, reach 4: only |i - j| == 1 overlaps.
        let mut kernel = CollisionKernel::from_circles(&line_of(19), ExecPolicy::default())
            .unwrap();
        let m = kernel.detect_overlaps();
        let pairs: Vec<_> = m.pairs().collect();
        let expected: Vec<_> = (0..18).map(|i| (i, i + 1)).collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn more_workers_than_rows_is_fine() {
        let policy = ExecPolicy { workers: 64, ..ExecPolicy::default() };
        let mut kernel =
            CollisionKernel::from_circles(&line_of(5), policy).unwrap();
        assert_eq!(kernel.detect_overlaps().pair_count(), 4);
    }

    #[test]
    fn kernel_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CollisionKernel>();
    }

    #[test]
    fn advance_leaves_velocity_and_radius_alone() {
        let circles = [Circle::at(0.0, 0.0, 2.0).moving(0.5, -1.0)];
        let mut kernel =
            CollisionKernel::from_circles(&circles, ExecPolicy::default()).unwrap();
        kernel.advance();
        assert_eq!(kernel.vxs(), &[0.5]);
        assert_eq!(kernel.vys(), &[-1.0]);
        assert_eq!(kernel.radii(), &[2.0]);
    }

    #[test]
    fn ticks_count_advances() {
        let mut kernel = CollisionKernel::from_circles(&line_of(2), ExecPolicy::default())
            .unwrap();
        kernel.advance();
        kernel.advance();
        assert_eq!(kernel.ticks(), 2);
    }
}
