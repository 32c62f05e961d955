// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Brute-force broad-phase overlap kernel for circles.

This crate provides:
- A struct-of-arrays population (`x`, `y`, `vx`, `vy`, `radius`) stored in
  32-byte aligned 8-lane columns.
- `CollisionKernel`: constant-velocity `advance` and all-pairs
  `detect_overlaps` producing a packed, symmetric overlap matrix.
- Interchangeable inner-loop lane strategies (scalar, 4-lane, 8-lane and a
  hand-written AVX path) selected at construction by runtime detection.

Design notes:
- Deterministic: populations are seeded from a local xoroshiro128+ stream; no
  ambient RNG.
- Overlap is strict (`d² < (r_i + r_j)²`); touching circles do not overlap.
- Every lane strategy evaluates the same `f32` expression without fused
  multiply-add, so all strategies agree bit-for-bit.
- Complexity is O(n²) on purpose; there is no spatial partitioning.
"]

mod bounds;
mod column;
mod error;
mod kernel;
/// Inner-loop lane strategies and CPU capability detection.
pub mod lanes;
/// Deterministic pseudo-random numbers used to seed populations.
pub mod math;
mod overlap;
mod policy;
mod population;

pub use bounds::Bounds;
pub use column::{Column, LANES};
pub use error::KernelError;
pub use kernel::CollisionKernel;
pub use lanes::{CpuFeatures, Lanes};
pub use overlap::OverlapMatrix;
pub use policy::{ExecPolicy, ParsePolicyError, Sweep};
pub use population::{Circle, Population, Scenario};
