// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

use crate::lanes::Lanes;

/// Errors surfaced while constructing a [`crate::CollisionKernel`].
///
/// Construction is all-or-nothing: no partially built kernel is ever
/// returned. `advance` and `detect_overlaps` cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// A population must hold at least one entity.
    #[error("population must contain at least one entity")]
    EmptyPopulation,
    /// A bounds pair was non-finite or had `min > max`.
    #[error("invalid {field} bounds: [{min}, {max}]")]
    InvalidBounds {
        /// Which scenario field was rejected.
        field: &'static str,
        /// Lower end as supplied.
        min: f32,
        /// Upper end as supplied.
        max: f32,
    },
    /// Radii must be strictly positive.
    #[error("radius lower bound must be > 0, got {min}")]
    NonPositiveRadius {
        /// Offending lower bound (or the offending radius of a synthetic circle).
        min: f32,
    },
    /// Backing storage for columns or the overlap matrix could not be reserved.
    #[error("failed to allocate {bytes} bytes of kernel storage")]
    Allocation {
        /// Size of the reservation that failed.
        bytes: usize,
    },
    /// The requested lane strategy is not available on this CPU.
    #[error("lane strategy {0:?} is not supported on this CPU")]
    UnsupportedLanes(Lanes),
    /// Parallel sweeps need at least one worker.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
}
