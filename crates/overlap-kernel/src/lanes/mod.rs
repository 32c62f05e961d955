// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Inner-loop lane strategies.
//!
//! Every strategy computes the same predicate per pair,
//! `(dx*dx + dy*dy) < (r_i + r_j)^2`, as separate `f32` multiplies and adds
//! (no fused multiply-add). Results are therefore identical across
//! strategies; the lane width only changes throughput.
//!
//! Row contract shared by all strategies: `sweep_row` writes bytes
//! `first_block..row.len()` of row `i`, one bit per column. Padding columns
//! and the diagonal are cleared afterwards by the caller.

mod detect;
mod scalar;
mod wide4;
mod wide8;

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod avx;

use core::fmt;
use core::str::FromStr;

pub use detect::CpuFeatures;

use crate::error::KernelError;
use crate::policy::ParsePolicyError;
use crate::population::Population;

/// Inner-loop execution strategy for `advance` and `detect_overlaps`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lanes {
    /// Pick the widest strategy the CPU supports at construction time.
    #[default]
    Auto,
    /// One pair per iteration over the SoA columns.
    Scalar,
    /// Portable 4-lane batches (`wide::f32x4`).
    X4,
    /// Portable 8-lane batches (`wide::f32x8`).
    X8,
    /// Hand-written AVX intrinsics over aligned 8-lane loads (x86_64 only).
    Avx,
}

impl Lanes {
    /// Every concrete strategy, narrowest first.
    pub const CONCRETE: [Self; 4] = [Self::Scalar, Self::X4, Self::X8, Self::Avx];

    /// Pairs evaluated per inner iteration (`None` for `Auto`).
    pub fn width(self) -> Option<usize> {
        match self {
            Self::Auto => None,
            Self::Scalar => Some(1),
            Self::X4 => Some(4),
            Self::X8 | Self::Avx => Some(8),
        }
    }

    /// Stable lowercase name, accepted back by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Scalar => "scalar",
            Self::X4 => "x4",
            Self::X8 => "x8",
            Self::Avx => "avx",
        }
    }

    /// Returns `true` when this strategy can run on a CPU with `features`.
    pub fn is_supported_by(self, features: CpuFeatures) -> bool {
        match self {
            Self::Avx => features.avx,
            _ => true,
        }
    }

    /// Concrete strategies runnable on this CPU, narrowest first.
    pub fn available() -> Vec<Self> {
        let features = CpuFeatures::detect();
        Self::CONCRETE.into_iter().filter(|l| l.is_supported_by(features)).collect()
    }

    /// Resolves `Auto` and rejects strategies the CPU cannot run.
    pub fn resolve(self, features: CpuFeatures) -> Result<Self, KernelError> {
        match self {
            Self::Auto if features.avx => Ok(Self::Avx),
            Self::Auto => Ok(Self::X8),
            lanes if lanes.is_supported_by(features) => Ok(lanes),
            lanes => Err(KernelError::UnsupportedLanes(lanes)),
        }
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lanes {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "scalar" => Ok(Self::Scalar),
            "x4" => Ok(Self::X4),
            "x8" => Ok(Self::X8),
            "avx" => Ok(Self::Avx),
            _ => Err(ParsePolicyError::new("lanes", s)),
        }
    }
}

/// Computes bytes `first_block..` of row `i` with the given strategy.
///
/// `lanes` must already be resolved and supported (see [`Lanes::resolve`]).
pub(crate) fn sweep_row(lanes: Lanes, pop: &Population, i: usize, first_block: usize, row: &mut [u8]) {
    match lanes {
        Lanes::Scalar => scalar::sweep_row(pop, i, first_block, row),
        Lanes::X4 => wide4::sweep_row(pop, i, first_block, row),
        Lanes::Auto | Lanes::X8 => wide8::sweep_row(pop, i, first_block, row),
        #[cfg(target_arch = "x86_64")]
        Lanes::Avx => avx::sweep_row(pop, i, first_block, row),
        #[cfg(not(target_arch = "x86_64"))]
        Lanes::Avx => wide8::sweep_row(pop, i, first_block, row),
    }
}

/// Applies `x += vx; y += vy` to every entity with the given strategy.
pub(crate) fn advance(lanes: Lanes, pop: &mut Population) {
    match lanes {
        Lanes::Scalar => scalar::advance(pop),
        Lanes::X4 => wide4::advance(pop),
        Lanes::Auto | Lanes::X8 => wide8::advance(pop),
        #[cfg(target_arch = "x86_64")]
        Lanes::Avx => avx::advance(pop),
        #[cfg(not(target_arch = "x86_64"))]
        Lanes::Avx => wide8::advance(pop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_AVX: CpuFeatures = CpuFeatures { sse2: true, avx: false, avx2: false };
    const WITH_AVX: CpuFeatures = CpuFeatures { sse2: true, avx: true, avx2: true };

    #[test]
    fn auto_prefers_avx_when_present() {
        assert_eq!(Lanes::Auto.resolve(WITH_AVX), Ok(Lanes::Avx));
        assert_eq!(Lanes::Auto.resolve(NO_AVX), Ok(Lanes::X8));
    }

    #[test]
    fn explicit_avx_without_support_is_rejected() {
        assert_eq!(Lanes::Avx.resolve(NO_AVX), Err(KernelError::UnsupportedLanes(Lanes::Avx)));
        assert_eq!(Lanes::X4.resolve(NO_AVX), Ok(Lanes::X4));
    }

    #[test]
    fn names_parse_back() {
        for lanes in [Lanes::Auto, Lanes::Scalar, Lanes::X4, Lanes::X8, Lanes::Avx] {
            assert_eq!(lanes.name().parse::<Lanes>().ok(), Some(lanes));
        }
        assert!("x16".parse::<Lanes>().is_err());
    }

    #[test]
    fn available_always_includes_portable_strategies() {
        let available = Lanes::available();
        assert!(available.starts_with(&[Lanes::Scalar, Lanes::X4, Lanes::X8]));
    }
}
