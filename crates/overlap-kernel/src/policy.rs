// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Execution policy: how the pair sweep is carried out.
//!
//! None of these knobs is observable in the overlap result; they only trade
//! throughput. The policy is resolved once when a kernel is built.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::error::KernelError;
use crate::lanes::{CpuFeatures, Lanes};

/// Which blocks of each row the pair loop visits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Sweep {
    /// Every row tests every block, filling both `(i, j)` and `(j, i)` directly.
    #[default]
    Full,
    /// Row `i` starts at the block holding `i` (`i & !7`); the skipped lower
    /// blocks are mirrored from the rows above afterwards.
    Triangle,
}

impl Sweep {
    /// Stable lowercase name, accepted back by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sweep {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "triangle" => Ok(Self::Triangle),
            _ => Err(ParsePolicyError::new("sweep", s)),
        }
    }
}

/// Failure to parse a policy knob from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParsePolicyError {
    kind: &'static str,
    value: String,
}

impl ParsePolicyError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}

/// Lane strategy, sweep shape and worker count for one kernel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExecPolicy {
    /// Inner-loop strategy.
    pub lanes: Lanes,
    /// Row coverage of the pair loop.
    pub sweep: Sweep,
    /// Threads sharing one `detect_overlaps` call; `1` runs inline.
    pub workers: usize,
}

impl Default for ExecPolicy {
    fn default() -> Self {
        Self { lanes: Lanes::Auto, sweep: Sweep::Full, workers: 1 }
    }
}

impl ExecPolicy {
    /// Single-threaded policy with the given lanes.
    pub fn with_lanes(lanes: Lanes) -> Self {
        Self { lanes, ..Self::default() }
    }

    /// Validates the policy and pins `Auto` to a concrete strategy.
    pub fn resolve(self, features: CpuFeatures) -> Result<Self, KernelError> {
        if self.workers == 0 {
            return Err(KernelError::ZeroWorkers);
        }
        Ok(Self { lanes: self.lanes.resolve(features)?, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_is_rejected() {
        let policy = ExecPolicy { workers: 0, ..ExecPolicy::default() };
        assert_eq!(policy.resolve(CpuFeatures::detect()), Err(KernelError::ZeroWorkers));
    }

    #[test]
    fn resolve_keeps_sweep_and_workers() {
        let policy = ExecPolicy { lanes: Lanes::Scalar, sweep: Sweep::Triangle, workers: 3 };
        assert_eq!(policy.resolve(CpuFeatures::default()), Ok(policy));
    }

    #[test]
    fn sweep_names_parse_back() {
        assert_eq!("Triangle".parse::<Sweep>(), Ok(Sweep::Triangle));
        assert_eq!("full".parse::<Sweep>(), Ok(Sweep::Full));
        let err = "diagonal".parse::<Sweep>().err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("unknown sweep `diagonal`"));
    }
}
