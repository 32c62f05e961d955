// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Vector instruction sets relevant to lane selection.
///
/// All fields are `false` on targets other than x86_64.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    /// SSE2 (always present on x86_64).
    pub sse2: bool,
    /// 256-bit float vectors; required by [`crate::Lanes::Avx`].
    pub avx: bool,
    /// 256-bit integer vectors. Reported for diagnostics only.
    pub avx2: bool,
}

impl CpuFeatures {
    /// Queries the running CPU.
    #[cfg(target_arch = "x86_64")]
    pub fn detect() -> Self {
        Self {
            sse2: is_x86_feature_detected!("sse2"),
            avx: is_x86_feature_detected!("avx"),
            avx2: is_x86_feature_detected!("avx2"),
        }
    }

    /// Queries the running CPU.
    #[cfg(not(target_arch = "x86_64"))]
    pub fn detect() -> Self {
        Self::default()
    }
}
