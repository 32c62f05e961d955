// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Aligned `f32` columns for the struct-of-arrays population.
//!
//! Layout contract:
//! - Storage is a run of `f32x8` blocks, so the first lane of every block sits
//!   on a 32-byte boundary and 4-lane views sit on 16-byte boundaries.
//! - Physical length is the logical length rounded up to [`LANES`].
//! - Padding lanes start at zero and are never written through the safe
//!   per-entity API.

use wide::{f32x4, f32x8};

use crate::error::KernelError;

/// Lanes per storage block (one AVX register of `f32`).
pub const LANES: usize = 8;

/// Number of blocks needed to hold `len` lanes.
pub(crate) const fn blocks_for(len: usize) -> usize {
    len.div_ceil(LANES)
}

/// Owned, fixed-length, 32-byte aligned column of `f32`.
#[derive(Debug, Clone)]
pub struct Column {
    blocks: Vec<f32x8>,
    len: usize,
}

impl Column {
    /// Allocates a zero-filled column of `len` logical lanes.
    pub fn zeroed(len: usize) -> Result<Self, KernelError> {
        let count = blocks_for(len);
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(count)
            .map_err(|_| KernelError::Allocation {
                bytes: count.saturating_mul(size_of::<f32x8>()),
            })?;
        blocks.resize(count, f32x8::splat(0.0));
        Ok(Self { blocks, len })
    }

    /// Logical length (entities), excluding padding.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the column holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical lanes as a flat slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.lanes()[..self.len]
    }

    /// Mutable logical lanes; padding stays out of reach.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        let len = self.len;
        &mut bytemuck::cast_slice_mut::<f32x8, f32>(&mut self.blocks)[..len]
    }

    /// Every lane including padding.
    pub fn lanes(&self) -> &[f32] {
        bytemuck::cast_slice(&self.blocks)
    }

    /// 8-lane blocks including padding.
    pub fn blocks(&self) -> &[f32x8] {
        &self.blocks
    }

    /// Mutable 8-lane blocks including padding.
    pub(crate) fn blocks_mut(&mut self) -> &mut [f32x8] {
        &mut self.blocks
    }

    /// The same storage viewed as 4-lane quads (twice as many entries).
    pub fn quads(&self) -> &[f32x4] {
        bytemuck::cast_slice(&self.blocks)
    }

    /// Mutable 4-lane view including padding.
    pub(crate) fn quads_mut(&mut self) -> &mut [f32x4] {
        bytemuck::cast_slice_mut(&mut self.blocks)
    }

    /// Adds `other` lane-wise into `self`, padding included.
    ///
    /// Both columns must have the same length.
    pub(crate) fn add_assign_blocks(&mut self, other: &Self) {
        debug_assert_eq!(self.len, other.len, "column length mismatch");
        for (dst, src) in self.blocks.iter_mut().zip(&other.blocks) {
            *dst += *src;
        }
    }

    /// Adds `delta` to every logical lane.
    pub(crate) fn offset(&mut self, delta: f32) {
        for v in self.as_mut_slice() {
            *v += delta;
        }
    }
}
