// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Packed N×N overlap matrix.
//!
//! Bit layout: row `i` owns `stride = ceil(N / 8)` bytes; bit `k` of byte `b`
//! is `overlap[i][8 * b + k]`. Bits for padding columns are always zero and the
//! diagonal is always clear once a sweep finishes.

use crate::column::{blocks_for, LANES};
use crate::error::KernelError;

const DIGEST_DOMAIN: &[u8] = b"overlap:matrix/v1";

/// Result of the most recent overlap sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapMatrix {
    len: usize,
    stride: usize,
    bits: Vec<u8>,
}

impl OverlapMatrix {
    /// Allocates an all-false matrix for `len` entities.
    pub(crate) fn zeroed(len: usize) -> Result<Self, KernelError> {
        let stride = blocks_for(len);
        let bytes = stride
            .checked_mul(len)
            .ok_or(KernelError::Allocation { bytes: usize::MAX })?;
        let mut bits = Vec::new();
        bits.try_reserve_exact(bytes).map_err(|_| KernelError::Allocation { bytes })?;
        bits.resize(bytes, 0);
        Ok(Self { len, stride, bits })
    }

    /// Number of entities (rows and columns).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-entity matrix.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns whether `i` and `j` overlapped in the last sweep.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> bool {
        assert!(i < self.len && j < self.len, "index ({i}, {j}) out of range for {}", self.len);
        self.bit(i, j)
    }

    /// Packed bytes of row `i`.
    pub fn row_bytes(&self, i: usize) -> &[u8] {
        &self.bits[i * self.stride..(i + 1) * self.stride]
    }

    /// Indices of every entity overlapping `i`, ascending.
    pub fn row(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.row_bytes(i).iter().enumerate().flat_map(|(b, &byte)| {
            (0..LANES).filter(move |k| byte & (1 << k) != 0).map(move |k| b * LANES + k)
        })
    }

    /// Canonical overlapping pairs `(i, j)` with `i < j`, sorted ascending.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len).flat_map(move |i| self.row(i).filter(move |&j| j > i).map(move |j| (i, j)))
    }

    /// Number of unordered overlapping pairs.
    pub fn pair_count(&self) -> usize {
        let set: usize = self.bits.iter().map(|b| b.count_ones() as usize).sum();
        set / 2
    }

    /// BLAKE3 digest of the matrix, stable across platforms and strategies.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DIGEST_DOMAIN);
        hasher.update(&(self.len as u64).to_le_bytes());
        hasher.update(&self.bits);
        hasher.finalize().into()
    }

    /// Mutable rows, one `stride`-sized chunk per entity.
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.bits.chunks_exact_mut(self.stride.max(1))
    }

    /// Mutable packed storage for worker range splits.
    pub(crate) fn bits_mut(&mut self) -> &mut [u8] {
        &mut self.bits
    }

    /// Fills `overlap[i][j]` for `j < (i & !7)` from `overlap[j][i]`.
    ///
    /// Used after a triangle sweep, which only computes blocks at or after the
    /// block containing the diagonal.
    pub(crate) fn mirror_lower(&mut self) {
        for i in 0..self.len {
            let first = i - i % LANES;
            for j in 0..first {
                let set = self.bit(j, i);
                self.set_bit(i, j, set);
            }
        }
    }

    fn bit(&self, i: usize, j: usize) -> bool {
        self.bits[i * self.stride + j / LANES] & (1 << (j % LANES)) != 0
    }

    fn set_bit(&mut self, i: usize, j: usize, on: bool) {
        let byte = &mut self.bits[i * self.stride + j / LANES];
        let mask = 1 << (j % LANES);
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}

/// Mask of valid columns in the last byte of a row for `len` entities.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn tail_mask(len: usize) -> u8 {
    match len % LANES {
        0 => 0xFF,
        rem => ((1u16 << rem) - 1) as u8,
    }
}

/// Clears padding columns and the diagonal bit in one freshly computed row.
pub(crate) fn finish_row(row: &mut [u8], i: usize, len: usize) {
    if let Some(last) = row.last_mut() {
        *last &= tail_mask(len);
    }
    row[i / LANES] &= !(1 << (i % LANES));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn matrix_with(len: usize, pairs: &[(usize, usize)]) -> OverlapMatrix {
        let mut m = OverlapMatrix::zeroed(len).unwrap();
        for &(i, j) in pairs {
            m.set_bit(i, j, true);
            m.set_bit(j, i, true);
        }
        m
    }

    #[test]
    fn stride_covers_partial_blocks() {
        let m = OverlapMatrix::zeroed(9).unwrap();
        assert_eq!(m.stride(), 2);
        assert_eq!(m.row_bytes(3).len(), 2);
    }

    #[test]
    fn oversized_matrix_reports_allocation_failure() {
        assert_eq!(
            OverlapMatrix::zeroed(usize::MAX).err(),
            Some(KernelError::Allocation { bytes: usize::MAX })
        );
    }

    #[test]
    fn pairs_are_canonical_and_sorted() {
        let m = matrix_with(12, &[(9, 2), (0, 11), (0, 1), (2, 3)]);
        let pairs: Vec<_> = m.pairs().collect();
        assert_eq!(pairs, vec![(0, 1), (0, 11), (2, 3), (2, 9)]);
        assert_eq!(m.pair_count(), 4);
        assert_eq!(m.row(2).collect::<Vec<_>>(), vec![3, 9]);
    }

    #[test]
    fn tail_mask_keeps_only_live_columns() {
        assert_eq!(tail_mask(8), 0xFF);
        assert_eq!(tail_mask(3), 0b0000_0111);
        assert_eq!(tail_mask(17), 0b0000_0001);
    }

    #[test]
    fn finish_row_clears_diagonal_and_padding() {
        let mut row = [0xFF, 0xFF];
        finish_row(&mut row, 9, 10);
        assert_eq!(row, [0xFF, 0b0000_0001]);
    }

    #[test]
    fn mirror_copies_upper_into_skipped_lower_blocks() {
        let mut m = OverlapMatrix::zeroed(20).unwrap();
        // Upper-only writes, as a triangle sweep would leave them.
        m.set_bit(1, 17, true);
        m.set_bit(3, 9, true);
        m.mirror_lower();
        assert!(m.get(17, 1));
        assert!(m.get(9, 3));
        assert_eq!(m.pair_count(), 2);
    }

    #[test]
    fn digest_tracks_contents() {
        let a = matrix_with(16, &[(0, 5)]);
        let b = matrix_with(16, &[(0, 5)]);
        let c = matrix_with(16, &[(0, 6)]);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }
}
