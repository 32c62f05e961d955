// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hand-written AVX path.
//!
//! Loads are aligned (`vmovaps`): column storage is a run of 32-byte aligned
//! `f32x8` blocks, so `ptr + 8 * b` is always on a register boundary and every
//! block index below `blocks().len()` is in bounds, padding included.
//!
//! The comparison is `_CMP_LT_OQ` (ordered, quiet), matching the strict `<`
//! of the portable strategies; `movemask` packs the eight lane signs straight
//! into the output byte.

use core::arch::x86_64::{
    __m256, _mm256_add_ps, _mm256_cmp_ps, _mm256_load_ps, _mm256_movemask_ps, _mm256_mul_ps,
    _mm256_set1_ps, _mm256_store_ps, _mm256_sub_ps, _CMP_LT_OQ,
};

use crate::column::LANES;
use crate::population::Population;

pub(super) fn sweep_row(pop: &Population, i: usize, first_block: usize, row: &mut [u8]) {
    debug_assert!(std::arch::is_x86_feature_detected!("avx"));
    // SAFETY: `Lanes::Avx` is only stored in a kernel after `Lanes::resolve`
    // confirmed AVX support on this CPU.
    unsafe { sweep_row_avx(pop, i, first_block, row) }
}

pub(super) fn advance(pop: &mut Population) {
    debug_assert!(std::arch::is_x86_feature_detected!("avx"));
    // SAFETY: as for `sweep_row`.
    unsafe { advance_avx(pop) }
}

#[target_feature(enable = "avx")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
unsafe fn sweep_row_avx(pop: &Population, i: usize, first_block: usize, row: &mut [u8]) {
    let xs = pop.x.lanes();
    let ys = pop.y.lanes();
    let rs = pop.radius.lanes();
    debug_assert!(row.len() * LANES <= xs.len());

    let xi = _mm256_set1_ps(xs[i]);
    let yi = _mm256_set1_ps(ys[i]);
    let ri = _mm256_set1_ps(rs[i]);

    for (b, out) in row.iter_mut().enumerate().skip(first_block) {
        let off = b * LANES;
        // SAFETY: `off + 8 <= lanes().len()` (one row byte per storage block)
        // and `off` is a multiple of 8 lanes, i.e. 32-byte aligned.
        let (x, y, r) = unsafe {
            (
                _mm256_load_ps(xs.as_ptr().add(off)),
                _mm256_load_ps(ys.as_ptr().add(off)),
                _mm256_load_ps(rs.as_ptr().add(off)),
            )
        };
        let dx = _mm256_sub_ps(xi, x);
        let dy = _mm256_sub_ps(yi, y);
        let dist_sq = _mm256_add_ps(_mm256_mul_ps(dx, dx), _mm256_mul_ps(dy, dy));
        let reach = _mm256_add_ps(ri, r);
        let hit: __m256 = _mm256_cmp_ps::<_CMP_LT_OQ>(dist_sq, _mm256_mul_ps(reach, reach));
        *out = _mm256_movemask_ps(hit) as u8;
    }
}

#[target_feature(enable = "avx")]
unsafe fn advance_avx(pop: &mut Population) {
    // SAFETY: AVX is enabled for this function; padding makes every column
    // a whole number of aligned blocks.
    unsafe {
        step_avx(bytemuck::cast_slice_mut(pop.x.blocks_mut()), pop.vx.lanes());
        step_avx(bytemuck::cast_slice_mut(pop.y.blocks_mut()), pop.vy.lanes());
    }
}

#[target_feature(enable = "avx")]
unsafe fn step_avx(pos: &mut [f32], vel: &[f32]) {
    debug_assert_eq!(pos.len(), vel.len());
    debug_assert_eq!(pos.len() % LANES, 0);
    for off in (0..pos.len()).step_by(LANES) {
        // SAFETY: `off + 8 <= len` for both slices and `off` is block aligned.
        unsafe {
            let p = _mm256_load_ps(pos.as_ptr().add(off));
            let v = _mm256_load_ps(vel.as_ptr().add(off));
            _mm256_store_ps(pos.as_mut_ptr().add(off), _mm256_add_ps(p, v));
        }
    }
}
