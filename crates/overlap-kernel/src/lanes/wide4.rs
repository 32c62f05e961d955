// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! 4-lane batches: entity `i` is broadcast and tested against four `j` at a
//! time. Two quads fill one output byte.

use wide::{f32x4, CmpLt};

use crate::population::Population;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quad_mask(xi: f32x4, yi: f32x4, ri: f32x4, x: f32x4, y: f32x4, r: f32x4) -> u8 {
    let dx = xi - x;
    let dy = yi - y;
    let reach = ri + r;
    (dx * dx + dy * dy).cmp_lt(reach * reach).move_mask() as u8
}

pub(super) fn sweep_row(pop: &Population, i: usize, first_block: usize, row: &mut [u8]) {
    let xq = pop.x.quads();
    let yq = pop.y.quads();
    let rq = pop.radius.quads();
    let xi = f32x4::splat(pop.x.lanes()[i]);
    let yi = f32x4::splat(pop.y.lanes()[i]);
    let ri = f32x4::splat(pop.radius.lanes()[i]);

    for (b, out) in row.iter_mut().enumerate().skip(first_block) {
        let (lo, hi) = (2 * b, 2 * b + 1);
        let low = quad_mask(xi, yi, ri, xq[lo], yq[lo], rq[lo]);
        let high = quad_mask(xi, yi, ri, xq[hi], yq[hi], rq[hi]);
        *out = low | (high << 4);
    }
}

pub(super) fn advance(pop: &mut Population) {
    let vx = pop.vx.quads();
    for (x, v) in pop.x.quads_mut().iter_mut().zip(vx) {
        *x += *v;
    }
    let vy = pop.vy.quads();
    for (y, v) in pop.y.quads_mut().iter_mut().zip(vy) {
        *y += *v;
    }
}
