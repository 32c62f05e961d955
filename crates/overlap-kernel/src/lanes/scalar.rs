// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One pair per iteration. Reference for every vector strategy.

use crate::column::LANES;
use crate::population::Population;

pub(super) fn sweep_row(pop: &Population, i: usize, first_block: usize, row: &mut [u8]) {
    let xs = pop.x.lanes();
    let ys = pop.y.lanes();
    let rs = pop.radius.lanes();
    let (xi, yi, ri) = (xs[i], ys[i], rs[i]);

    for (b, out) in row.iter_mut().enumerate().skip(first_block) {
        let mut byte = 0u8;
        for k in 0..LANES {
            let j = b * LANES + k;
            let dx = xi - xs[j];
            let dy = yi - ys[j];
            let reach = ri + rs[j];
            if dx * dx + dy * dy < reach * reach {
                byte |= 1 << k;
            }
        }
        *out = byte;
    }
}

pub(super) fn advance(pop: &mut Population) {
    let vx = pop.vx.as_slice();
    for (x, v) in pop.x.as_mut_slice().iter_mut().zip(vx) {
        *x += *v;
    }
    let vy = pop.vy.as_slice();
    for (y, v) in pop.y.as_mut_slice().iter_mut().zip(vy) {
        *y += *v;
    }
}
