// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! 8-lane batches over whole storage blocks; one block yields one byte.

use wide::{f32x8, CmpLt};

use crate::population::Population;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(super) fn sweep_row(pop: &Population, i: usize, first_block: usize, row: &mut [u8]) {
    let xb = pop.x.blocks();
    let yb = pop.y.blocks();
    let rb = pop.radius.blocks();
    let xi = f32x8::splat(pop.x.lanes()[i]);
    let yi = f32x8::splat(pop.y.lanes()[i]);
    let ri = f32x8::splat(pop.radius.lanes()[i]);

    for (b, out) in row.iter_mut().enumerate().skip(first_block) {
        let dx = xi - xb[b];
        let dy = yi - yb[b];
        let reach = ri + rb[b];
        *out = (dx * dx + dy * dy).cmp_lt(reach * reach).move_mask() as u8;
    }
}

pub(super) fn advance(pop: &mut Population) {
    pop.x.add_assign_blocks(&pop.vx);
    pop.y.add_assign_blocks(&pop.vy);
}
