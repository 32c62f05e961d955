// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic random draws for population seeding.
//!
//! All draws round to `f32`, the precision of every kernel column.

mod prng;

pub use prng::Prng;
