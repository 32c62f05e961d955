// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Stateful `xoroshiro128+` generator used to seed kernel populations.
///
/// * Not cryptographically secure.
/// * Matching seeds yield identical populations on every supported platform;
///   nothing here consults the OS or a thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: [u64; 2],
}

impl Prng {
    /// Constructs a generator from a single 64-bit seed via SplitMix64 expansion.
    pub fn from_seed(seed: u64) -> Self {
        fn splitmix64(state: &mut u64) -> u64 {
            *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = *state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        }

        let mut sm = seed;
        let mut state = [splitmix64(&mut sm), splitmix64(&mut sm)];
        // All-zero state is a fixed point of xoroshiro.
        if state == [0, 0] {
            state[0] = 0x9e37_79b9_7f4a_7c15;
        }
        Self { state }
    }

    /// Returns the next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.state[1] = s1.rotate_left(36);

        result
    }

    /// Returns the next float in `[0, 1)`.
    ///
    /// The high 23 bits fill the mantissa of a float in `[1, 2)`, which is
    /// then shifted down by one.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_unit(&mut self) -> f32 {
        let raw = self.next_u64();
        let bits = ((raw >> 41) as u32) | 0x3f80_0000;
        f32::from_bits(bits) - 1.0
    }

    /// Returns a uniform draw between `min` and `max` for the next unit draw `u`.
    ///
    /// Blends the ends as `min * (1 - u) + max * u` so no `max - min` span is
    /// formed; the span of two finite floats can overflow to infinity. The
    /// result is clamped to `[min, max]` against rounding at either end.
    pub fn next_in(&mut self, min: f32, max: f32) -> f32 {
        let u = self.next_unit();
        (min * (1.0 - u) + max * u).max(min).min(max)
    }
}
