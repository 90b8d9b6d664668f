// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Seedable `xoroshiro128+` generator for randomized geometry algorithms.
///
/// * Not cryptographically secure; it only decorrelates input order (e.g. the
///   Welzl shuffle) so expected running times hold.
/// * Matching seeds yield identical sequences on every platform, so shape
///   construction stays reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: [u64; 2],
}

const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

impl Prng {
    /// Constructs a generator from two 64-bit seeds.
    ///
    /// The all-zero state is a fixed point of xoroshiro, so it is replaced by
    /// a constant.
    pub const fn from_seed(seed0: u64, seed1: u64) -> Self {
        let mut state = [seed0, seed1];
        if state[0] == 0 && state[1] == 0 {
            state[0] = GOLDEN;
        }
        Self { state }
    }

    /// Constructs a generator from a single seed via SplitMix64 expansion.
    pub const fn from_seed_u64(seed: u64) -> Self {
        const fn splitmix64(state: u64) -> (u64, u64) {
            let next = state.wrapping_add(GOLDEN);
            let mut z = next;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            (next, z ^ (z >> 31))
        }

        let (sm, s0) = splitmix64(seed);
        let (_, s1) = splitmix64(sm);
        Self::from_seed(s0, s1)
    }

    /// Returns the next raw 64-bit value.
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
    /// The high 52 bits fill the mantissa of a value in `[1, 2)`, so every
    /// representable step is equally likely.
    pub fn next_f64(&mut self) -> f64 {
        let bits = (self.next_u64() >> 12) | 0x3ff0_0000_0000_0000;
        f64::from_bits(bits) - 1.0
    }

    /// Returns a uniformly distributed index in `0..bound`.
    ///
    /// Rejection sampling avoids modulo bias. `bound == 0` returns 0.
    pub fn next_index(&mut self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }
        let span = bound as u64;
        let value = if span.is_power_of_two() {
            self.next_u64() & (span - 1)
        } else {
            let limit = u64::MAX - u64::MAX % span;
            loop {
                let candidate = self.next_u64();
                if candidate < limit {
                    break candidate % span;
                }
            }
        };
        // `value < bound`, which already fits in usize.
        usize::try_from(value).unwrap_or(0)
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

impl Default for Prng {
    fn default() -> Self {
        Self::from_seed_u64(0)
    }
}
