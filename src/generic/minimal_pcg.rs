//! A simple pseudorandom number generator.
//!
//! Specifically, a translation of the *really* minimal C PCG32 implementation from
//! <https://www.pcg-random.org/>, implemented to satisfy the [RngCore](rand_core::RngCore)
//! trait.
//!
//! PCG(32) was chosen as the default source of (pseudo)random numbers as it is simple,
//! fast, and deterministic given a seed, which keeps solves reproducible.
//! The [solver](crate::context) is generic over anything which satisfies [rand::Rng],
//! so revising the source of randomness is a type parameter away.

use rand::SeedableRng;
use rand_core::{impls, RngCore};

/// State and increment.
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl Default for MinimalPCG32 {
    fn default() -> Self {
        Self::from_seed(0u64.to_le_bytes())
    }
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;

        self.state = old_state
            .wrapping_mul(6364136223846793005_u64)
            .wrapping_add(self.inc);

        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        /// Entirely unmotivated.
        const INCREMENT: u64 = 3215534235932367345;
        Self {
            state: (u64::from_le_bytes(seed)).wrapping_add(INCREMENT),
            inc: INCREMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinism() {
        let mut a = MinimalPCG32::from_seed(2u64.to_le_bytes());
        let mut b = MinimalPCG32::from_seed(2u64.to_le_bytes());
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn seeds_differ() {
        let mut a = MinimalPCG32::from_seed(2u64.to_le_bytes());
        let mut b = MinimalPCG32::from_seed(3u64.to_le_bytes());
        let divergence = (0..64).any(|_| a.next_u32() != b.next_u32());
        assert!(divergence);
    }
}
