//! Seeded random streams.
//!
//! A run draws from exactly one [`RngHandle`] opened from its committed seed,
//! unless cells are given their own substreams. Substream seeds come from
//! SipHash-1-3 with zero keys over `(master seed, substream id)`, which does
//! not depend on platform or process.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

fn zero_keyed() -> SipHasher13 {
    SipHasher13::new_with_keys(0, 0)
}

/// Random stream for one run or one substream of it.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Stream seeded directly from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Independent stream number `substream` under `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of substream `substream` under `master_seed`.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = zero_keyed();
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// Stable 64-bit identifier for an ordered tuple of text values.
///
/// Each part is length-prefixed so `("ab", "c")` and `("a", "bc")` differ.
pub fn stable_key_id<S: AsRef<str>>(parts: &[S]) -> u64 {
    let mut hasher = zero_keyed();
    hasher.write_u64(parts.len() as u64);
    for part in parts {
        let bytes = part.as_ref().as_bytes();
        hasher.write_u64(bytes.len() as u64);
        hasher.write(bytes);
    }
    hasher.finish()
}
