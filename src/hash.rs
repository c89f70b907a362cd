//! Trial hash functions and the node-index mapper.
//!
//! A trial function turns `(key, seed)` into an arbitrary signed integer. The graph builder
//! only ever sees that integer reduced into `[0, m)` by [`map_to_node`].

use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Pluggable `(key, seed) -> integer` capability.
///
/// Any `Fn(&[u8], u64) -> i64 + Send + Sync` closure implements it, which is how callers
/// plug in fixed tables or their own hash families.
pub trait TrialHash: Send + Sync {
    fn compute(&self, key: &[u8], seed: u64) -> i64;
}

impl<F> TrialHash for F
where
    F: Fn(&[u8], u64) -> i64 + Send + Sync,
{
    #[inline]
    fn compute(&self, key: &[u8], seed: u64) -> i64 {
        self(key, seed)
    }
}

/// Reduce a trial hash into a node index: `((raw % m) + m) % m`.
///
/// `m` must be non-zero.
#[inline]
pub fn map_to_node(trial: &dyn TrialHash, key: &[u8], seed: u64, m: u32) -> u32 {
    trial.compute(key, seed).rem_euclid(m as i64) as u32
}

/// Default trial family: SHA-256 over `seed || lane || key`, first 8 bytes as `i64`.
///
/// The lane byte separates the two functions of a pair.
#[derive(Clone, Copy, Debug)]
pub struct DigestTrial {
    lane: u8,
}

impl DigestTrial {
    pub const fn new(lane: u8) -> Self {
        Self { lane }
    }
}

impl TrialHash for DigestTrial {
    fn compute(&self, key: &[u8], seed: u64) -> i64 {
        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update([self.lane]);
        hasher.update(key);
        let digest = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        i64::from_le_bytes(word)
    }
}

/// XXH3 trial family; the seed is mixed with a per-function salt.
#[derive(Clone, Copy, Debug)]
pub struct Xxh3Trial {
    pub salt: u64,
}

impl TrialHash for Xxh3Trial {
    #[inline]
    fn compute(&self, key: &[u8], seed: u64) -> i64 {
        xxh3_64_with_seed(key, mix_salt(self.salt, seed)) as i64
    }
}

/// wyhash trial family; the seed is mixed with a per-function salt.
#[derive(Clone, Copy, Debug)]
pub struct WyTrial {
    pub salt: u64,
}

impl TrialHash for WyTrial {
    #[inline]
    fn compute(&self, key: &[u8], seed: u64) -> i64 {
        wyhash::wyhash(key, mix_salt(self.salt, seed)) as i64
    }
}

/// The two trial functions that pick an edge's endpoints.
#[derive(Clone)]
pub struct TrialPair {
    first: Arc<dyn TrialHash>,
    second: Arc<dyn TrialHash>,
}

impl TrialPair {
    pub fn new<A, B>(first: A, second: B) -> Self
    where
        A: TrialHash + 'static,
        B: TrialHash + 'static,
    {
        Self {
            first: Arc::new(first),
            second: Arc::new(second),
        }
    }

    /// Two SHA-256 lanes. This is the default.
    pub fn digest() -> Self {
        Self::new(DigestTrial::new(0), DigestTrial::new(1))
    }

    pub fn xxh3() -> Self {
        Self::new(
            Xxh3Trial { salt: 0x9E37_79B9_7F4A_7C15 },
            Xxh3Trial { salt: 0x853C_49E6_0A6C_9D39 },
        )
    }

    pub fn wyhash() -> Self {
        Self::new(
            WyTrial { salt: 0xC0FF_EE00_D15E_A5E },
            WyTrial { salt: 0xA24B_1F6F },
        )
    }

    /// Endpoints `(v, w)` of `key` under `seed` in a graph of `m` nodes.
    #[inline]
    pub fn nodes(&self, key: &[u8], seed: u64, m: u32) -> (u32, u32) {
        (
            map_to_node(self.first.as_ref(), key, seed, m),
            map_to_node(self.second.as_ref(), key, seed, m),
        )
    }
}

impl Default for TrialPair {
    fn default() -> Self {
        Self::digest()
    }
}

impl fmt::Debug for TrialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrialPair").finish_non_exhaustive()
    }
}

/// Deterministically tweak a base salt by seed (FNV-like).
#[inline]
fn mix_salt(base: u64, seed: u64) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut h = FNV_OFFSET ^ base;
    h ^= seed;
    h = h.wrapping_mul(FNV_PRIME);
    h ^ (h >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapper_is_sign_correct() {
        let negative = |_: &[u8], _: u64| -> i64 { -1 };
        assert_eq!(map_to_node(&negative, b"k", 0, 12), 11);

        let min = |_: &[u8], _: u64| i64::MIN;
        assert!(map_to_node(&min, b"k", 0, 7) < 7);

        let exact = |_: &[u8], _: u64| -> i64 { 24 };
        assert_eq!(map_to_node(&exact, b"k", 0, 12), 0);
    }

    #[test]
    fn digest_lanes_differ_and_are_seeded() {
        let a = DigestTrial::new(0);
        let b = DigestTrial::new(1);
        assert_eq!(a.compute(b"house", 3), a.compute(b"house", 3));
        assert_ne!(a.compute(b"house", 3), b.compute(b"house", 3));
        assert_ne!(a.compute(b"house", 3), a.compute(b"house", 4));
    }

    #[test]
    fn every_family_stays_in_range() {
        for pair in [TrialPair::digest(), TrialPair::xxh3(), TrialPair::wyhash()] {
            for seed in 0..16 {
                let (v, w) = pair.nodes(b"trip", seed, 13);
                assert!(v < 13 && w < 13);
            }
        }
    }
}
