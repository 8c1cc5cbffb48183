//! Deterministic random number generator and seed derivation
//!
//! `GameRng` is a xorshift64 generator: tiny, portable and bit-exact across
//! platforms. Seeds are never taken from the environment; they are derived
//! from the inputs of the call that needs them via [`SeedMaterial`].

use crate::identity::{CharacterId, DefId, ItemId, RoomId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A deterministic random number generator
///
/// Never use thread-local or OS randomness in resolution or issuance; every
/// draw must be reproducible from the recorded seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift has a fixed point at zero
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        // Top 53 bits give an exactly representable fraction
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a random i32 in range [min, max]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        (i64::from(min) + (self.next_u64() % span) as i64) as i32
    }

    /// Generate a random usize in range [min, max]
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        min + (self.next_u64() % (max - min + 1) as u64) as usize
    }

    /// Pick an index for a weighted list
    ///
    /// Returns None if weights is empty or sums to zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }

        let mut threshold = self.next_f64() * total;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            threshold -= weight;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        weights.iter().rposition(|w| *w > 0.0)
    }

    /// Shuffle a slice in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = (self.next_u64() % (i as u64 + 1)) as usize;
            slice.swap(i, j);
        }
    }
}

/// Accumulates the inputs that determine a seed
///
/// Every field is length-prefixed before hashing so `("ab", "c")` and
/// `("a", "bc")` never collide.
#[derive(Clone)]
pub struct SeedMaterial {
    hasher: Sha256,
}

impl SeedMaterial {
    /// Start a new seed under a domain tag (e.g. `"resolve"`, `"issue"`)
    pub fn new(domain: &str) -> Self {
        let mut material = Self {
            hasher: Sha256::new(),
        };
        material.push_bytes(domain.as_bytes());
        material
    }

    /// Mix in a string field
    pub fn with_str(mut self, value: &str) -> Self {
        self.push_bytes(value.as_bytes());
        self
    }

    /// Mix in an integer field
    pub fn with_u64(mut self, value: u64) -> Self {
        self.push_bytes(&value.to_le_bytes());
        self
    }

    /// Finish and fold the first eight digest bytes into a seed
    pub fn finish(self) -> u64 {
        let digest = self.hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
    }
}

/// Derive the resolution seed for one action
///
/// Items are hashed in request order; reordering the items changes the seed.
pub fn derive_seed(
    character: CharacterId,
    action: &DefId,
    room: &RoomId,
    items: &[ItemId],
    explicit_seed: &str,
) -> u64 {
    let mut material = SeedMaterial::new("resolve")
        .with_u64(character.raw())
        .with_str(action.as_str())
        .with_str(room.as_str())
        .with_u64(items.len() as u64);
    for item in items {
        material = material.with_u64(item.raw());
    }
    material.with_str(explicit_seed).finish()
}
