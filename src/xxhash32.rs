//! Feature hasher: reduces one chunk's bytes to a 32-bit feature that is
//! the sole input fed to the MinHash sketch for that chunk.
//!
//! xxHash32 itself is an external primitive like BLAKE3. This module is
//! the thin, streaming-friendly wrapper around `twox-hash`'s implementation,
//! seeded at 0.

use std::hash::Hasher;
use twox_hash::XxHash32;

/// Streaming xxHash32 (seed 0) accumulator for a single chunk's bytes.
///
/// Kept as a live `Hasher` across `write` calls rather than buffering the
/// chunk's bytes, so chunk features cost O(1) extra memory regardless of
/// chunk size.
pub struct FeatureHasher(XxHash32);

impl FeatureHasher {
    pub fn new() -> Self {
        Self(XxHash32::with_seed(0))
    }

    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }

    /// Consume the hasher and return the chunk's 32-bit feature.
    pub fn finish(self) -> u32 {
        self.0.finish() as u32
    }
}

impl Default for FeatureHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot helper used by tests and the similarity fixtures.
pub fn feature_hash(bytes: &[u8]) -> u32 {
    let mut h = FeatureHasher::new();
    h.write(bytes);
    h.finish()
}
