//! Instance-Code processor: a streaming BLAKE3 hasher plus a running byte
//! counter, for exact-integrity verification.

/// Streaming Instance-Code builder, wrapping `blake3::Hasher`.
pub struct InstanceCodeProcessor {
    hasher: blake3::Hasher,
    byte_count: u64,
}

impl InstanceCodeProcessor {
    pub fn new() -> Self {
        Self {
            hasher: blake3::Hasher::new(),
            byte_count: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.byte_count += data.len() as u64;
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    /// Full BLAKE3 hash, as the source of both narrow and wide Instance-Code
    /// bodies and the hex-rendered `datahash` result field.
    pub fn hash(&self) -> blake3::Hash {
        self.hasher.finalize()
    }

    /// Full 32-byte BLAKE3 digest.
    pub fn digest(&self) -> [u8; 32] {
        *self.hash().as_bytes()
    }

    /// Narrow (8-byte) or wide (32-byte) Instance-Code body: the first N
    /// bytes of the full BLAKE3 digest.
    pub fn finalize(&self, wide: bool) -> Vec<u8> {
        let digest = self.digest();
        if wide {
            digest.to_vec()
        } else {
            digest[..8].to_vec()
        }
    }
}

impl Default for InstanceCodeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_count_tracks_total_input() {
        let mut p = InstanceCodeProcessor::new();
        p.update(b"hello ");
        p.update(b"world");
        assert_eq!(p.byte_count(), 11);
    }

    #[test]
    fn narrow_is_prefix_of_wide() {
        let mut p = InstanceCodeProcessor::new();
        p.update(b"the quick brown fox");
        let wide = p.finalize(true);
        let narrow = p.finalize(false);
        assert_eq!(&wide[..8], narrow.as_slice());
    }

    #[test]
    fn matches_blake3_reference_for_empty_input() {
        let p = InstanceCodeProcessor::new();
        assert_eq!(p.digest(), *blake3::hash(b"").as_bytes());
    }

    #[test]
    fn slicing_does_not_change_digest() {
        let data = b"abcdefghijklmnopqrstuvwxyz".repeat(1000);
        let mut whole = InstanceCodeProcessor::new();
        whole.update(&data);

        let mut sliced = InstanceCodeProcessor::new();
        for c in data.chunks(7) {
            sliced.update(c);
        }
        assert_eq!(whole.digest(), sliced.digest());
    }
}
