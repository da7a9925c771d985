//! Data-Code processor: composes the CDC splitter, the feature hasher, and
//! the MinHash sketch into a single `update`/`finalize` object.

use crate::chunker::CdcSplitter;
use crate::minhash::MinHashSketch;
use crate::xxhash32::FeatureHasher;

/// Streaming Data-Code builder. Must see the entire stream before
/// `finalize` is called; produces identical output regardless of how the
/// caller slices its `update` calls.
pub struct DataCodeProcessor {
    splitter: CdcSplitter,
    current_chunk: FeatureHasher,
    sketch: MinHashSketch,
}

impl DataCodeProcessor {
    pub fn new() -> Self {
        Self {
            splitter: CdcSplitter::new(),
            current_chunk: FeatureHasher::new(),
            sketch: MinHashSketch::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        let mut start = 0usize;
        for (i, &byte) in data.iter().enumerate() {
            if self.splitter.consume_byte(byte) {
                self.current_chunk.write(&data[start..=i]);
                let finished = std::mem::replace(&mut self.current_chunk, FeatureHasher::new());
                self.sketch.update(finished.finish());
                start = i + 1;
            }
        }
        if start < data.len() {
            self.current_chunk.write(&data[start..]);
        }
    }

    /// Finalize narrow (64-bit, `wide = false`) or wide (256-bit,
    /// `wide = true`) Data-Code body bytes. Forces a boundary on any
    /// trailing partial chunk first.
    pub fn finalize(mut self, wide: bool) -> Vec<u8> {
        if self.splitter.has_pending() {
            let finished = std::mem::replace(&mut self.current_chunk, FeatureHasher::new());
            self.sketch.update(finished.finish());
            self.splitter.finalize();
        }
        if wide {
            self.sketch.finalize_wide().to_vec()
        } else {
            self.sketch.finalize_narrow().to_vec()
        }
    }
}

impl Default for DataCodeProcessor {
    fn default() -> Self {
        Self::new()
    }
}
