//! ISCC-SUM: content-defined-chunking similarity hashing (Data-Code) and
//! BLAKE3 exact-integrity hashing (Instance-Code), combined into a single
//! checksum-tool-style identifier with deterministic tree traversal,
//! verification, and similarity clustering.

pub mod chunker;
pub mod cli;
pub mod datacode;
pub mod error;
pub mod gear;
pub mod instancecode;
pub mod iscc;
pub mod minhash;
pub mod treewalk;
pub mod utils;
pub mod xxhash32;
