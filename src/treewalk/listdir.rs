//! `listdir`: a deterministic, non-link-following directory listing.

use std::fs;
use std::path::Path;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Error)]
pub enum ListdirError {
    #[error("read directory {path}: {source}")]
    ReadDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read entry in {path}: {source}")]
    Entry {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One directory entry, filtered to regular files and regular directories.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub is_file: bool,
    pub is_dir: bool,
}

/// Read `dir`'s entries, drop anything that is not a regular file or a
/// regular directory (symlinks included), and sort by
/// `(nfc_utf8(name), original_utf8(name))` so the order is stable even when
/// two names NFC-normalize to the same string.
pub fn listdir(dir: &Path) -> Result<Vec<Entry>, ListdirError> {
    let read = fs::read_dir(dir).map_err(|source| ListdirError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for item in read {
        let item = item.map_err(|source| ListdirError::Entry {
            path: dir.to_path_buf(),
            source,
        })?;
        // `file_type()` reports the entry's own type without following a
        // trailing symlink, so symlinks never pass this filter.
        let file_type = match item.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };
        if !file_type.is_file() && !file_type.is_dir() {
            continue;
        }
        let name = item.file_name().to_string_lossy().into_owned();
        entries.push(Entry {
            name,
            is_file: file_type.is_file(),
            is_dir: file_type.is_dir(),
        });
    }

    entries.sort_by(|a, b| sort_key(&a.name).cmp(&sort_key(&b.name)));
    Ok(entries)
}

fn sort_key(name: &str) -> (String, &str) {
    (name.nfc().collect(), name)
}
