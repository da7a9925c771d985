//! Error taxonomy and exit-code accounting.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors: always exit code 2 (option conflicts, a malformed
/// checksum line under `--strict`, and output-path failures).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    OptionConflict(String),

    #[error("cannot open {path}: {source}")]
    OutputPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: unparsable checksum line")]
    MalformedChecksumLine { path: PathBuf, line: usize },

    #[error("read checksum file {path}: {source}")]
    ReadChecksumFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] crate::treewalk::StrictWalkError),
}

/// Accumulates generation/verification outcomes across all inputs so
/// `main` can pick the final exit code without threading state through
/// every call site.
#[derive(Default)]
pub struct RunSummary {
    /// An input could not be opened, read, or (in verification) matched.
    pub had_failure: bool,
    /// A fatal error occurred; the process should stop and report it.
    pub had_fatal: bool,
}

impl RunSummary {
    pub fn mark_failure(&mut self) {
        self.had_failure = true;
    }

    pub fn mark_fatal(&mut self) {
        self.had_fatal = true;
    }

    /// `2` if a fatal error occurred, `1` if only soft failures occurred,
    /// `0` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.had_fatal {
            2
        } else if self.had_failure {
            1
        } else {
            0
        }
    }
}
