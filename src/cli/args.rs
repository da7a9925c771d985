//! Command-line grammar: a closed, externally observable option set.

use std::path::PathBuf;

use clap::Parser;

use crate::error::CliError;

/// Compute or verify ISCC-SUM content identifiers.
#[derive(Clone, Parser)]
#[command(name = "iscc-sum", version, about = "Compute or verify ISCC-SUM content identifiers.")]
pub struct Cli {
    /// File or directory to process. Omit to read a single stream from
    /// standard input, displayed as `-`.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Read each PATH as a checksum list and verify the referenced targets.
    #[arg(short = 'c', long)]
    pub check: bool,

    /// Emit BSD-style lines (`ISCC (<path>) = <iscc>`) instead of the
    /// default `<iscc> *<path>` form.
    #[arg(long)]
    pub tag: bool,

    /// Terminate each output record with a NUL byte instead of a newline.
    #[arg(short = 'z', long)]
    pub zero: bool,

    /// Use the 128-bit (ISO-narrow) body; default is 256-bit wide.
    #[arg(long)]
    pub narrow: bool,

    /// After each main line, emit the standalone Data-Code and
    /// Instance-Code units as two indented lines.
    #[arg(long)]
    pub units: bool,

    /// Run similarity clustering over the given inputs; mutually exclusive
    /// with `--check`.
    #[arg(long)]
    pub similar: bool,

    /// Hamming-distance cutoff for `--similar`.
    #[arg(long, value_name = "N", default_value_t = 12)]
    pub threshold: u32,

    /// Treat a single directory argument as one logical object; emit one
    /// line with a path ending in `/`.
    #[arg(short = 't', long)]
    pub tree: bool,

    /// Verification: suppress per-file `OK` lines.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verification: emit nothing; exit code alone carries the result.
    #[arg(long)]
    pub status: bool,

    /// Verification: warn on unparsable lines.
    #[arg(short = 'w', long)]
    pub warn: bool,

    /// Verification: unparsable lines are fatal.
    #[arg(long)]
    pub strict: bool,

    /// Write output to PATH (binary, UTF-8, LF) instead of standard output.
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Option-conflict checks: fatal with a usage message, exit 2.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.similar && self.check {
            return Err(CliError::OptionConflict(
                "--similar cannot be combined with --check".to_string(),
            ));
        }
        if self.tree {
            if self.paths.len() > 1 {
                return Err(CliError::OptionConflict(
                    "--tree requires a single directory argument".to_string(),
                ));
            }
            if let Some(path) = self.paths.first()
                && path.is_file()
            {
                return Err(CliError::OptionConflict(format!(
                    "--tree requires a directory, {} is a file",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}
