//! Verification flow: re-hash each recorded target and compare.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use data_encoding::BASE32_NOPAD;
use log::warn;

use super::checksum_file::parse_line;
use crate::error::{CliError, RunSummary};
use crate::iscc::IsccSumProcessor;

pub struct VerifyOptions {
    pub quiet: bool,
    pub status: bool,
    pub warn_unparsable: bool,
    pub strict: bool,
}

/// Verify every checksum-list file in `checksum_paths`. Writes per-target
/// `OK`/`FAILED` lines (unless suppressed) and a final summary line, and
/// updates `summary` with the exit-code-relevant outcome.
pub fn run<W: Write>(
    checksum_paths: &[PathBuf],
    opts: &VerifyOptions,
    out: &mut W,
    summary: &mut RunSummary,
) -> Result<(), CliError> {
    let mut mismatches = 0usize;
    let mut total = 0usize;

    for checksum_path in checksum_paths {
        let contents = fs::read_to_string(checksum_path).map_err(|source| {
            CliError::ReadChecksumFile {
                path: checksum_path.clone(),
                source,
            }
        })?;
        let base_dir = checksum_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        for (line_no, line) in contents.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let parsed = match parse_line(line) {
                Some(p) => p,
                None => {
                    if opts.strict {
                        return Err(CliError::MalformedChecksumLine {
                            path: checksum_path.clone(),
                            line: line_no + 1,
                        });
                    }
                    if opts.warn_unparsable {
                        warn!("{}:{}: unparsable line", checksum_path.display(), line_no + 1);
                    }
                    continue;
                }
            };

            total += 1;
            let target = resolve_target(&base_dir, &parsed.path);
            let ok = verify_one(&target, parsed.is_tree, &parsed.iscc, opts.strict)?;
            if !ok {
                mismatches += 1;
                summary.mark_failure();
            }
            write_result(out, &parsed.path, ok, opts)?;
        }
    }

    if !opts.status && total > 0 {
        write_summary(out, mismatches)?;
    }
    Ok(())
}

fn resolve_target(base_dir: &Path, recorded_path: &str) -> PathBuf {
    let recorded_path = recorded_path.trim_end_matches('/');
    let path = Path::new(recorded_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn verify_one(
    target: &Path,
    is_tree: bool,
    expected_iscc: &str,
    strict: bool,
) -> Result<bool, CliError> {
    let wide = expected_wide(expected_iscc);
    let actual = match recompute(target, is_tree, wide, strict) {
        Ok(actual) => actual,
        Err(_) => return Ok(false),
    };
    Ok(actual == expected_iscc)
}

/// Decode the subtype nibble to recompute with the same narrow/wide body
/// width the checksum line was generated with.
fn expected_wide(iscc_text: &str) -> bool {
    let Some(encoded) = iscc_text.strip_prefix("ISCC:") else {
        return true;
    };
    let Ok(packed) = BASE32_NOPAD.decode(encoded.as_bytes()) else {
        return true;
    };
    packed.first().is_some_and(|b| b & 0x0F == 0b0111)
}

fn recompute(target: &Path, is_tree: bool, wide: bool, strict: bool) -> Result<String, CliError> {
    let mut processor = IsccSumProcessor::new();
    if is_tree {
        let report = crate::treewalk::treewalk_iscc(target, strict)?;
        for file in report.files {
            let bytes = fs::read(&file).map_err(|source| CliError::Io {
                path: file,
                source,
            })?;
            processor.update(&bytes);
        }
    } else {
        let bytes = fs::read(target).map_err(|source| CliError::Io {
            path: target.to_path_buf(),
            source,
        })?;
        processor.update(&bytes);
    }
    Ok(processor.result(wide, false).iscc)
}

fn write_result<W: Write>(
    out: &mut W,
    recorded_path: &str,
    ok: bool,
    opts: &VerifyOptions,
) -> io::Result<()> {
    if opts.status {
        return Ok(());
    }
    if ok && opts.quiet {
        return Ok(());
    }
    writeln!(out, "{}: {}", recorded_path, if ok { "OK" } else { "FAILED" })
}

fn write_summary<W: Write>(out: &mut W, mismatches: usize) -> io::Result<()> {
    if mismatches > 0 {
        writeln!(
            out,
            "{mismatches} computed checksum{} did NOT match",
            if mismatches == 1 { "" } else { "s" }
        )
    } else {
        Ok(())
    }
}
