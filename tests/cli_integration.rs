//! CLI-surface integration tests: option validation, the ignore cascade
//! reachable through path expansion, and malformed checksum-line handling
//! under `--strict`/`--warn`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use iscc_sum::cli::args::Cli;
use iscc_sum::cli::generate::{self, GenerateOptions};
use iscc_sum::cli::path_expand;
use iscc_sum::cli::verify::{self, VerifyOptions};
use iscc_sum::error::RunSummary;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tempdir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "iscc-sum-cli-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn base_cli() -> Cli {
    Cli {
        paths: Vec::new(),
        check: false,
        tag: false,
        zero: false,
        narrow: false,
        units: false,
        similar: false,
        threshold: 12,
        tree: false,
        quiet: false,
        status: false,
        warn: false,
        strict: false,
        output: None,
    }
}

#[test]
fn similar_and_check_conflict_is_rejected() {
    let mut cli = base_cli();
    cli.similar = true;
    cli.check = true;
    assert!(cli.validate().is_err());
}

#[test]
fn tree_with_multiple_paths_is_rejected() {
    let mut cli = base_cli();
    cli.tree = true;
    cli.paths = vec![PathBuf::from("a"), PathBuf::from("b")];
    assert!(cli.validate().is_err());
}

#[test]
fn tree_on_a_plain_file_is_rejected() {
    let dir = tempdir();
    let file = dir.join("leaf.txt");
    write(&file, "x");

    let mut cli = base_cli();
    cli.tree = true;
    cli.paths = vec![file];
    assert!(cli.validate().is_err());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn plain_generation_with_no_conflicts_validates() {
    let cli = base_cli();
    assert!(cli.validate().is_ok());
}

// The ignore cascade, exercised through path expansion rather than the
// raw treewalk (already covered at that layer in treewalk::walk's tests).
#[test]
fn generation_skips_ignored_files_via_path_expansion() {
    let dir = tempdir();
    write(&dir.join(".isccignore"), "build/\n");
    write(&dir.join("build/keep.bin"), "keep");
    write(&dir.join("build/drop.bin"), "drop");
    write(&dir.join("build/.isccignore"), "!keep.bin\n");

    let inputs = path_expand::expand(&[dir.clone()], false, false).unwrap();
    let mut summary = RunSummary::default();
    let opts = GenerateOptions { tag: false, zero: false, narrow: true, units: false };
    let records = generate::collect(inputs, &opts, &mut summary);

    let displays: Vec<&str> = records.iter().map(|r| r.display.as_str()).collect();
    assert!(displays.iter().any(|d| d.ends_with("keep.bin")));
    assert!(!displays.iter().any(|d| d.ends_with("drop.bin")));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_checksum_line_is_fatal_under_strict_and_skipped_otherwise() {
    let dir = tempdir();
    let checksum_path = dir.join("checksums.txt");
    fs::write(&checksum_path, "not a checksum line at all\n").unwrap();

    let mut out = Vec::new();
    let mut summary = RunSummary::default();
    let lenient = VerifyOptions { quiet: false, status: false, warn_unparsable: false, strict: false };
    verify::run(&[checksum_path.clone()], &lenient, &mut out, &mut summary).unwrap();
    assert!(out.is_empty());
    assert_eq!(summary.exit_code(), 0);

    let mut strict_summary = RunSummary::default();
    let strict = VerifyOptions { quiet: false, status: false, warn_unparsable: false, strict: true };
    let result = verify::run(&[checksum_path], &strict, &mut Vec::new(), &mut strict_summary);
    assert!(result.is_err());

    fs::remove_dir_all(&dir).ok();
}
