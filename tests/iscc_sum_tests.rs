//! End-to-end tests over the public API: tree-mode equivalence, similarity
//! clustering, and checksum verification.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use iscc_sum::cli::format::LineWriter;
use iscc_sum::cli::generate::{self, GenerateOptions};
use iscc_sum::cli::path_expand::{self, Input};
use iscc_sum::cli::similarity::{self, Candidate};
use iscc_sum::cli::verify::{self, VerifyOptions};
use iscc_sum::error::RunSummary;
use iscc_sum::iscc::IsccSumProcessor;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tempdir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "iscc-sum-e2e-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Deterministic pseudo-random bytes, same formula style used in the
/// library's own unit tests (no RNG dependency needed).
fn filler(len: usize, seed: u32) -> Vec<u8> {
    (0..len as u32)
        .map(|i| ((i.wrapping_mul(2654435761).wrapping_add(seed)) >> 13) as u8)
        .collect()
}

// Tree mode matches processing the concatenated byte stream through a
// single processor, regardless of listing order.
#[test]
fn tree_mode_matches_concatenated_stream() {
    let dir = tempdir();
    write(&dir.join("b.txt"), b"world");
    write(&dir.join("a.txt"), b"hello");

    let inputs = path_expand::expand(&[dir.clone()], true, false).unwrap();
    assert_eq!(inputs.len(), 1);
    let Input::Tree { files, .. } = &inputs[0] else {
        panic!("expected a Tree input");
    };
    assert_eq!(
        files,
        &vec![dir.join("a.txt"), dir.join("b.txt")],
        "treewalk must yield a.txt before b.txt regardless of creation order"
    );

    let mut summary = RunSummary::default();
    let opts = GenerateOptions { tag: false, zero: false, narrow: false, units: false };
    let records = generate::collect(inputs, &opts, &mut summary);
    assert_eq!(records.len(), 1);
    assert!(!summary.had_fatal);
    assert!(records[0].display.ends_with('/'));

    let mut direct = IsccSumProcessor::new();
    direct.update(b"hello");
    direct.update(b"world");
    let direct_result = direct.result(true, false);
    assert_eq!(records[0].iscc, direct_result.iscc);

    fs::remove_dir_all(&dir).ok();
}

// A and a lightly mutated copy B cluster together; unrelated C is a
// singleton and is suppressed from the report.
#[test]
fn similarity_groups_related_files_and_drops_singleton() {
    let a = filler(64 * 1024, 1);
    let mut b = a.clone();
    // Insert a chunk's worth of bytes in the middle - a localized edit,
    // not a full rewrite.
    let insertion = filler(1500, 99);
    b.splice(32 * 1024..32 * 1024, insertion);
    let c = filler(64 * 1024, 777);

    let build = |label: &str, data: &[u8]| {
        let mut p = IsccSumProcessor::new();
        p.update(data);
        let result = p.result(true, false);
        let packed = generate::decode_packed(&result.iscc).unwrap();
        Candidate { display: label.to_string(), packed, iscc: result.iscc }
    };

    let candidates = vec![build("a", &a), build("b", &b), build("c", &c)];

    let mut buf = Vec::new();
    {
        let mut writer = LineWriter::new(&mut buf, false, false);
        similarity::run(&candidates, 32, &mut writer).unwrap();
    }
    let report = String::from_utf8(buf).unwrap();

    assert!(report.contains("*a"));
    assert!(report.contains("*b"));
    assert!(!report.contains("*c"), "unrelated singleton must be suppressed:\n{report}");
}

// A three-entry checksum file where the middle target was modified
// reports OK/FAILED/OK and the exact summary line.
#[test]
fn verify_reports_per_file_status_and_summary() {
    let dir = tempdir();
    write(&dir.join("a.txt"), b"alpha content");
    write(&dir.join("b.txt"), b"bravo content");
    write(&dir.join("c.txt"), b"charlie content");

    let mut summary = RunSummary::default();
    let inputs = path_expand::expand(
        &[dir.join("a.txt"), dir.join("b.txt"), dir.join("c.txt")],
        false,
        false,
    )
    .unwrap();
    let opts = GenerateOptions { tag: false, zero: false, narrow: false, units: false };
    let records = generate::collect(inputs, &opts, &mut summary);
    assert_eq!(records.len(), 3);

    let checksum_path = dir.join("checksums.txt");
    let mut checksum_bytes = Vec::new();
    {
        let mut writer = LineWriter::new(&mut checksum_bytes, false, false);
        for record in &records {
            generate::emit(record, &mut writer).unwrap();
        }
    }
    fs::write(&checksum_path, &checksum_bytes).unwrap();

    // Mutate the target referenced by the second line.
    write(&dir.join("b.txt"), b"bravo content, modified");

    let mut out = Vec::new();
    let mut verify_summary = RunSummary::default();
    let verify_opts = VerifyOptions { quiet: false, status: false, warn_unparsable: false, strict: false };
    verify::run(&[checksum_path], &verify_opts, &mut out, &mut verify_summary).unwrap();
    let report = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("a.txt: OK"), "{report}");
    assert!(lines[1].ends_with("b.txt: FAILED"), "{report}");
    assert!(lines[2].ends_with("c.txt: OK"), "{report}");
    assert_eq!(lines[3], "1 computed checksum did NOT match");
    assert_eq!(verify_summary.exit_code(), 1);

    fs::remove_dir_all(&dir).ok();
}

// Fragmenting an update stream never changes the result, end to end
// through the generation flow.
#[test]
fn fragmented_updates_match_single_update_end_to_end() {
    let data = filler(500_000, 42);

    let mut whole = IsccSumProcessor::new();
    whole.update(&data);
    let whole_result = whole.result(true, true);

    let mut fragmented = IsccSumProcessor::new();
    for chunk in data.chunks(4001) {
        fragmented.update(chunk);
    }
    let fragmented_result = fragmented.result(true, true);

    assert_eq!(whole_result.iscc, fragmented_result.iscc);
    assert_eq!(whole_result.datahash, fragmented_result.datahash);
    assert_eq!(whole_result.units.unwrap(), fragmented_result.units.unwrap());
}
