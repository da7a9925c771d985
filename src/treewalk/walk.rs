//! Recursive treewalk: deterministic file ordering, with an optional
//! cascading ignore engine layered on top.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use super::ignore::{self, IgnoreRule};
use super::listdir::{Entry, listdir};

/// Result of a walk: yielded files, plus any directory the walker could not
/// read (permission denied, race with deletion, etc).
#[derive(Default)]
pub struct WalkReport {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Fatal in `--strict` mode: a directory read failed and the caller asked
/// for traversal errors to abort the whole walk.
#[derive(Debug, thiserror::Error)]
#[error("read directory {path}: {source}")]
pub struct StrictWalkError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

fn is_ignore_style_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with("ignore") && name.len() > 1
}

fn split_entries(entries: Vec<Entry>) -> (Vec<Entry>, Vec<Entry>, Vec<Entry>) {
    let mut ignore_files = Vec::new();
    let mut other_files = Vec::new();
    let mut dirs = Vec::new();
    for entry in entries {
        if entry.is_dir {
            dirs.push(entry);
        } else if is_ignore_style_name(&entry.name) {
            ignore_files.push(entry);
        } else {
            other_files.push(entry);
        }
    }
    (ignore_files, other_files, dirs)
}

/// Plain treewalk: ignore-style files first, then other files, then recurse
/// into subdirectories, all sorted; no content-based filtering.
pub fn treewalk(root: &Path, strict: bool) -> Result<WalkReport, StrictWalkError> {
    let mut report = WalkReport::default();
    treewalk_rec(root, strict, &mut report)?;
    Ok(report)
}

fn treewalk_rec(dir: &Path, strict: bool, report: &mut WalkReport) -> Result<(), StrictWalkError> {
    let entries = match listdir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            if strict {
                return Err(StrictWalkError {
                    path: dir.to_path_buf(),
                    source: std::io::Error::other(err),
                });
            }
            warn!("skipping unreadable directory {}: {}", dir.display(), err);
            report.skipped.push(dir.to_path_buf());
            return Ok(());
        }
    };
    let (ignore_files, other_files, dirs) = split_entries(entries);
    for entry in ignore_files.into_iter().chain(other_files) {
        report.files.push(dir.join(entry.name));
    }
    for entry in dirs {
        treewalk_rec(&dir.join(&entry.name), strict, report)?;
    }
    Ok(())
}

/// Treewalk-Ignore: same ordering, but files and subdirectories
/// excluded by the cascading ignore-file rule set are skipped. An excluded
/// directory is still descended if it (or a descendant) carries any
/// whitelist (`!`) rule, so nested overrides stay reachable.
pub fn treewalk_ignore(
    root: &Path,
    ignore_file_name: &str,
    strict: bool,
) -> Result<WalkReport, StrictWalkError> {
    let mut report = WalkReport::default();
    treewalk_ignore_rec(root, ignore_file_name, &[], false, 0, strict, &mut report)?;
    Ok(report)
}

fn treewalk_ignore_rec(
    dir: &Path,
    ignore_file_name: &str,
    inherited: &[IgnoreRule],
    ancestor_excluded: bool,
    depth: usize,
    strict: bool,
    report: &mut WalkReport,
) -> Result<(), StrictWalkError> {
    let entries = match listdir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            if strict {
                return Err(StrictWalkError {
                    path: dir.to_path_buf(),
                    source: std::io::Error::other(err),
                });
            }
            warn!("skipping unreadable directory {}: {}", dir.display(), err);
            report.skipped.push(dir.to_path_buf());
            return Ok(());
        }
    };
    let (ignore_files, other_files, dirs) = split_entries(entries);

    let mut rules: Vec<IgnoreRule> = inherited.to_vec();
    if let Some(own) = ignore_files.iter().find(|e| e.name == ignore_file_name) {
        let path = dir.join(&own.name);
        if let Ok(contents) = fs::read_to_string(&path) {
            rules.extend(ignore::parse_rules(&contents, dir, depth));
        }
    }

    for entry in ignore_files.iter().chain(other_files.iter()) {
        let path = dir.join(&entry.name);
        if !ignore::is_excluded(&path, false, &rules, ancestor_excluded) {
            report.files.push(path);
        }
    }

    for entry in dirs {
        let path = dir.join(&entry.name);
        let dir_excluded = ignore::is_excluded(&path, true, &rules, ancestor_excluded);
        if dir_excluded && !has_whitelisted_descendant(&path, ignore_file_name) {
            continue;
        }
        treewalk_ignore_rec(&path, ignore_file_name, &rules, dir_excluded, depth + 1, strict, report)?;
    }
    Ok(())
}

/// Conservative "does this subtree contain any whitelist override" check:
/// scans ignore files beneath `dir` for a line starting with `!`, without
/// otherwise listing directory contents. Used only to decide whether an
/// excluded directory is still worth descending into.
fn has_whitelisted_descendant(dir: &Path, ignore_file_name: &str) -> bool {
    let entries = match listdir(dir) {
        Ok(entries) => entries,
        Err(_) => return false,
    };
    for entry in &entries {
        if entry.is_file && entry.name == ignore_file_name {
            let path = dir.join(&entry.name);
            if let Ok(contents) = fs::read_to_string(&path) {
                if contents
                    .lines()
                    .any(|line| line.trim_start().starts_with('!'))
                {
                    return true;
                }
            }
        }
    }
    for entry in &entries {
        if entry.is_dir && has_whitelisted_descendant(&dir.join(&entry.name), ignore_file_name) {
            return true;
        }
    }
    false
}

/// Treewalk-ISCC: `Treewalk-Ignore(".isccignore")`, with
/// `.iscc.json` paths dropped unconditionally. This suppression cannot be
/// overridden by any ignore pattern.
pub fn treewalk_iscc(root: &Path, strict: bool) -> Result<WalkReport, StrictWalkError> {
    let mut report = treewalk_ignore(root, ".isccignore", strict)?;
    report.files.retain(|p| {
        !p.to_string_lossy().ends_with(".iscc.json")
    });
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn tempdir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "iscc-sum-walk-test-{}-{}",
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

    #[test]
    fn plain_treewalk_orders_ignore_files_before_others_before_subdirs() {
        let dir = tempdir();
        write(&dir.join("zebra.txt"), "");
        write(&dir.join(".isccignore"), "");
        write(&dir.join("apple.txt"), "");
        fs::create_dir(dir.join("sub")).unwrap();
        write(&dir.join("sub/inner.txt"), "");

        let report = treewalk(&dir, false).unwrap();
        let names: Vec<_> = report
            .files
            .iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".isccignore", "apple.txt", "zebra.txt", "sub/inner.txt"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn ignore_cascade_whitelist_reaches_into_excluded_directory() {
        // root excludes build/, but build/.isccignore whitelists keep.bin.
        // keep.bin must still be yielded.
        let dir = tempdir();
        write(&dir.join(".isccignore"), "build/\n");
        write(&dir.join("build/keep.bin"), "keep");
        write(&dir.join("build/drop.bin"), "drop");
        write(&dir.join("build/.isccignore"), "!keep.bin\n");

        let report = treewalk_iscc(&dir, false).unwrap();
        let names: Vec<_> = report
            .files
            .iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"build/keep.bin".to_string()));
        assert!(!names.contains(&"build/drop.bin".to_string()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn directory_excluded_with_no_whitelist_is_pruned_entirely() {
        let dir = tempdir();
        write(&dir.join(".isccignore"), "build/\n");
        write(&dir.join("build/anything.bin"), "x");

        let report = treewalk_iscc(&dir, false).unwrap();
        assert!(report.files.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn iscc_json_is_never_yielded_even_if_whitelisted() {
        let dir = tempdir();
        write(&dir.join(".isccignore"), "*.iscc.json\n!manifest.iscc.json\n");
        write(&dir.join("manifest.iscc.json"), "{}");

        let report = treewalk_iscc(&dir, false).unwrap();
        assert!(report.files.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn shuffled_creation_order_does_not_change_yielded_order() {
        let dir_a = tempdir();
        write(&dir_a.join("b.txt"), "");
        write(&dir_a.join("a.txt"), "");
        write(&dir_a.join("c.txt"), "");

        let dir_b = tempdir();
        write(&dir_b.join("c.txt"), "");
        write(&dir_b.join("a.txt"), "");
        write(&dir_b.join("b.txt"), "");

        let names = |report: &WalkReport, root: &Path| -> Vec<String> {
            report
                .files
                .iter()
                .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
                .collect()
        };

        let report_a = treewalk(&dir_a, false).unwrap();
        let report_b = treewalk(&dir_b, false).unwrap();
        assert_eq!(names(&report_a, &dir_a), names(&report_b, &dir_b));

        fs::remove_dir_all(&dir_a).ok();
        fs::remove_dir_all(&dir_b).ok();
    }
}
