//! Treewalk-Ignore: a gitignore-style cascading pattern engine.
//!
//! Patterns are compiled with `globset` (the globbing primitive); whitelist
//! precedence and "last matching rule wins" are layered on top by hand.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher};

/// One parsed, compiled ignore-file line.
#[derive(Clone)]
pub struct IgnoreRule {
    matcher: GlobMatcher,
    is_whitelist: bool,
    is_directory_only: bool,
    /// Anchored rules (pattern contained a non-trailing `/`) match the full
    /// path relative to `source_dir`; unanchored rules match only the
    /// candidate's basename, at any depth under `source_dir`.
    anchored: bool,
    source_dir: PathBuf,
    #[allow(dead_code)]
    source_depth: usize,
}

impl IgnoreRule {
    fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if self.is_directory_only && !is_dir {
            return false;
        }
        let relative = path.strip_prefix(&self.source_dir).unwrap_or(path);
        if self.anchored {
            self.matcher.is_match(relative)
        } else {
            match relative.file_name() {
                Some(name) => self.matcher.is_match(Path::new(name)),
                None => false,
            }
        }
    }
}

/// Parse one ignore-file line into a rule, or `None` for blank/comment
/// lines. `source_dir` anchors relative patterns; `source_depth` is the
/// directory's depth from the walk root, kept for diagnostics.
pub fn parse_line(raw: &str, source_dir: &Path, source_depth: usize) -> Option<IgnoreRule> {
    let trimmed = trim_trailing_unescaped(raw);
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (is_whitelist, rest) = match trimmed.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, trimmed.as_str()),
    };
    let (is_directory_only, rest) = match rest.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    if rest.is_empty() {
        return None;
    }

    let anchored = rest.contains('/');
    let pattern = rest.strip_prefix('/').unwrap_or(rest);

    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .ok()
        .unwrap_or_else(|| Glob::new(pattern).expect("literal pattern always compiles"));

    Some(IgnoreRule {
        matcher: glob.compile_matcher(),
        is_whitelist,
        is_directory_only,
        anchored,
        source_dir: source_dir.to_path_buf(),
        source_depth,
    })
}

/// Backslash-escaped trailing spaces are kept (one space per escape);
/// otherwise trailing whitespace is trimmed.
fn trim_trailing_unescaped(line: &str) -> String {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(stripped) = line.strip_suffix("\\ ") {
        format!("{}{}", stripped.trim_end(), " ")
    } else {
        line.trim_end().to_string()
    }
}

/// Parse every line of an ignore file's contents into rules.
pub fn parse_rules(contents: &str, source_dir: &Path, source_depth: usize) -> Vec<IgnoreRule> {
    contents
        .lines()
        .filter_map(|line| parse_line(line, source_dir, source_depth))
        .collect()
}

/// Evaluate the accumulated rule list against one candidate path: last
/// matching rule wins, and a whitelist match always means "not excluded."
/// `inherited_excluded` is the state carried down from an ancestor
/// directory that was itself excluded but descended for a whitelisted
/// descendant; with no matching rule here, that state passes through
/// unchanged, so exclusion cascades onto a directory's contents.
pub fn is_excluded(path: &Path, is_dir: bool, rules: &[IgnoreRule], inherited_excluded: bool) -> bool {
    let mut excluded = inherited_excluded;
    for rule in rules {
        if rule.matches(path, is_dir) {
            excluded = !rule.is_whitelist;
        }
    }
    excluded
}
