//! Checksum-file parsing: the read side of the output line grammar.

/// One recognized line from a checksum file.
pub struct ParsedLine {
    pub iscc: String,
    pub path: String,
    pub is_tree: bool,
}

/// Parse one line, auto-detecting the default (`<iscc> *<path>`) and BSD
/// (`ISCC (<path>) = <iscc>`) forms. Returns `None` for blank lines,
/// `#`-comments, and anything that matches neither grammar.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }

    if let Some(rest) = line.strip_prefix("ISCC (") {
        let (path, iscc) = rest.split_once(") = ")?;
        if path.is_empty() || iscc.is_empty() {
            return None;
        }
        return Some(ParsedLine {
            iscc: iscc.to_string(),
            is_tree: path.ends_with('/'),
            path: path.to_string(),
        });
    }

    let (iscc, path) = line.split_once(" *")?;
    if iscc.is_empty() || path.is_empty() {
        return None;
    }
    Some(ParsedLine {
        iscc: iscc.to_string(),
        is_tree: path.ends_with('/'),
        path: path.to_string(),
    })
}
