//! Path argument expansion.

use std::path::PathBuf;

use crate::error::CliError;
use crate::treewalk::treewalk_iscc;

/// One resolved unit of work for the generation/similarity flows.
pub enum Input {
    /// No PATH arguments were given; read one stream from standard input,
    /// displayed under the fixed name `-`.
    Stdin,
    /// A single file, hashed on its own.
    File(PathBuf),
    /// A directory traversed as one logical object (`--tree`): every file's
    /// bytes, in deterministic treewalk order, feed a single processor.
    Tree { root: PathBuf, files: Vec<PathBuf> },
}

/// Expand `paths`: each argument is a file (kept as-is) or a directory
/// (expanded via Treewalk-ISCC); argument order is preserved. `--tree` is
/// only reachable with exactly one directory argument; `Cli::validate`
/// enforces that before this is called.
pub fn expand(paths: &[PathBuf], tree: bool, strict: bool) -> Result<Vec<Input>, CliError> {
    if paths.is_empty() {
        return Ok(vec![Input::Stdin]);
    }

    if tree {
        let root = paths[0].clone();
        let report = treewalk_iscc(&root, strict)?;
        return Ok(vec![Input::Tree {
            root,
            files: report.files,
        }]);
    }

    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        if path.is_dir() {
            let report = treewalk_iscc(path, strict)?;
            inputs.extend(report.files.into_iter().map(Input::File));
        } else {
            inputs.push(Input::File(path.clone()));
        }
    }
    Ok(inputs)
}
