//! Output line formatting: the checksum-tool-style output grammar.

use std::io::{self, Write};

/// Writes the checksum-line grammar to an arbitrary sink, honoring `--tag`
/// (BSD-style) and `--zero` (NUL-terminated records).
pub struct LineWriter<W: Write> {
    out: W,
    tag: bool,
    terminator: u8,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W, tag: bool, zero: bool) -> Self {
        Self {
            out,
            tag,
            terminator: if zero { 0u8 } else { b'\n' },
        }
    }

    fn end_record(&mut self) -> io::Result<()> {
        self.out.write_all(&[self.terminator])
    }

    /// Default: `<ISCC> *<path>`. BSD: `ISCC (<path>) = <ISCC>`.
    pub fn write_main(&mut self, iscc: &str, path: &str) -> io::Result<()> {
        if self.tag {
            write!(self.out, "ISCC ({path}) = {iscc}")?;
        } else {
            write!(self.out, "{iscc} *{path}")?;
        }
        self.end_record()
    }

    /// Indented continuation line under `--units`.
    pub fn write_unit(&mut self, iscc: &str) -> io::Result<()> {
        write!(self.out, "  {iscc}")?;
        self.end_record()
    }

    /// Indented similarity-group member line: `~<distance> <ISCC> *<path>`.
    pub fn write_similarity_member(
        &mut self,
        distance: u32,
        iscc: &str,
        path: &str,
    ) -> io::Result<()> {
        write!(self.out, "  ~{distance} {iscc} *{path}")?;
        self.end_record()
    }

    pub fn write_blank(&mut self) -> io::Result<()> {
        self.end_record()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
