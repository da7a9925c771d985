//! Generation flow: hash each input and produce one record per success.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use data_encoding::BASE32_NOPAD;
use log::warn;
use rayon::prelude::*;

use super::format::LineWriter;
use super::path_expand::Input;
use crate::error::RunSummary;
use crate::iscc::IsccSumProcessor;

/// Read chunk size: a performance knob, not a correctness boundary.
const READ_CHUNK_SIZE: usize = 2 * 1024 * 1024;

pub struct GenerateOptions {
    pub tag: bool,
    pub zero: bool,
    pub narrow: bool,
    pub units: bool,
}

/// One successfully generated record.
pub struct Generated {
    pub display: String,
    pub iscc: String,
    pub units: Option<(String, String)>,
}

/// Process each input, collecting a record for every success. Inputs are
/// hashed in parallel with `rayon`; `par_iter` preserves input order in the
/// returned `Vec`, so output order is unaffected by which input finishes
/// hashing first. I/O failures are reported to standard error and
/// escalate to a fatal (exit 2) run; no line is emitted for a failed
/// input.
pub fn collect(inputs: Vec<Input>, opts: &GenerateOptions, summary: &mut RunSummary) -> Vec<Generated> {
    let outcomes: Vec<_> = inputs.par_iter().map(|input| process_one(input, opts)).collect();

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(Some((display, iscc, units))) => results.push(Generated { display, iscc, units }),
            Ok(None) => {}
            Err(err) => {
                warn!("{}: {}", err.display, err.source);
                summary.mark_fatal();
            }
        }
    }
    results
}

/// Emit one record via `writer`.
pub fn emit<W: Write>(record: &Generated, writer: &mut LineWriter<W>) -> io::Result<()> {
    writer.write_main(&record.iscc, &record.display)?;
    if let Some((data_unit, instance_unit)) = &record.units {
        writer.write_unit(data_unit)?;
        writer.write_unit(instance_unit)?;
    }
    Ok(())
}

/// Decode the packed header+body bytes out of a rendered `"ISCC:..."`
/// string, for `--similar` to extract Data-Code bits from.
pub fn decode_packed(iscc_text: &str) -> Option<Vec<u8>> {
    BASE32_NOPAD
        .decode(iscc_text.strip_prefix("ISCC:")?.as_bytes())
        .ok()
}

struct ProcessError {
    display: String,
    source: io::Error,
}

fn process_one(
    input: &Input,
    opts: &GenerateOptions,
) -> Result<Option<(String, String, Option<(String, String)>)>, ProcessError> {
    let (display, mut reader): (String, Box<dyn Read>) = match input {
        Input::Stdin => ("-".to_string(), Box::new(io::stdin())),
        Input::File(path) => {
            let file = File::open(path).map_err(|source| ProcessError {
                display: path.display().to_string(),
                source,
            })?;
            (display_path(path), Box::new(file))
        }
        Input::Tree { root, files } => {
            let readers = files
                .iter()
                .map(|p| {
                    File::open(p).map_err(|source| ProcessError {
                        display: p.display().to_string(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut processor = IsccSumProcessor::new();
            let mut buf = vec![0u8; READ_CHUNK_SIZE];
            for mut file in readers {
                stream_into(&mut file, &mut processor, &mut buf).map_err(|source| {
                    ProcessError {
                        display: format!("{}/", root.display()),
                        source,
                    }
                })?;
            }
            let result = processor.result(!opts.narrow, opts.units);
            return Ok(Some((
                format!("{}/", display_path(root)),
                result.iscc,
                result.units,
            )));
        }
    };

    let mut processor = IsccSumProcessor::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    stream_into(&mut reader, &mut processor, &mut buf).map_err(|source| ProcessError {
        display: display.clone(),
        source,
    })?;
    let result = processor.result(!opts.narrow, opts.units);
    Ok(Some((display, result.iscc, result.units)))
}

fn stream_into(
    reader: &mut dyn Read,
    processor: &mut IsccSumProcessor,
    buf: &mut [u8],
) -> io::Result<()> {
    loop {
        let n = reader.read(buf)?;
        if n == 0 {
            break;
        }
        processor.update(&buf[..n]);
    }
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
