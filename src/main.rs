//! `iscc-sum`: compute or verify ISCC-SUM content identifiers.

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use iscc_sum::cli::args::Cli;
use iscc_sum::cli::format::LineWriter;
use iscc_sum::cli::generate::{self, GenerateOptions};
use iscc_sum::cli::path_expand;
use iscc_sum::cli::similarity::{self, Candidate};
use iscc_sum::cli::verify::{self, VerifyOptions};
use iscc_sum::error::{CliError, RunSummary};
use iscc_sum::utils::setup_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(false);

    if let Err(err) = cli.validate() {
        eprintln!("iscc-sum: {err}");
        return ExitCode::from(2);
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("iscc-sum: {err}");
            ExitCode::from(2)
        }
    }
}

fn open_output(cli: &Cli) -> Result<Box<dyn Write>, CliError> {
    match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::OutputPath {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    let mut summary = RunSummary::default();

    if cli.check {
        let mut out = open_output(cli)?;
        let opts = VerifyOptions {
            quiet: cli.quiet,
            status: cli.status,
            warn_unparsable: cli.warn,
            strict: cli.strict,
        };
        verify::run(&cli.paths, &opts, &mut out, &mut summary)?;
        return Ok(summary.exit_code());
    }

    let inputs = path_expand::expand(&cli.paths, cli.tree, cli.strict)?;
    let gen_opts = GenerateOptions {
        tag: cli.tag,
        zero: cli.zero,
        narrow: cli.narrow,
        units: cli.units,
    };
    let records = generate::collect(inputs, &gen_opts, &mut summary);

    let out = open_output(cli)?;
    let mut writer = LineWriter::new(out, cli.tag, cli.zero);

    if cli.similar {
        let candidates: Vec<Candidate> = records
            .iter()
            .filter_map(|r| {
                generate::decode_packed(&r.iscc).map(|packed| Candidate {
                    display: r.display.clone(),
                    packed,
                    iscc: r.iscc.clone(),
                })
            })
            .collect();
        similarity::run(&candidates, cli.threshold, &mut writer).map_err(output_err)?;
    } else {
        for record in &records {
            generate::emit(record, &mut writer).map_err(output_err)?;
        }
    }

    Ok(summary.exit_code())
}

fn output_err(source: io::Error) -> CliError {
    CliError::OutputPath {
        path: std::path::PathBuf::from("<output>"),
        source,
    }
}
