//! Command line front end for front coding text lines.
//!
//! ```bash
//! # encode a sorted file list, one path per line
//! find . | sort | frenc > paths.fc
//!
//! # NUL-separated input, size hint patched into the output file
//! find . -print0 | sort -z | frenc -z --size-hint -o paths.fc
//!
//! # decode back to lines
//! frenc -d paths.fc
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use frenc::front_coding::stream::push_lines;
use frenc::{decode_lines, encode_lines, Delimiter, Framing, FrencResult, StreamEncoder};
use log::LevelFilter;

/// Front code a list of lines, or decode a front coded blob back to lines
#[derive(Parser, Debug)]
#[command(name = "frenc", version)]
struct Args {
    /// Decode instead of encode
    #[arg(short, long)]
    decode: bool,

    /// Lines are separated by NUL instead of newline
    #[arg(short = 'z', long)]
    zero_terminated: bool,

    /// Read and write blobs with a size hint header
    #[arg(long)]
    size_hint: bool,

    /// Write to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file; `-` or nothing reads standard input
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(0) => {
            eprintln!("frenc: empty input");
            ExitCode::FAILURE
        }
        Ok(lines) => {
            log::info!("processed {lines} lines");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("frenc: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_default_env();
    let _ = builder.try_init();
}

fn open_input(file: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match file {
        Some(path) if path != Path::new("-") => Ok(Box::new(BufReader::new(File::open(path)?))),
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn run(args: &Args) -> FrencResult<usize> {
    let framing = if args.size_hint {
        Framing::SizeHinted
    } else {
        Framing::Bare
    };
    let delimiter = if args.zero_terminated {
        Delimiter::Nul
    } else {
        Delimiter::Newline
    };
    let input = open_input(args.file.as_deref())?;

    match (&args.output, args.decode) {
        (Some(path), true) => {
            let output = BufWriter::new(File::create(path)?);
            decode_lines(input, output, delimiter, framing)
        }
        (None, true) => decode_lines(input, stdout(), delimiter, framing),
        (Some(path), false) => {
            // a seekable output gets its size hint filled in afterwards
            let output = BufWriter::new(File::create(path)?);
            let mut encoder = StreamEncoder::with_framing(output, framing);
            let lines = push_lines(input, &mut encoder, delimiter)?;
            encoder.finish_with_hint()?;
            Ok(lines)
        }
        (None, false) => encode_lines(input, stdout(), delimiter, framing),
    }
}

fn stdout() -> impl Write {
    BufWriter::new(io::stdout().lock())
}
