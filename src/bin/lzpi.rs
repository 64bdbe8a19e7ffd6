use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use std::process;

use clap::{error::ErrorKind, Arg, ArgAction, Command};

use lzpi::{errors::LzpiError, Decoder, Encoder};

fn main() {
    let parse = Command::new("lzpi")
        .about("Compress (default) or decompress an lzpi stream from stdin to stdout")
        .arg(
            Arg::new("decompress")
                .short('d')
                .long("decompress")
                .action(ArgAction::SetTrue)
                .help("Decompress stdin instead of compressing it"),
        )
        .try_get_matches();

    let matches = match parse {
        Ok(m) => m,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // usage problems go to stderr and exit 1
            let _ = err.print();
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let rdr = BufReader::new(stdin.lock());
    let wtr = BufWriter::new(stdout.lock());

    let result = if matches.get_flag("decompress") {
        Decoder::for_reader(rdr).decode_to_writer(wtr)
    } else {
        Encoder::for_reader(rdr).encode_to_writer(wtr)
    };

    if let Err(err) = result {
        eprintln!("{}: {}", progname(), err);
        process::exit(exit_code(&err));
    }
}

/// Basename of the invoked executable, for diagnostics.
fn progname() -> String {
    std::env::args()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Exit with the platform error number where the failure carries one;
/// otherwise report a generic I/O failure.
fn exit_code(err: &LzpiError) -> i32 {
    match err {
        LzpiError::Io(e) => e.raw_os_error().unwrap_or(libc::EIO),
        _ => libc::EIO,
    }
}
