#![forbid(unsafe_code)]

//! flocate — prints every indexed path whose basename contains a pattern.

use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use flocate::core::errors::{FlocateError, Result};
use flocate::core::paths::os_bytes;
use flocate::locator::query::Locator;

/// Search an index built by fupdatedb for basenames containing PATTERN.
#[derive(Debug, Parser)]
#[command(
    name = "flocate",
    author,
    version,
    about = "Instant filename substring search over a prebuilt index"
)]
struct Cli {
    /// Byte substring to look for in basenames. An empty pattern lists
    /// every indexed entry that still exists.
    #[arg(value_name = "PATTERN", allow_hyphen_values = true)]
    pattern: OsString,
    /// Index file produced by fupdatedb.
    #[arg(long, value_name = "FILE")]
    database: PathBuf,
}

fn run(args: &Cli) -> Result<()> {
    let locator = Locator::open(&args.database)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    locator
        .print_matches(&os_bytes(&args.pattern), &mut out)
        .and_then(|()| out.flush())
        .map_err(|e| FlocateError::io("<stdout>", e))
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    if let Err(e) = run(&args) {
        eprintln!("flocate: {e}");
        std::process::exit(1);
    }
}
