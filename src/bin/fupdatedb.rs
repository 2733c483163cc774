#![forbid(unsafe_code)]

//! fupdatedb — builds the filename index consumed by flocate.

use std::path::PathBuf;

use clap::Parser;

use flocate::indexer::{IndexerConfig, build_index_file, default_parallelism};

/// Walk a directory tree and write a basename suffix-array index.
#[derive(Debug, Parser)]
#[command(
    name = "fupdatedb",
    author,
    version,
    about = "Build a filename index for instant flocate queries"
)]
struct Cli {
    /// Root directory to index.
    #[arg(long, value_name = "DIR")]
    database_root: PathBuf,
    /// Index file to write.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
    /// Worker threads for walking and sorting. Defaults to the hardware
    /// thread count, with a floor of two.
    #[arg(long, value_name = "N")]
    threads: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    let config = IndexerConfig {
        parallelism: args.threads.unwrap_or_else(default_parallelism).max(1),
    };
    if let Err(e) = build_index_file(&args.database_root, &args.output, &config) {
        eprintln!("fupdatedb: {e}");
        std::process::exit(1);
    }
}
