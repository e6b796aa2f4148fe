//! elementkv command-line tool
//!
//! Reads and writes store-backed elements kept in a local directory.
//!
//! Usage:
//!   elementkv --store-dir ./data set note-1 '{"title": "hello"}'
//!   elementkv --store-dir ./data get note-1
//!   elementkv vote alice

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use elementkv_cli::{Command, open_store, run};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "elementkv")]
#[command(about = "Read and write store-backed elements")]
struct Args {
    /// Directory holding one file per element
    #[arg(short, long, default_value = ".elementkv")]
    store_dir: PathBuf,

    /// Per-call store timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!("{:?}", args);
    let store = open_store(args.store_dir, Duration::from_millis(args.timeout_ms)).await?;
    let output = run(store, args.command).await?;
    println!("{output}");
    Ok(())
}
