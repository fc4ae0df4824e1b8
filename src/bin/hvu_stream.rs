//! hvu_stream.rs
//!
//! Read an HVU stream dump and either list how often every RECORD.FIELD
//! occurs (to find out which fields a table really uses) or convert the
//! dump to JSON, XML or `#`-delimited text.

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use hvutools::{
    logging,
    stream::{self, StreamAction},
    text::Encoding,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hvu_stream")]
#[command(about = "Field statistics and conversion for HVU stream dumps")]
struct Args {
    /// HVU stream dump
    #[arg(short, long = "in")]
    input: PathBuf,

    /// Output file, required for conversions
    #[arg(short, long = "out")]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = StreamAction::Stats)]
    action: StreamAction,

    /// Dumps mostly come from Windows hosts, hence Latin-1
    #[arg(short, long, value_enum, default_value_t = Encoding::Latin1)]
    encoding: Encoding,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();

    let start = Local::now();
    info!("started {}", start);

    stream::process_dump(
        &args.input,
        args.output.as_deref(),
        args.action,
        args.encoding,
        io::stdout().lock(),
    )
    .with_context(|| format!("processing {}", args.input.display()))?;

    let end = Local::now();
    info!(elapsed_ms = (end - start).num_milliseconds(), "ended {}", end);
    Ok(())
}
