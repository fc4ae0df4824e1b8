//! remove_empty_columns.rs
//!
//! Remove empty columns from a delimited file exported by HVU.
//!
//! HVU quotes subfields (`...#"subfield";subfield;...#...`) and doubles
//! quotes inside them, which general CSV readers do not cope with. When a
//! data line has more cells than the header, the surplus is a column
//! delimiter inside a quoted span; such delimiters are replaced by the
//! quoted column delimiter before the line is split again.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hvutools::{
    logging,
    prune::{self, PolicyKind, PruneConfig, RecordRange},
    text::Encoding,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "remove_empty_columns")]
#[command(about = "Remove empty columns from a delimited HVU export")]
struct Args {
    /// Input file
    #[arg(long)]
    input: PathBuf,

    /// Output file, written only when every line is consistent
    #[arg(long)]
    output: PathBuf,

    /// Key column index (1 is the first column, 0 for none), used in diagnostics
    #[arg(long, default_value_t = 0)]
    key_col_idx: usize,

    /// Trace level: 0 silent, 1 record keys, 2 column emptiness, 3 raw lines
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    trace: u8,

    /// First data record to treat (1-based, 0 from the start)
    #[arg(long, default_value_t = 0)]
    first_rec: usize,

    /// Last data record to treat (1-based, 0 to the end)
    #[arg(long, default_value_t = 0)]
    last_rec: usize,

    /// Column delimiter
    #[arg(long, default_value_t = '#')]
    col_delim: char,

    /// Replacement for a column delimiter found inside quotes
    #[arg(long, default_value_t = '$')]
    quoted_col_delim: char,

    /// Input encoding
    #[arg(long, value_enum, default_value_t = Encoding::Utf8)]
    encoding: Encoding,

    /// On an inconsistent line: prompt, continue, abort or abort-after=N
    #[arg(long, default_value = "prompt")]
    on_anomaly: PolicyKind,
}

impl Args {
    fn into_config(self) -> (PruneConfig, PolicyKind) {
        let mut cfg = PruneConfig::new(self.input, self.output);
        cfg.key_column = (self.key_col_idx != 0).then_some(self.key_col_idx);
        cfg.trace = self.trace.into();
        cfg.range = RecordRange {
            first: self.first_rec,
            last: self.last_rec,
        };
        cfg.delimiter = self.col_delim;
        cfg.quoted_delimiter = self.quoted_col_delim;
        cfg.encoding = self.encoding;
        (cfg, self.on_anomaly)
    }
}

fn main() -> Result<()> {
    logging::init("info");
    let (cfg, policy) = Args::parse().into_config();

    info!("removeEmptyColumns v.{}", env!("CARGO_PKG_VERSION"));
    let mut policy = policy.build();
    let summary = prune::run(&cfg, policy.as_mut())
        .with_context(|| format!("removing empty columns from {}", cfg.input.display()))?;

    println!(
        "{} data rows, {} of {} columns removed, {} columns written to {}",
        summary.data_rows,
        summary.empty_columns,
        summary.columns_in,
        summary.columns_out,
        cfg.output.display()
    );
    println!("process terminated successfully !");
    Ok(())
}
