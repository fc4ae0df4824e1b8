// src/stream/mod.rs
//
// HVU stream dumps: line-coded records (R), values (V), texts (E + L/D),
// keys (K) and comments (C).

pub mod convert;
pub mod line;
pub mod tally;

pub use convert::{read_records, write_delimited, write_json, write_xml, StreamRecord};
pub use line::{parse_line, FieldRef, StreamLine};
pub use tally::{FieldTally, LineCounts, SortOrder};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use clap::ValueEnum;
use tracing::{info, instrument};

use crate::error::{HvuError, Result};
use crate::text::{self, format_count, Encoding};

/// Delimiter of the delimited conversion output.
pub const CSV_DELIMITER: u8 = b'#';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StreamAction {
    /// Field counts sorted by field name.
    #[default]
    Stats,
    /// Field counts sorted by descending occurrence.
    Cstats,
    /// Convert the dump to JSON.
    ToJson,
    /// Convert the dump to `#`-delimited text.
    ToCsv,
    /// Convert the dump to XML.
    ToXml,
}

impl StreamAction {
    pub fn needs_output(self) -> bool {
        matches!(
            self,
            StreamAction::ToJson | StreamAction::ToCsv | StreamAction::ToXml
        )
    }
}

/// Run one action over a dump. Reports go to `report`; conversions are
/// written to `output`, which is required for them.
#[instrument(level = "info", skip(input, output, report), fields(input = %input.as_ref().display()))]
pub fn process_dump<P: AsRef<Path>, W: Write>(
    input: P,
    output: Option<&Path>,
    action: StreamAction,
    encoding: Encoding,
    report: W,
) -> Result<()> {
    let output = match (action.needs_output(), output) {
        (true, None) => {
            return Err(HvuError::Config(format!(
                "action {:?} needs an output file",
                action
            )))
        }
        (_, out) => out,
    };

    let text = text::read_to_string(input.as_ref(), encoding)?;
    info!("using encoding {:?}", encoding);

    match action {
        StreamAction::Stats | StreamAction::Cstats => {
            let tally = FieldTally::from_text(&text);
            let order = if action == StreamAction::Stats {
                SortOrder::ByField
            } else {
                SortOrder::ByCount
            };
            tally
                .write_report(report, order)
                .map_err(HvuError::Report)?;
        }
        StreamAction::ToJson | StreamAction::ToCsv | StreamAction::ToXml => {
            let records = read_records(&text);
            info!("{} total records", format_count(records.len()));
            if let Some(path) = output {
                let file = File::create(path).map_err(|e| HvuError::io(path, e))?;
                let mut out = BufWriter::new(file);
                match action {
                    StreamAction::ToJson => write_json(&records, &mut out)?,
                    StreamAction::ToXml => write_xml(&records, &mut out)?,
                    _ => write_delimited(&records, &mut out, CSV_DELIMITER)?,
                }
                if action != StreamAction::ToCsv {
                    writeln!(out).map_err(|e| HvuError::io(path, e))?;
                }
                out.flush().map_err(|e: io::Error| HvuError::io(path, e))?;
            }
        }
    }
    Ok(())
}
