// src/prune/mod.rs
//
// Remove consistently empty columns from a delimited HVU export.

pub mod anomaly;
pub mod config;
pub mod context;
pub mod mask;
pub mod split;
pub mod table;
pub mod write;

pub use anomaly::{Anomaly, AnomalyPolicy, Decision, PolicyKind};
pub use config::{PruneConfig, RangeStep, RecordRange, TraceLevel};
pub use context::{RunContext, RunSummary};
pub use mask::{prune, EmptyColumnMask};
pub use split::{Split, Splitter};
pub use table::{Row, Table};

use std::path::Path;

use chrono::Local;
use tracing::{info, instrument, warn};

use crate::error::{HvuError, Result};
use crate::text::{self, format_count};

/// Key column name and value of a row, if a key column is configured and
/// both the header and the row reach that far.
fn key_of(headers: &Row, cells: &Row, key_column: Option<usize>) -> Option<(String, String)> {
    let idx = key_column?.checked_sub(1)?;
    Some((headers.get(idx)?.clone(), cells.get(idx)?.clone()))
}

/// Parse `text` into a table, line by line.
///
/// The first line is the header and fixes the expected arity. Every other
/// line in the configured record range goes through the splitter; lines that
/// still mismatch are recorded in the returned context and handed to
/// `policy`. An `Abort` decision ends the scan with `Interrupted`.
pub fn load_table(
    text: &str,
    config: &PruneConfig,
    policy: &mut dyn AnomalyPolicy,
) -> Result<(Table, RunContext)> {
    let splitter = Splitter::new(config.delimiter, config.quoted_delimiter);
    let mut ctx = RunContext::default();
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| HvuError::EmptyInput(config.input.clone()))?;
    ctx.lines_read = 1;
    if config.trace >= TraceLevel::Lines {
        info!(line = 1, "{}", header_line);
    }
    let mut table = Table::new(splitter.split_naive(header_line));
    info!("{} columns found in header line", table.column_count());
    if config.trace >= TraceLevel::Keys {
        info!(header = header_line);
    }

    for (line_number, line) in lines {
        match config.range.step(line_number) {
            RangeStep::Stop => break,
            RangeStep::Skip => {
                ctx.lines_read = line_number;
                ctx.lines_skipped += 1;
                continue;
            }
            RangeStep::Keep => ctx.lines_read = line_number,
        }
        if config.trace >= TraceLevel::Lines {
            info!(line = line_number, "{}", line);
        }

        match splitter.split(line, table.column_count()) {
            Split::Clean(cells) | Split::Repaired(cells) => {
                if config.trace >= TraceLevel::Keys {
                    if let Some((name, value)) = key_of(&table.headers, &cells, config.key_column) {
                        info!("record {} has key {} = {}", line_number - 1, name, value);
                    }
                }
                table.rows.push(cells);
            }
            Split::Mismatch { cells, line } => {
                let anomaly = Anomaly {
                    ordinal: ctx.next_ordinal(),
                    line_number,
                    found: cells.len(),
                    expected: table.column_count(),
                    key: key_of(&table.headers, &cells, config.key_column),
                    line,
                };
                warn!(raw = %anomaly.line, "{}", anomaly);
                let decision = policy.on_anomaly(&anomaly);
                ctx.anomalies.push(anomaly);
                if decision == Decision::Abort {
                    return Err(HvuError::Interrupted { line: line_number });
                }
            }
        }
    }

    Ok((table, ctx))
}

/// Read, check, prune and write one export file.
///
/// Output is created only when every line reconciled with the header.
#[instrument(level = "info", skip(config, policy), fields(input = %config.input.display()))]
pub fn run(config: &PruneConfig, policy: &mut dyn AnomalyPolicy) -> Result<RunSummary> {
    config.validate()?;
    let delimiter = config.delimiter_byte()?;
    log_banner(config);

    let start = Local::now();
    info!("started {}", start);

    info!("reading input : {}", config.input.display());
    let text = text::read_to_string(&config.input, config.encoding)?;
    let (table, ctx) = load_table(&text, config, policy)?;
    drop(text);

    info!("processed {} lines", format_count(ctx.lines_read));
    info!(
        "total of {} lines with inadequate column count",
        ctx.anomalies.len()
    );
    if ctx.has_anomalies() {
        warn!("process terminated due to incorrect column counts");
        return Err(HvuError::ColumnCountMismatch {
            count: ctx.anomalies.len(),
        });
    }

    info!("looking for empty columns");
    let columns_in = table.column_count();
    let data_rows = table.rows.len();
    let mask = EmptyColumnMask::compute(&table);
    if config.trace >= TraceLevel::Columns {
        for (col, empty) in mask.iter().enumerate() {
            info!("column {} {} isEmpty : {}", col + 1, table.headers[col], empty);
        }
    }
    info!("found {} empty columns", mask.empty_count());

    info!("building table without empty columns");
    let pruned = mask.apply(table);

    info!("writing output : {}", config.output.display());
    write::write_table_file(&config.output, &pruned, delimiter)?;

    let end = Local::now();
    info!("ended {}", end);
    info!("duration {}", format_duration(end - start));

    Ok(RunSummary {
        lines_read: ctx.lines_read,
        data_rows,
        columns_in,
        empty_columns: mask.empty_count(),
        columns_out: pruned.column_count(),
    })
}

fn log_banner(config: &PruneConfig) {
    info!("using column delimiter : {}", config.delimiter);
    info!("using quoted column delimiter : {}", config.quoted_delimiter);
    info!("trace level : {:?}", config.trace);
    if let Some(k) = config.key_column {
        info!("looking for record key at column index : {}", k);
    }
    info!("starting treatment at record number : {}", config.range.first);
    info!("ending treatment at record number : {}", config.range.last);
}

fn format_duration(d: chrono::Duration) -> String {
    let ms = d.num_milliseconds();
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}

/// Convenience wrapper for callers holding plain paths.
pub fn run_paths<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    policy: &mut dyn AnomalyPolicy,
) -> Result<RunSummary> {
    let config = PruneConfig::new(input.as_ref(), output.as_ref());
    run(&config, policy)
}
