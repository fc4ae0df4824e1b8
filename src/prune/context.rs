// src/prune/context.rs

use super::anomaly::Anomaly;

/// Counters and findings of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Physical lines examined, header included.
    pub lines_read: usize,
    /// Data lines skipped because they precede the first requested record.
    pub lines_skipped: usize,
    pub anomalies: Vec<Anomaly>,
}

impl RunContext {
    pub fn next_ordinal(&self) -> usize {
        self.anomalies.len() + 1
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// What a successful run reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: usize,
    pub data_rows: usize,
    pub columns_in: usize,
    pub empty_columns: usize,
    pub columns_out: usize,
}
