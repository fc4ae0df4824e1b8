// src/prune/config.rs

use std::path::PathBuf;

use crate::error::{HvuError, Result};
use crate::text::Encoding;

/// How much the run reports while reading. Levels are cumulative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TraceLevel {
    #[default]
    Silent,
    /// Header line and the key of every processed record.
    Keys,
    /// Emptiness verdict of every column.
    Columns,
    /// Every raw line as read.
    Lines,
}

impl From<u8> for TraceLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => TraceLevel::Silent,
            1 => TraceLevel::Keys,
            2 => TraceLevel::Columns,
            _ => TraceLevel::Lines,
        }
    }
}

/// What to do with a physical line given the configured record range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStep {
    Keep,
    Skip,
    Stop,
}

/// Inclusive, 1-based range of data records; 0 leaves a side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordRange {
    pub first: usize,
    pub last: usize,
}

impl RecordRange {
    /// Physical line `n` holds data record `n - 1`; line 1 is the header
    /// and is always kept.
    pub fn step(&self, line_number: usize) -> RangeStep {
        if line_number <= 1 {
            return RangeStep::Keep;
        }
        let record = line_number - 1;
        if self.last != 0 && record > self.last {
            RangeStep::Stop
        } else if self.first != 0 && record < self.first {
            RangeStep::Skip
        } else {
            RangeStep::Keep
        }
    }
}

#[derive(Debug, Clone)]
pub struct PruneConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// 1-based index of the column holding the record key, for diagnostics.
    pub key_column: Option<usize>,
    pub trace: TraceLevel,
    pub range: RecordRange,
    pub delimiter: char,
    pub quoted_delimiter: char,
    pub encoding: Encoding,
}

impl PruneConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            key_column: None,
            trace: TraceLevel::Silent,
            range: RecordRange::default(),
            delimiter: '#',
            quoted_delimiter: '$',
            encoding: Encoding::Utf8,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return Err(HvuError::Config(
                "both input and output paths are required".into(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(HvuError::Config(format!(
                "column delimiter {:?} must be a single ASCII character",
                self.delimiter
            )));
        }
        for ch in [self.delimiter, self.quoted_delimiter] {
            if ch == '"' || ch == '\n' || ch == '\r' {
                return Err(HvuError::Config(format!(
                    "{:?} cannot be used as a delimiter",
                    ch
                )));
            }
        }
        if self.delimiter == self.quoted_delimiter {
            return Err(HvuError::Config(format!(
                "column delimiter and quoted column delimiter are both {:?}",
                self.delimiter
            )));
        }
        if self.range.last != 0 && self.range.first > self.range.last {
            return Err(HvuError::Config(format!(
                "first record {} is after last record {}",
                self.range.first, self.range.last
            )));
        }
        Ok(())
    }

    /// The delimiter as the single byte the output writer expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| HvuError::Config(format!("non-ASCII delimiter {:?}", self.delimiter)))
    }
}
