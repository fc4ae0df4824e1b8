// src/stream/tally.rs

use std::{collections::BTreeMap, io::Write};

use tracing::{debug, info, warn};

use super::line::{parse_line, StreamLine};
use crate::text::format_count;

/// A progress event is logged every this many lines.
const PROGRESS_EVERY: usize = 500_000;

/// How the per-field report is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending `RECORD.FIELD`.
    ByField,
    /// Descending occurrence count, ties by field.
    ByCount,
}

/// Number of lines seen per line code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub records: usize,
    pub values: usize,
    pub keys: usize,
    pub texts: usize,
    pub text_lines: usize,
    pub data_lines: usize,
    pub comments: usize,
    pub short: usize,
    pub undefined: usize,
}

/// Occurrences of every `RECORD.FIELD` referenced by V and E lines.
#[derive(Debug, Default)]
pub struct FieldTally {
    pub lines: LineCounts,
    pub total_lines: usize,
    counts: BTreeMap<String, usize>,
    record_name: String,
}

impl FieldTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally every line of a dump.
    pub fn from_text(text: &str) -> Self {
        let mut tally = Self::new();
        for line in text.lines() {
            tally.add_line(line);
        }
        tally
    }

    fn bump(&mut self, field: &str) {
        let key = format!("{}.{}", self.record_name, field);
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn add_line(&mut self, line: &str) {
        self.total_lines += 1;
        let line_number = self.total_lines;
        if line_number % PROGRESS_EVERY == 0 {
            debug!("{} lines", format_count(line_number));
        }

        match parse_line(line) {
            StreamLine::Short => {
                self.lines.short += 1;
                warn!("unexpected short line at line {}", format_count(line_number));
            }
            StreamLine::Record { name } => {
                self.lines.records += 1;
                self.record_name = name.to_string();
            }
            StreamLine::Value { field, .. } => {
                self.lines.values += 1;
                self.bump(field.name);
            }
            StreamLine::Text { field } => {
                self.lines.texts += 1;
                self.bump(field.name);
            }
            StreamLine::Key(key) => {
                self.lines.keys += 1;
                info!(record = %self.record_name, "key {}", key);
            }
            StreamLine::TextLine(_) => self.lines.text_lines += 1,
            StreamLine::DataLine(_) => self.lines.data_lines += 1,
            StreamLine::Comment(_) => self.lines.comments += 1,
            StreamLine::Unknown(raw) => {
                self.lines.undefined += 1;
                warn!(
                    "unexpected line code at line {} : {}",
                    format_count(line_number),
                    raw
                );
            }
        }
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn distinct_fields(&self) -> usize {
        self.counts.len()
    }

    /// `(RECORD.FIELD, occurrences)` in the requested order.
    pub fn sorted(&self, order: SortOrder) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, &n)| (k.as_str(), n)).collect();
        if order == SortOrder::ByCount {
            // already sorted by key, so a stable sort keeps ties in key order
            entries.sort_by(|a, b| b.1.cmp(&a.1));
        }
        entries
    }

    /// Print the line summary and the per-field counts.
    pub fn write_report<W: Write>(&self, mut out: W, order: SortOrder) -> std::io::Result<()> {
        let l = &self.lines;
        writeln!(out, "total of {} lines in file", format_count(self.total_lines))?;
        writeln!(
            out,
            "{} RECORD, {} V FIELD, {} K FIELD, {} E FIELD lines found",
            format_count(l.records),
            format_count(l.values),
            format_count(l.keys),
            format_count(l.texts)
        )?;
        writeln!(
            out,
            "{} L, {} D, {} C, {} short, {} undefined lines found",
            format_count(l.text_lines),
            format_count(l.data_lines),
            format_count(l.comments),
            format_count(l.short),
            format_count(l.undefined)
        )?;
        let title = match order {
            SortOrder::ByField => "field counts by field name",
            SortOrder::ByCount => "field counts by descending occurrence count",
        };
        writeln!(out, "***** {} *****", title)?;
        for (key, n) in self.sorted(order) {
            writeln!(out, "{} occurs {} times", key, format_count(n))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
R  EMPLOYEE                            <<< record # 1 >>>
K  0001
V  NAME(1)=SMITH
V  COMM(1)=400.00
V  COMM(2)=10.00
E  DISPLAY_TI(1)
L70La monnaie et
D  la suite
R  EMPLOYEE                            <<< record # 2 >>>
V  NAME(1)=JONES
C  comment
x
??? what
R  DEPT                                <<< record # 3 >>>
V  NAME(1)=SALES
";

    #[test]
    fn test_counts_fields_per_record() {
        let tally = FieldTally::from_text(DUMP);

        assert_eq!(tally.total_lines, 15);
        assert_eq!(tally.count("EMPLOYEE.NAME"), 2);
        assert_eq!(tally.count("EMPLOYEE.COMM"), 2);
        assert_eq!(tally.count("EMPLOYEE.DISPLAY_TI"), 1);
        assert_eq!(tally.count("DEPT.NAME"), 1);
        assert_eq!(tally.distinct_fields(), 4);

        assert_eq!(
            tally.lines,
            LineCounts {
                records: 3,
                values: 5,
                keys: 1,
                texts: 1,
                text_lines: 1,
                data_lines: 1,
                comments: 1,
                short: 1,
                undefined: 1,
            }
        );
    }

    #[test]
    fn test_sort_orders() {
        let tally = FieldTally::from_text(DUMP);
        let by_field: Vec<&str> = tally
            .sorted(SortOrder::ByField)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            by_field,
            vec![
                "DEPT.NAME",
                "EMPLOYEE.COMM",
                "EMPLOYEE.DISPLAY_TI",
                "EMPLOYEE.NAME"
            ]
        );

        let by_count = tally.sorted(SortOrder::ByCount);
        assert_eq!(
            by_count,
            vec![
                ("EMPLOYEE.COMM", 2),
                ("EMPLOYEE.NAME", 2),
                ("DEPT.NAME", 1),
                ("EMPLOYEE.DISPLAY_TI", 1),
            ]
        );
    }

    #[test]
    fn test_report_layout() -> anyhow::Result<()> {
        let tally = FieldTally::from_text(DUMP);
        let mut buf = Vec::new();
        tally.write_report(&mut buf, SortOrder::ByCount)?;
        let report = String::from_utf8(buf)?;

        assert!(report.starts_with("total of 15 lines in file\n"));
        assert!(report.contains("3 RECORD, 5 V FIELD, 1 K FIELD, 1 E FIELD lines found"));
        assert!(report.contains("EMPLOYEE.COMM occurs 2 times\nEMPLOYEE.NAME occurs 2 times\n"));
        Ok(())
    }
}
