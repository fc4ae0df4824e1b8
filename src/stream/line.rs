// src/stream/line.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// `NAME(occ)` at the start of a V/E payload; occurrence is optional.
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^(=]*)(?:\((\d+)\))?").expect("field designator pattern is valid")
});

/// Payload starts after the one-letter code and two filler characters.
const PAYLOAD_OFFSET: usize = 3;
/// Record names occupy columns 3..32 of an `R` line.
const RECORD_NAME_END: usize = 32;

/// A field designator such as `COMM(1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub name: &'a str,
    pub occurrence: u32,
}

/// One classified line of an HVU stream dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine<'a> {
    /// Fewer than three characters.
    Short,
    /// `R  EMPLOYEE      <<< record # 2 >>>`
    Record { name: &'a str },
    /// `V  COMM(1)=400.00`
    Value { field: FieldRef<'a>, value: &'a str },
    /// `K  keyValue`
    Key(&'a str),
    /// `E  DISPLAY_TI(1)`, text follows on L/D lines.
    Text { field: FieldRef<'a> },
    /// `L70La monnaie et...`
    TextLine(&'a str),
    /// `D  La monnaie et...`
    DataLine(&'a str),
    /// `C...`
    Comment(&'a str),
    /// Anything else, usually text broken by a stray line break.
    Unknown(&'a str),
}

/// Slice `line` between two character positions, clamped to its length.
fn char_slice(line: &str, start: usize, end: usize) -> &str {
    let byte_at = |pos: usize| {
        line.char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    };
    let (s, e) = (byte_at(start), byte_at(end));
    &line[s..e.max(s)]
}

fn payload(line: &str) -> &str {
    char_slice(line, PAYLOAD_OFFSET, usize::MAX)
}

fn parse_field(payload: &str) -> FieldRef<'_> {
    match FIELD_RE.captures(payload) {
        Some(caps) => FieldRef {
            name: caps.get(1).map_or("", |m| m.as_str()),
            occurrence: caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(1),
        },
        None => FieldRef {
            name: payload,
            occurrence: 1,
        },
    }
}

/// Classify one line. Trailing whitespace is ignored.
pub fn parse_line(raw: &str) -> StreamLine<'_> {
    if raw.chars().count() < PAYLOAD_OFFSET {
        return StreamLine::Short;
    }
    let line = raw.trim_end();
    let body = payload(line);
    match line.chars().next() {
        Some('R') => StreamLine::Record {
            name: char_slice(line, PAYLOAD_OFFSET, RECORD_NAME_END).trim(),
        },
        Some('V') => StreamLine::Value {
            field: parse_field(body),
            value: body.split_once('=').map_or("", |(_, v)| v),
        },
        Some('E') => StreamLine::Text {
            field: parse_field(body),
        },
        Some('K') => StreamLine::Key(body),
        Some('L') => StreamLine::TextLine(body),
        Some('D') => StreamLine::DataLine(body),
        Some('C') => StreamLine::Comment(body),
        _ => StreamLine::Unknown(line),
    }
}
