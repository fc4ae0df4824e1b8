// src/text.rs

use std::{fs, path::Path};

use clap::ValueEnum;

use crate::error::{HvuError, Result};

/// Character encoding of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Encoding {
    /// UTF-8; invalid sequences are replaced.
    #[default]
    Utf8,
    /// ISO-8859-1, as written by Windows hosts.
    Latin1,
}

/// Decode raw bytes into text.
pub fn decode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        // every Latin-1 byte maps onto the code point with the same value
        Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Read a whole file into memory and decode it.
pub fn read_to_string<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| HvuError::io(path, e))?;
    Ok(decode(&bytes, encoding))
}

/// Render a count with `'` as thousands separator, e.g. `1'234'567`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\'');
        }
        out.push(ch);
    }
    out
}
