// src/prune/write.rs

use std::{borrow::Cow, fs::File, io::Write, path::Path};

use csv::{QuoteStyle, WriterBuilder};

use super::table::Table;
use crate::error::{HvuError, Result};

/// Quoting rule of the delimited writer the exports were first produced
/// with: delimiter, quote and line breaks force quotes, and so does leading
/// whitespace or a lone `\.`. Empty cells are never quoted.
fn needs_quotes(cell: &str, delimiter: u8) -> bool {
    if cell.is_empty() {
        return false;
    }
    if cell == r"\." {
        return true;
    }
    if cell
        .bytes()
        .any(|b| b == delimiter || b == b'"' || b == b'\r' || b == b'\n')
    {
        return true;
    }
    cell.chars().next().is_some_and(char::is_whitespace)
}

fn quote_cell(cell: &str, delimiter: u8) -> Cow<'_, str> {
    if needs_quotes(cell, delimiter) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Serialize `table` (header first) with `delimiter` between cells.
///
/// A table whose columns were all pruned is written as one empty line per
/// row, so that it reads back with zero columns.
pub fn write_table<W: Write>(mut writer: W, table: &Table, delimiter: u8) -> Result<()> {
    if table.column_count() == 0 {
        for _ in table.iter_all() {
            writer.write_all(b"\n").map_err(csv::Error::from)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        return Ok(());
    }

    // cells arrive pre-quoted, the csv writer only joins and terminates
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);
    for row in table.iter_all() {
        wtr.write_record(row.iter().map(|cell| quote_cell(cell, delimiter).into_owned()))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Create `path` and write the table into it.
pub fn write_table_file<P: AsRef<Path>>(path: P, table: &Table, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| HvuError::io(path, e))?;
    write_table(file, table, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prune::table::table_of;

    fn written(table: &Table) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        write_table(&mut buf, table, b'#')?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_write_uses_delimiter_and_quotes_when_needed() -> anyhow::Result<()> {
        let table = table_of(
            &["ID", "TEXT"],
            &[&["1", "plain"], &["2", r##""B$C""##], &["3", "a#b"]],
        );
        assert_eq!(
            written(&table)?,
            "ID#TEXT\n1#plain\n2#\"\"\"B$C\"\"\"\n3#\"a#b\"\n"
        );
        Ok(())
    }

    #[test]
    fn test_leading_whitespace_is_quoted() -> anyhow::Result<()> {
        let table = table_of(&["K", "V"], &[&[" k1 ", "x "], &["\tk2", ""], &[r"\.", "a,b"]]);
        assert_eq!(
            written(&table)?,
            "K#V\n\" k1 \"#x \n\"\tk2\"#\n\"\\.\"#a,b\n"
        );
        Ok(())
    }

    #[test]
    fn test_zero_column_table_writes_empty_lines() -> anyhow::Result<()> {
        let header_only = table_of(&[], &[]);
        assert_eq!(written(&header_only)?, "\n");

        let with_rows = table_of(&[], &[&[], &[]]);
        assert_eq!(written(&with_rows)?, "\n\n\n");
        Ok(())
    }
}
