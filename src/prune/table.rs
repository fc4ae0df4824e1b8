// src/prune/table.rs

/// One parsed line: ordered cell values.
pub type Row = Vec<String>;

/// A fully materialized delimited export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Column names, from the first line of the file.
    pub headers: Row,
    /// Every accepted data line, each with `headers.len()` cells.
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Row) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Header first, then data rows, in file order.
    pub fn iter_all(&self) -> impl Iterator<Item = &Row> {
        std::iter::once(&self.headers).chain(self.rows.iter())
    }
}

/// Shorthand used by tests: build a table from string literals.
#[cfg(test)]
pub fn table_of(headers: &[&str], rows: &[&[&str]]) -> Table {
    let to_row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Row>();
    Table {
        headers: to_row(headers),
        rows: rows.iter().map(|r| to_row(r)).collect(),
    }
}
