// src/prune/mask.rs

use tracing::debug;

use super::table::{Row, Table};

/// A cell counts as blank when only spaces surround nothing.
fn is_blank(cell: &str) -> bool {
    cell.trim_matches(' ').is_empty()
}

/// One flag per column index: true when every data cell in it is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyColumnMask(Vec<bool>);

impl EmptyColumnMask {
    /// Scan the data rows of `table`. The header is never inspected, so a
    /// table without data rows marks every column empty.
    pub fn compute(table: &Table) -> Self {
        let flags = (0..table.column_count())
            .map(|col| {
                table
                    .rows
                    .iter()
                    .all(|row| row.get(col).map_or(true, |cell| is_blank(cell)))
            })
            .collect();
        Self(flags)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_column_empty(&self, col: usize) -> bool {
        self.0.get(col).copied().unwrap_or(false)
    }

    pub fn empty_count(&self) -> usize {
        self.0.iter().filter(|&&empty| empty).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Drop the masked cells of one row, keeping order and values.
    fn keep(&self, row: Row) -> Row {
        row.into_iter()
            .enumerate()
            .filter(|(col, _)| !self.is_column_empty(*col))
            .map(|(_, cell)| cell)
            .collect()
    }

    /// Build the reduced table. Consumes the original.
    pub fn apply(&self, table: Table) -> Table {
        let Table { headers, rows } = table;
        Table {
            headers: self.keep(headers),
            rows: rows.into_iter().map(|row| self.keep(row)).collect(),
        }
    }
}

/// Remove every column whose data cells are all blank.
pub fn prune(table: Table) -> (Table, EmptyColumnMask) {
    let mask = EmptyColumnMask::compute(&table);
    debug!(
        columns = mask.len(),
        empty = mask.empty_count(),
        "computed empty column mask"
    );
    (mask.apply(table), mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prune::table::table_of;

    #[test]
    fn test_blank_columns_are_removed() {
        let table = table_of(&["A", "B", "C"], &[&[" ", "x", ""], &["", "y", ""]]);
        let (pruned, mask) = prune(table);

        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![true, false, true]);
        assert_eq!(mask.empty_count(), 2);
        assert_eq!(pruned, table_of(&["B"], &[&["x"], &["y"]]));
    }

    #[test]
    fn test_header_only_table_prunes_to_zero_columns() {
        let table = table_of(&["A", "B"], &[]);
        let (pruned, mask) = prune(table);

        assert_eq!(mask.empty_count(), 2);
        assert!(pruned.headers.is_empty());
        assert!(pruned.rows.is_empty());
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let table = table_of(
            &["A", "B", "C", "D"],
            &[&["1", " ", "", "4"], &["", "", " ", "d"]],
        );
        let (once, _) = prune(table);
        let (twice, mask) = prune(once.clone());

        assert_eq!(mask.empty_count(), 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_order_and_values_preserved() {
        let table = table_of(
            &["K", "E1", "V", "E2", "W"],
            &[&[" k1 ", "", "v1", " ", "  w"], &["k2", "  ", "", "", "w2"]],
        );
        let (pruned, _) = prune(table);

        assert_eq!(pruned.headers, vec!["K", "V", "W"]);
        // retained cells are never trimmed
        assert_eq!(pruned.rows[0], vec![" k1 ", "v1", "  w"]);
        assert_eq!(pruned.rows[1], vec!["k2", "", "w2"]);
    }

    #[test]
    fn test_only_spaces_count_as_blank() {
        let table = table_of(&["A", "B"], &[&["\t", " "]]);
        let mask = EmptyColumnMask::compute(&table);
        assert!(!mask.is_column_empty(0));
        assert!(mask.is_column_empty(1));
    }
}
