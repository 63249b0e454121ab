//! Column-aligned terminal output.
//!
//! Elastic layout for the `list` command: each column is as wide as its
//! widest cell, separated by two spaces, and columns with no content at
//! all are dropped instead of rendering as gaps.

#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the rows with aligned columns, one line per row,
    /// newline-terminated. Empty when the table has no rows.
    pub fn render(&self) -> String {
        let column_count = self.rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut widths = vec![0usize; column_count];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in &self.rows {
            let mut line = String::new();
            for (i, width) in widths.iter().enumerate() {
                if *width == 0 {
                    continue;
                }
                let cell = row.get(i).map_or("", String::as_str);
                if !line.is_empty() {
                    line.push_str("  ");
                }
                let pad = width - cell.chars().count();
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', pad));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_aligns_columns() {
        let mut table = Table::new();
        table.add_row(vec!["v1.10.0".into(), "1 Jan 2024".into(), String::new()]);
        table.add_row(vec!["v1.9.0".into(), "12 Dec 2023".into(), "retracted".into()]);

        assert_eq!(
            table.render(),
            "v1.10.0  1 Jan 2024\nv1.9.0   12 Dec 2023  retracted\n"
        );
    }

    #[test]
    fn render_drops_all_empty_columns() {
        let mut table = Table::new();
        table.add_row(vec!["v1.1.0".into(), String::new(), String::new()]);
        table.add_row(vec!["v1.0.0".into(), String::new(), String::new()]);

        assert_eq!(table.render(), "v1.1.0\nv1.0.0\n");
    }

    #[test]
    fn render_of_empty_table_is_empty() {
        assert_eq!(Table::new().render(), "");
        assert!(Table::new().is_empty());
    }

    #[test]
    fn rows_may_have_fewer_cells_than_the_widest_row() {
        let mut table = Table::new();
        table.add_row(vec!["a".into()]);
        table.add_row(vec!["bb".into(), "c".into()]);

        assert_eq!(table.render(), "a\nbb  c\n");
    }
}
