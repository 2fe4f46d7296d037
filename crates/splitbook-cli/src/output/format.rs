use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Renders a header row plus data rows at each column's natural width.
/// Widths count characters, not display cells, so CJK names may render
/// slightly ragged in a terminal. Values are never truncated.
pub fn render_table(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let widths = natural_column_widths(columns, rows);

    let mut output = Vec::with_capacity(rows.len() + 1);
    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    output.push(format_row(columns, &header, &widths));

    for row in rows {
        output.push(format_row(columns, row, &widths));
    }

    output
}

pub fn format_money(value: f64) -> String {
    format!("{value:.2}")
}

fn natural_column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();

    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, value.chars().count());
            }
        }
    }

    widths
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let mut pieces = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let width = *widths.get(index).unwrap_or(&0);
        let value = cells.get(index).cloned().unwrap_or_default();
        let pad = width.saturating_sub(value.chars().count());

        let piece = match column.align {
            Align::Left => format!("{value}{}", " ".repeat(pad)),
            Align::Right => format!("{}{value}", " ".repeat(pad)),
        };
        pieces.push(piece);
    }

    let line = format!(
        "{}{}",
        " ".repeat(INDENT),
        pieces.join(&" ".repeat(COLUMN_GAP))
    );
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::{Align, Column, format_money, key_value_rows, render_table};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Payees:", "3".to_string()),
                ("Gross amount:", "300.00".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Payees:        3");
        assert_eq!(rows[1], "  Gross amount:  300.00");
    }

    #[test]
    fn table_pads_columns_to_natural_width() {
        let columns = [
            Column {
                name: "Name",
                align: Align::Left,
            },
            Column {
                name: "Total",
                align: Align::Right,
            },
        ];
        let rows = vec![
            vec!["张三".to_string(), "80.00".to_string()],
            vec!["a much longer name".to_string(), "3.00".to_string()],
        ];

        let rendered = render_table(&columns, &rows);
        assert_eq!(rendered[0], "  Name                Total");
        assert_eq!(rendered[1], "  张三                  80.00");
        assert_eq!(rendered[2], "  a much longer name   3.00");
    }

    #[test]
    fn table_counts_characters_not_bytes() {
        let columns = [Column {
            name: "Name",
            align: Align::Left,
        }];
        let rows = vec![vec!["张三".to_string()]];

        let rendered = render_table(&columns, &rows);
        assert_eq!(rendered[1], "  张三");
    }

    #[test]
    fn money_renders_with_two_decimals() {
        assert_eq!(format_money(80.0), "80.00");
        assert_eq!(format_money(-4.0), "-4.00");
        assert_eq!(format_money(16.666), "16.67");
    }
}
