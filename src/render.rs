//! Plain-text rendering of a wide table for terminal output.

use crate::table::WideTable;

const TIME_COLUMN: &str = "time";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const MISSING: &str = "-";

/// Renders the table as fixed-width columns, one row per timestamp. Missing
/// readings render as `-`. An empty table renders as a single notice line.
pub fn render_table(table: &WideTable) -> String {
    if table.is_empty() {
        return "(no data)\n".to_string();
    }

    let mut header: Vec<String> = vec![TIME_COLUMN.to_string()];
    header.extend(table.columns().iter().map(|c| c.label.clone()));

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.num_rows());
    for (row, timestamp) in table.timestamps().iter().enumerate() {
        let mut cells = vec![timestamp.format(TIME_FORMAT).to_string()];
        cells.extend(table.columns().iter().map(|c| match c.values[row] {
            Some(value) => format!("{value}"),
            None => MISSING.to_string(),
        }));
        rows.push(cells);
    }

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(col, title)| {
            rows.iter()
                .map(|cells| cells[col].len())
                .chain([title.len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    render_row(&mut out, &header, &widths);
    for cells in &rows {
        render_row(&mut out, cells, &widths);
    }
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (col, cell) in cells.iter().enumerate() {
        if col > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        // Pad all but the last column to keep lines free of trailing spaces.
        if col + 1 < cells.len() {
            for _ in cell.len()..widths[col] {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}
