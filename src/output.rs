//! Tabular output for query results
//!
//! Rows are drawn as a box table with a leading `(index)` column holding the
//! zero-based row number. Strings print as-is, SQL NULL prints as `null`,
//! and numbers print in their JSON form.

use crate::engine::QueryResult;

const INDEX_HEADER: &str = "(index)";

/// Render every row of `result` as a box-drawn table (no trailing newline)
#[must_use]
pub fn render_table(result: &QueryResult) -> String {
    let header: Vec<String> = std::iter::once(INDEX_HEADER.to_string())
        .chain(result.columns.iter().cloned())
        .collect();

    let body: Vec<Vec<String>> = result
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            std::iter::once(idx.to_string()).chain(row.iter().map(format_cell)).collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (idx, cell) in row.iter().enumerate() {
            // Ragged rows (more cells than columns) still get a column
            if idx >= widths.len() {
                widths.push(0);
            }
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(body.len() + 4);
    lines.push(border(&widths, '┌', '┬', '┐'));
    lines.push(row_line(&widths, &header));
    lines.push(border(&widths, '├', '┼', '┤'));
    lines.extend(body.iter().map(|row| row_line(&widths, row)));
    lines.push(border(&widths, '└', '┴', '┘'));

    lines.join("\n")
}

/// Display form of a single cell
#[must_use]
pub fn format_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

fn row_line(widths: &[usize], cells: &[String]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map_or("", String::as_str);
            format!(" {cell:<width$} ")
        })
        .collect();
    format!("│{}│", padded.join("│"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_departments() {
        let result = QueryResult {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![vec![json!(1), json!("Engineering")], vec![json!(2), json!("Sales")]],
        };

        insta::assert_snapshot!(render_table(&result), @r"
        ┌─────────┬────┬─────────────┐
        │ (index) │ id │ name        │
        ├─────────┼────┼─────────────┤
        │ 0       │ 1  │ Engineering │
        │ 1       │ 2  │ Sales       │
        └─────────┴────┴─────────────┘
        ");
    }

    #[test]
    fn test_render_nulls_and_numbers() {
        let result = QueryResult {
            columns: vec!["id".to_string(), "salary".to_string(), "manager_id".to_string()],
            rows: vec![vec![json!(7), json!(90000.5), serde_json::Value::Null]],
        };

        let rendered = render_table(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "│ (index) │ id │ salary  │ manager_id │");
        assert_eq!(lines[3], "│ 0       │ 7  │ 90000.5 │ null       │");
    }

    #[test]
    fn test_render_counts_characters_not_bytes() {
        let result = QueryResult {
            columns: vec!["name".to_string()],
            rows: vec![vec![json!("Zoë")], vec![json!("Ann")]],
        };

        let rendered = render_table(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[3], "│ 0       │ Zoë  │");
        assert_eq!(lines[4], "│ 1       │ Ann  │");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&json!("Legal")), "Legal");
        assert_eq!(format_cell(&json!(42)), "42");
        assert_eq!(format_cell(&json!(true)), "true");
        assert_eq!(format_cell(&serde_json::Value::Null), "null");
    }
}
