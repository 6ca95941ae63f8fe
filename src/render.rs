//! Result-table rendering for the shell

use crate::db::ExecutionOutcome;

pub const MAX_DISPLAY_ROWS: usize = 20;

/// Text for one statement's outcome, table capped at [`MAX_DISPLAY_ROWS`].
pub fn render_outcome(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Rows { headers, rows } => {
            let shown = &rows[..rows.len().min(MAX_DISPLAY_ROWS)];
            let mut out = render_table(headers, shown);
            if rows.len() > MAX_DISPLAY_ROWS {
                out.push_str(&format!(
                    "\nShowing {} of {} rows. Use LIMIT clause to fetch more rows.\n",
                    MAX_DISPLAY_ROWS,
                    rows.len()
                ));
            }
            out
        }
        ExecutionOutcome::Empty => "Query executed successfully (0 rows)\n".to_string(),
        ExecutionOutcome::Failed(message) => format!("SQL Error: {}\n", message),
    }
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers
        .len()
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));

    let mut widths = vec![0usize; columns];
    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(header.chars().count());
    }
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let border = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let line = |cells: &[String]| {
        let body = widths
            .iter()
            .enumerate()
            .map(|(idx, width)| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                let pad = width - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|\n", body)
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(headers));
    out.push_str(&border);
    for row in rows {
        out.push_str(&line(row));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_table_layout() {
        let table = render_table(&strings(&["id", "name"]), &[strings(&["1", "Ada"]), strings(&["22", "Bo"])]);
        let expected = "\
+----+------+
| id | name |
+----+------+
| 1  | Ada  |
| 22 | Bo   |
+----+------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_row_cap_notice() {
        let rows: Vec<Vec<String>> = (0..25).map(|i| vec![i.to_string()]).collect();
        let out = render_outcome(&ExecutionOutcome::Rows {
            headers: strings(&["n"]),
            rows,
        });
        assert!(out.contains("| 19 |"));
        assert!(!out.contains("| 20 |"));
        assert!(out.contains("Showing 20 of 25 rows"));
    }

    #[test]
    fn test_failure_and_empty() {
        assert_eq!(
            render_outcome(&ExecutionOutcome::Failed("Table 'shop.nope' doesn't exist".into())),
            "SQL Error: Table 'shop.nope' doesn't exist\n"
        );
        assert!(render_outcome(&ExecutionOutcome::Empty).contains("0 rows"));
    }
}
