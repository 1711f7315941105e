//! Output formatting for the CLI.

use crate::types::{Board, BoardStats, DensityViolation};
use anyhow::Result;

/// Output format for board listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One block per column, tasks in rank order
    Text,
    /// The `/api/board` JSON document
    Json,
}

/// Render the board in the requested format.
pub fn format_board(board: &Board, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(board)?),
        OutputFormat::Text => Ok(format_board_text(board)),
    }
}

/// Render the board as plain text.
pub fn format_board_text(board: &Board) -> String {
    let mut out = String::new();

    for column in &board.columns {
        let tasks: Vec<_> = board.column_tasks(column.id).collect();
        out.push_str(&format!("{} ({})\n", column.name, tasks.len()));
        if tasks.is_empty() {
            out.push_str("  (empty)\n");
        }
        for task in tasks {
            out.push_str(&format!("  {}. {} [#{}]\n", task.position, task.title, task.id));
        }
    }

    out
}

/// Summary printed after a reset.
pub fn format_stats(stats: &BoardStats) -> String {
    let mut out = format!("Columns: {}\nTasks: {}\n", stats.columns, stats.tasks);
    if !stats.column_names.is_empty() {
        out.push_str("\nColumns:\n");
        for name in &stats.column_names {
            out.push_str(&format!("  - {}\n", name));
        }
    }
    out
}

/// One line per column that breaks density.
pub fn format_violations(violations: &[DensityViolation]) -> String {
    violations
        .iter()
        .map(|v| {
            let positions: Vec<String> = v.positions.iter().map(|p| p.to_string()).collect();
            format!(
                "column {}: {} task(s) at positions [{}], expected 1..={}\n",
                v.column_id,
                v.count,
                positions.join(", "),
                v.count
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, Task};

    fn sample_board() -> Board {
        Board {
            columns: vec![
                Column {
                    id: 1,
                    name: "To Do".into(),
                    position: 1,
                },
                Column {
                    id: 2,
                    name: "Done".into(),
                    position: 2,
                },
            ],
            tasks: vec![
                Task {
                    id: 4,
                    title: "Buy milk".into(),
                    column_id: 1,
                    position: 1,
                },
                Task {
                    id: 9,
                    title: "Walk dog".into(),
                    column_id: 1,
                    position: 2,
                },
            ],
        }
    }

    #[test]
    fn text_lists_columns_in_order() {
        let text = format_board_text(&sample_board());
        assert_eq!(
            text,
            "To Do (2)\n  1. Buy milk [#4]\n  2. Walk dog [#9]\nDone (0)\n  (empty)\n"
        );
    }

    #[test]
    fn json_uses_wire_names() {
        let json = format_board(&sample_board(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"cols\""));
        assert!(json.contains("\"col_id\""));
    }

    #[test]
    fn violations_render_positions() {
        let text = format_violations(&[DensityViolation {
            column_id: 3,
            count: 2,
            positions: vec![1, 3],
        }]);
        assert_eq!(text, "column 3: 2 task(s) at positions [1, 3], expected 1..=2\n");
    }
}
