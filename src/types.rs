//! Core types for the Kanban board.

use crate::error::{BoardError, BoardResult};
use serde::{Deserialize, Serialize};

/// Maximum task title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// A named stage of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: i64,
    pub name: String,
    #[serde(rename = "ord")]
    pub position: i64,
}

/// A unit of work, ranked within its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(rename = "col_id")]
    pub column_id: i64,
    #[serde(rename = "ord")]
    pub position: i64,
}

/// Where a task sits after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskPlacement {
    pub id: i64,
    #[serde(rename = "col_id")]
    pub column_id: i64,
    #[serde(rename = "ord")]
    pub position: i64,
}

impl From<&Task> for TaskPlacement {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            column_id: task.column_id,
            position: task.position,
        }
    }
}

/// Full board snapshot.
///
/// Columns are ordered by position; tasks by `(column_id, position)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "cols")]
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

impl Board {
    /// Tasks of one column, in rank order.
    pub fn column_tasks(&self, column_id: i64) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.column_id == column_id)
    }
}

/// Input for appending a task to a column.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(rename = "col_id")]
    pub column_id: i64,
}

impl NewTask {
    pub fn new(title: impl Into<String>, column_id: i64) -> Self {
        Self {
            title: title.into(),
            column_id,
        }
    }

    pub fn validate(&self) -> BoardResult<()> {
        validate_title(&self.title)?;
        validate_id("col_id", self.column_id)
    }
}

/// Input for moving a task to an absolute position.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TaskMove {
    #[serde(rename = "col_id")]
    pub column_id: i64,
    #[serde(rename = "ord")]
    pub position: i64,
}

impl TaskMove {
    pub fn new(column_id: i64, position: i64) -> Self {
        Self {
            column_id,
            position,
        }
    }

    pub fn validate(&self) -> BoardResult<()> {
        validate_id("col_id", self.column_id)?;
        if self.position < 1 {
            return Err(BoardError::invalid("ord", "ord must be at least 1"));
        }
        Ok(())
    }
}

/// Validate a task title: non-blank, free of control characters and at most
/// [`MAX_TITLE_CHARS`] characters.
pub fn validate_title(title: &str) -> BoardResult<()> {
    if title.trim().is_empty() {
        return Err(BoardError::invalid("title", "title must not be empty"));
    }
    // SQLite's length() stops at the first NUL, so such titles would
    // slip past the column check or trip it with a store error.
    if title.chars().any(char::is_control) {
        return Err(BoardError::invalid(
            "title",
            "title must not contain control characters",
        ));
    }
    let chars = title.chars().count();
    if chars > MAX_TITLE_CHARS {
        return Err(BoardError::invalid(
            "title",
            format!(
                "title must be at most {} characters (got {})",
                MAX_TITLE_CHARS, chars
            ),
        ));
    }
    Ok(())
}

/// Validate a row identifier (must be positive).
pub fn validate_id(field: &'static str, id: i64) -> BoardResult<()> {
    if id <= 0 {
        return Err(BoardError::invalid(
            field,
            format!("{} must be a positive integer", field),
        ));
    }
    Ok(())
}

/// A column whose task positions are not exactly `1..=count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DensityViolation {
    pub column_id: i64,
    pub count: i64,
    /// Positions actually stored, ascending.
    pub positions: Vec<i64>,
}

/// Row counts for a provisioned board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub columns: i64,
    pub tasks: i64,
    /// Column names in board order.
    pub column_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("a").is_ok());
        assert!(validate_title(&"x".repeat(200)).is_ok());
        assert!(validate_title(&"x".repeat(201)).is_err());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_rejects_control_characters() {
        for title in ["\0abc", "ok\0", "line\nbreak", "tab\there"] {
            let err = validate_title(title).unwrap_err();
            assert!(matches!(err, BoardError::Validation { field: "title", .. }));
        }
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // 200 two-byte characters
        assert!(validate_title(&"ż".repeat(200)).is_ok());
    }

    #[test]
    fn move_rejects_non_positive_values() {
        assert!(TaskMove::new(1, 1).validate().is_ok());
        assert!(TaskMove::new(0, 1).validate().is_err());
        assert!(TaskMove::new(1, 0).validate().is_err());
        assert!(TaskMove::new(-3, 2).validate().is_err());
    }

    #[test]
    fn new_task_reports_failing_field() {
        match NewTask::new("ok", 0).validate() {
            Err(BoardError::Validation { field, .. }) => assert_eq!(field, "col_id"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn wire_names_match_board_api() {
        let board = Board {
            columns: vec![Column {
                id: 1,
                name: "To Do".into(),
                position: 1,
            }],
            tasks: vec![Task {
                id: 7,
                title: "Write docs".into(),
                column_id: 1,
                position: 1,
            }],
        };
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["cols"][0]["ord"], 1);
        assert_eq!(json["tasks"][0]["col_id"], 1);
        assert_eq!(json["tasks"][0]["ord"], 1);

        let input: TaskMove = serde_json::from_str(r#"{"col_id": 2, "ord": 3}"#).unwrap();
        assert_eq!(input.column_id, 2);
        assert_eq!(input.position, 3);
    }
}
