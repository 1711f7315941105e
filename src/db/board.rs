//! Board reads and the two ordering-preserving mutations.
//!
//! Every column's task positions form exactly `1..=count`. `create_task`
//! appends at `max + 1` and `move_task` closes the gap it leaves behind and
//! opens a slot at the destination, both inside one write transaction.

use super::Database;
use crate::error::{BoardError, BoardResult};
use crate::types::{Board, Column, DensityViolation, NewTask, Task, TaskMove, validate_id};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub fn parse_column_row(row: &Row) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get("id")?,
        name: row.get("name")?,
        position: row.get("ord")?,
    })
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        column_id: row.get("col_id")?,
        position: row.get("ord")?,
    })
}

fn get_task_internal(conn: &Connection, task_id: i64) -> BoardResult<Option<Task>> {
    Ok(conn
        .query_row(
            "SELECT id, title, col_id, ord FROM tasks WHERE id = ?1",
            params![task_id],
            parse_task_row,
        )
        .optional()?)
}

fn get_column_internal(conn: &Connection, column_id: i64) -> BoardResult<Option<Column>> {
    Ok(conn
        .query_row(
            "SELECT id, name, ord FROM columns WHERE id = ?1",
            params![column_id],
            parse_column_row,
        )
        .optional()?)
}

fn require_column(conn: &Connection, column_id: i64) -> BoardResult<Column> {
    get_column_internal(conn, column_id)?.ok_or(BoardError::ColumnNotFound(column_id))
}

fn list_columns_internal(conn: &Connection) -> BoardResult<Vec<Column>> {
    let mut stmt = conn.prepare("SELECT id, name, ord FROM columns ORDER BY ord")?;
    let columns = stmt
        .query_map([], parse_column_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

fn list_tasks_internal(conn: &Connection) -> BoardResult<Vec<Task>> {
    let mut stmt =
        conn.prepare("SELECT id, title, col_id, ord FROM tasks ORDER BY col_id, ord, id")?;
    let tasks = stmt
        .query_map([], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

/// Clamp a requested position to `1..=others + 1`, where `others` is the
/// number of tasks already in the target column besides the moved one.
pub fn clamp_position(requested: i64, others: i64) -> i64 {
    requested.clamp(1, others + 1)
}

impl Database {
    /// Read the whole board.
    pub fn get_board(&self) -> BoardResult<Board> {
        self.with_read_tx(|tx| {
            Ok(Board {
                columns: list_columns_internal(tx)?,
                tasks: list_tasks_internal(tx)?,
            })
        })
    }

    /// Get a task by ID.
    pub fn get_task(&self, task_id: i64) -> BoardResult<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// Get a column by ID.
    pub fn get_column(&self, column_id: i64) -> BoardResult<Option<Column>> {
        self.with_conn(|conn| get_column_internal(conn, column_id))
    }

    /// Append a task to the end of a column.
    pub fn create_task(&self, input: &NewTask) -> BoardResult<Task> {
        input.validate()?;

        let task = self.with_write_tx(|tx| {
            require_column(tx, input.column_id)?;

            let max_position: i64 = tx.query_row(
                "SELECT COALESCE(MAX(ord), 0) FROM tasks WHERE col_id = ?1",
                params![input.column_id],
                |row| row.get(0),
            )?;
            let position = max_position + 1;

            tx.execute(
                "INSERT INTO tasks (title, col_id, ord) VALUES (?1, ?2, ?3)",
                params![&input.title, input.column_id, position],
            )?;

            Ok(Task {
                id: tx.last_insert_rowid(),
                title: input.title.clone(),
                column_id: input.column_id,
                position,
            })
        })?;

        info!(
            task_id = task.id,
            column_id = task.column_id,
            position = task.position,
            "Created task"
        );
        Ok(task)
    }

    /// Move a task to an absolute position in a column.
    ///
    /// Positions past the end of the target column put the task last. Returns
    /// the task as stored after the move.
    pub fn move_task(&self, task_id: i64, target: &TaskMove) -> BoardResult<Task> {
        validate_id("task_id", task_id)?;
        target.validate()?;

        let moved = self.with_write_tx(|tx| {
            let task = get_task_internal(tx, task_id)?.ok_or(BoardError::TaskNotFound(task_id))?;
            require_column(tx, target.column_id)?;

            let others: i64 = tx.query_row(
                "SELECT COUNT(*) FROM tasks WHERE col_id = ?1 AND id != ?2",
                params![target.column_id, task_id],
                |row| row.get(0),
            )?;
            let position = clamp_position(target.position, others);

            // Close the gap at the source. Runs for same-column moves too:
            // the moved task still holds its old slot and is excluded.
            let closed = tx.execute(
                "UPDATE tasks SET ord = ord - 1 WHERE col_id = ?1 AND ord > ?2 AND id != ?3",
                params![task.column_id, task.position, task_id],
            )?;

            let opened = tx.execute(
                "UPDATE tasks SET ord = ord + 1 WHERE col_id = ?1 AND ord >= ?2 AND id != ?3",
                params![target.column_id, position, task_id],
            )?;

            tx.execute(
                "UPDATE tasks SET col_id = ?1, ord = ?2 WHERE id = ?3",
                params![target.column_id, position, task_id],
            )?;

            debug!(task_id, closed, opened, "Shifted sibling positions");

            Ok(Task {
                column_id: target.column_id,
                position,
                ..task
            })
        })?;

        if moved.position != target.position {
            debug!(
                task_id,
                requested = target.position,
                position = moved.position,
                "Clamped move position to end of column"
            );
        }
        info!(
            task_id,
            column_id = moved.column_id,
            position = moved.position,
            "Moved task"
        );
        Ok(moved)
    }

    /// Report every column whose positions are not exactly `1..=count`.
    pub fn density_violations(&self) -> BoardResult<Vec<DensityViolation>> {
        let board = self.get_board()?;

        let mut by_column: BTreeMap<i64, Vec<i64>> = board
            .columns
            .iter()
            .map(|c| (c.id, Vec::new()))
            .collect();
        for task in &board.tasks {
            by_column
                .entry(task.column_id)
                .or_default()
                .push(task.position);
        }

        let violations = by_column
            .into_iter()
            .filter_map(|(column_id, mut positions)| {
                positions.sort_unstable();
                let dense = positions
                    .iter()
                    .enumerate()
                    .all(|(i, &p)| p == i as i64 + 1);
                (!dense).then(|| DensityViolation {
                    column_id,
                    count: positions.len() as i64,
                    positions,
                })
            })
            .collect();
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_position_bounds() {
        assert_eq!(clamp_position(1, 0), 1);
        assert_eq!(clamp_position(5, 0), 1);
        assert_eq!(clamp_position(3, 4), 3);
        assert_eq!(clamp_position(99, 4), 5);
    }

    #[test]
    fn density_violations_reports_gaps() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, col_id, ord) VALUES ('a', 1, 1), ('b', 1, 3)",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let violations = db.density_violations().unwrap();
        assert_eq!(
            violations,
            vec![DensityViolation {
                column_id: 1,
                count: 2,
                positions: vec![1, 3],
            }]
        );
    }

    #[test]
    fn density_violations_reports_duplicates() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, col_id, ord) VALUES ('a', 2, 1), ('b', 2, 1)",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let violations = db.density_violations().unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].column_id, 2);
        assert_eq!(violations[0].positions, vec![1, 1]);
    }

    #[test]
    fn empty_board_is_dense() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.density_violations().unwrap().is_empty());
    }
}
