//! Board provisioning: wiping and re-seeding columns.

use super::Database;
use crate::error::{BoardError, BoardResult};
use crate::types::BoardStats;
use rusqlite::{Connection, params};
use tracing::info;

fn board_stats_internal(conn: &Connection) -> BoardResult<BoardStats> {
    let columns: i64 = conn.query_row("SELECT COUNT(*) FROM columns", [], |row| row.get(0))?;
    let tasks: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;

    let mut stmt = conn.prepare("SELECT name FROM columns ORDER BY ord")?;
    let column_names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(BoardStats {
        columns,
        tasks,
        column_names,
    })
}

impl Database {
    /// Count columns and tasks.
    pub fn board_stats(&self) -> BoardResult<BoardStats> {
        self.with_read_tx(|tx| board_stats_internal(tx))
    }

    /// Delete every task and column, then create `columns` at positions `1..=n`.
    ///
    /// Runs in one transaction; on failure the previous board is left intact.
    pub fn reset_board<S: AsRef<str>>(&self, columns: &[S]) -> BoardResult<BoardStats> {
        if columns.is_empty() {
            return Err(BoardError::invalid(
                "columns",
                "a board needs at least one column",
            ));
        }
        for name in columns {
            if name.as_ref().trim().is_empty() {
                return Err(BoardError::invalid("columns", "column names must not be empty"));
            }
        }

        let stats = self.with_write_tx(|tx| {
            tx.execute("DELETE FROM tasks", [])?;
            tx.execute("DELETE FROM columns", [])?;
            // Restart generated ids so a fresh board numbers from 1 again.
            tx.execute(
                "DELETE FROM sqlite_sequence WHERE name IN ('tasks', 'columns')",
                [],
            )?;

            let mut insert = tx.prepare("INSERT INTO columns (name, ord) VALUES (?1, ?2)")?;
            for (i, name) in columns.iter().enumerate() {
                insert.execute(params![name.as_ref(), i as i64 + 1])?;
            }
            drop(insert);

            board_stats_internal(tx)
        })?;

        info!(columns = stats.columns, "Board reset");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewTask;

    #[test]
    fn reset_replaces_columns_and_drops_tasks() {
        let db = Database::open_in_memory().unwrap();
        db.create_task(&NewTask::new("keep me?", 1)).unwrap();

        let stats = db.reset_board(&["Backlog", "Doing", "Review", "Done"]).unwrap();
        assert_eq!(stats.columns, 4);
        assert_eq!(stats.tasks, 0);
        assert_eq!(stats.column_names, vec!["Backlog", "Doing", "Review", "Done"]);

        let board = db.get_board().unwrap();
        assert_eq!(board.columns[0].id, 1);
        assert_eq!(
            board.columns.iter().map(|c| c.position).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn reset_rejects_empty_column_list() {
        let db = Database::open_in_memory().unwrap();
        let empty: [&str; 0] = [];
        assert!(db.reset_board(&empty).is_err());
        // Board untouched
        assert_eq!(db.board_stats().unwrap().columns, 3);
    }

    #[test]
    fn stats_on_seeded_board() {
        let db = Database::open_in_memory().unwrap();
        let stats = db.board_stats().unwrap();
        assert_eq!(stats.columns, 3);
        assert_eq!(stats.tasks, 0);
        assert_eq!(stats.column_names, vec!["To Do", "In Progress", "Done"]);
    }
}
