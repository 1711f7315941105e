//! Database layer for the Kanban board.

pub mod board;
pub mod provision;

use crate::error::{BoardError, BoardResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> BoardResult<Self> {
        let conn = Connection::open(path)?;

        // WAL lets readers proceed while a writer holds the lock; the busy
        // timeout makes a second writer wait instead of failing immediately.
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> BoardResult<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations.
    fn run_migrations(&self) -> BoardResult<()> {
        let mut conn = self.lock()?;
        let report = embedded::migrations::runner().run(&mut *conn)?;
        for migration in report.applied_migrations() {
            tracing::debug!(migration = %migration, "Applied migration");
        }
        Ok(())
    }

    fn lock(&self) -> BoardResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| BoardError::internal("database connection mutex poisoned"))
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> BoardResult<T>
    where
        F: FnOnce(&Connection) -> BoardResult<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a function with mutable access to the connection (for transactions).
    pub fn with_conn_mut<F, T>(&self, f: F) -> BoardResult<T>
    where
        F: FnOnce(&mut Connection) -> BoardResult<T>,
    {
        let mut conn = self.lock()?;
        f(&mut conn)
    }

    /// Run `f` inside a write transaction and commit if it succeeds.
    ///
    /// The transaction is opened with `BEGIN IMMEDIATE`, so the database write
    /// lock is held from the first read. Writers on other connections to the
    /// same file wait on the busy timeout. If `f` fails, or the commit does,
    /// dropping the transaction rolls everything back.
    pub fn with_write_tx<F, T>(&self, f: F) -> BoardResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> BoardResult<T>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }

    /// Run `f` inside a deferred read transaction, giving it a consistent snapshot.
    pub fn with_read_tx<F, T>(&self, f: F) -> BoardResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> BoardResult<T>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
            let value = f(&tx)?;
            tx.finish()?;
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_seed_default_columns() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM columns", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn failed_write_tx_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let result: BoardResult<()> = db.with_write_tx(|tx| {
            tx.execute(
                "INSERT INTO tasks (title, col_id, ord) VALUES ('x', 1, 1)",
                [],
            )?;
            Err(BoardError::internal("boom"))
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM tasks", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory().unwrap();
        let result = db.with_write_tx(|tx| {
            tx.execute(
                "INSERT INTO tasks (title, col_id, ord) VALUES ('orphan', 999, 1)",
                [],
            )?;
            Ok(())
        });
        assert!(matches!(result, Err(BoardError::Store(_))));
    }
}
