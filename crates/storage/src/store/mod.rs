#![forbid(unsafe_code)]

mod categories;
mod error;
mod requests;
mod support;
mod types;

pub use error::StoreError;
pub use requests::*;
pub use types::*;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use support::*;

pub const DB_FILE_NAME: &str = "catalog.db";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// One SQLite connection. Every engine operation runs in its own transaction
/// on it; share the database between threads by opening one store per thread.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        tracing::debug!(db_path = %db_path.display(), "catalog store opened");
        Ok(Self {
            conn,
            storage_dir: Some(storage_dir),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        install_schema(&conn)?;
        Ok(Self {
            conn,
            storage_dir: None,
        })
    }

    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    /// Write transactions take the database write lock up front so the
    /// read-check-write sequence of an operation is not interleaved with
    /// another connection's writes.
    fn write_tx(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}
