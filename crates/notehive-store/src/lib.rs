#![forbid(unsafe_code)]
//! Document store for notehive, backed by embedded SQLite.
//!
//! One connection guarded by an async mutex; every method takes the lock,
//! runs its statements synchronously, and releases. There is no
//! cross-request locking beyond that: read-then-write sequences issued by
//! different requests may interleave, which is the accepted weak-consistency
//! model (display-time tiebreaks absorb order collisions).

use std::path::Path;
use std::sync::Arc;

use notehive_core::{Error, Result};
use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::debug;

mod pages;
mod schema;
mod users;
mod workspaces;

/// Cheap-to-clone handle on the shared connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(storage_err)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // The schema declares foreign keys for documentation only (see
        // schema.rs); the bundled SQLite build defaults them on, so switch
        // enforcement off explicitly to keep upstream SQLite's default.
        conn.execute_batch("PRAGMA foreign_keys = OFF;")
            .map_err(storage_err)?;
        schema::create_schema(&conn)?;
        debug!("store schema ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Liveness probe for the health endpoint.
    pub async fn probe(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(storage_err)
    }
}

pub(crate) fn storage_err(err: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return Error::conflict("a record with a conflicting unique field already exists");
        }
    }
    Error::storage(format!("sqlite: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_succeeds_on_fresh_store() {
        let store = Store::open_in_memory().expect("open store");
        store.probe().await.expect("probe");
    }

    #[tokio::test]
    async fn open_creates_the_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notehive.sqlite");
        let store = Store::open(&path).expect("open store");
        store.probe().await.expect("probe");
        assert!(path.exists());
    }
}
