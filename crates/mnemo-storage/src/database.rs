// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use mnemo_core::MnemoError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Convert tokio-rusqlite errors to `MnemoError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MnemoError {
    MnemoError::Storage {
        source: format!("sqlite: {e}").into(),
    }
}

pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> MnemoError {
    MnemoError::Storage {
        source: Box::new(e),
    }
}

fn apply_pragmas(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )
}

/// Handle to the single SQLite connection shared by the Exchange Log and the
/// Memory Store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply pending migrations and
    /// return the async handle.
    ///
    /// Migrations run on a short-lived synchronous connection before the
    /// async connection is opened, so `path` must name a file rather than
    /// `:memory:`.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, MnemoError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| MnemoError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let sync_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), MnemoError> {
            let mut conn = rusqlite::Connection::open(&sync_path).map_err(map_sqlite_err)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(map_sqlite_err)?;
            }
            apply_pragmas(&conn).map_err(map_sqlite_err)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| MnemoError::Internal(format!("migration task failed: {e}")))??;

        let conn = Connection::open(path).await.map_err(map_sqlite_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> { apply_pragmas(conn) })
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The async connection every query module goes through.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), MnemoError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), MnemoError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(map_tr_err)
    }
}
