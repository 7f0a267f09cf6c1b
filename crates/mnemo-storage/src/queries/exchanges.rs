// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exchange log operations.

use std::str::FromStr;

use mnemo_core::{ExchangeMessage, MnemoError, Role};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, thread_id, role, content, consolidated, created_at";

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<ExchangeMessage, rusqlite::Error> {
    let role: String = row.get(2)?;
    let role = Role::from_str(&role).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ExchangeMessage {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        role,
        content: row.get(3)?,
        consolidated: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Append a message and return its log-assigned id.
pub async fn append(
    db: &Database,
    thread_id: &str,
    role: Role,
    content: &str,
) -> Result<i64, MnemoError> {
    let thread_id = thread_id.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO exchange_messages (thread_id, role, content) VALUES (?1, ?2, ?3)",
                params![thread_id, role.to_string(), content],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Unconsolidated messages of a thread in ascending id order.
pub async fn list_unconsolidated(
    db: &Database,
    thread_id: &str,
) -> Result<Vec<ExchangeMessage>, MnemoError> {
    let thread_id = thread_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<ExchangeMessage>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM exchange_messages
                 WHERE thread_id = ?1 AND consolidated = 0
                 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![thread_id], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// The last `limit` messages of a thread (all when `None`), oldest first.
pub async fn list_recent(
    db: &Database,
    thread_id: &str,
    limit: Option<usize>,
) -> Result<Vec<ExchangeMessage>, MnemoError> {
    let thread_id = thread_id.to_string();
    // SQLite treats a negative LIMIT as unbounded.
    let limit = limit.map(|n| n as i64).unwrap_or(-1);
    db.connection()
        .call(move |conn| -> Result<Vec<ExchangeMessage>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM (
                     SELECT {COLUMNS} FROM exchange_messages
                     WHERE thread_id = ?1
                     ORDER BY id DESC LIMIT ?2
                 ) ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![thread_id, limit], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Flag the given messages as consolidated in one transaction.
///
/// Already-consolidated and unknown ids are left alone; the call is idempotent.
/// Returns the number of rows that flipped.
pub async fn mark_consolidated(db: &Database, ids: &[i64]) -> Result<usize, MnemoError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            let mut changed = 0;
            {
                let mut stmt = tx.prepare(
                    "UPDATE exchange_messages SET consolidated = 1 WHERE id = ?1 AND consolidated = 0",
                )?;
                for id in &ids {
                    changed += stmt.execute(params![id])?;
                }
            }
            tx.commit()?;
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)
}
