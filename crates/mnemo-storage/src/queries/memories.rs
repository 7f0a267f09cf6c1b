// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory record operations.

use std::str::FromStr;

use mnemo_core::types::{MemoryUpdate, SearchQuery};
use mnemo_core::{MemoryKind, MemoryRecord, MnemoError, RankedRecord};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::search::{blob_to_vec, rank_candidates, vec_to_blob};

const COLUMNS: &str =
    "id, owner_id, thread_id, kind, namespace, content, embedding, metadata, created_at, updated_at";

fn conversion_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<MemoryRecord, rusqlite::Error> {
    let kind: String = row.get(3)?;
    let kind = MemoryKind::from_str(&kind).map_err(|e| conversion_err(3, e))?;
    let embedding: Option<Vec<u8>> = row.get(6)?;
    let metadata: String = row.get(7)?;
    let metadata = serde_json::from_str(&metadata).map_err(|e| conversion_err(7, e))?;
    Ok(MemoryRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        thread_id: row.get(2)?,
        kind,
        namespace: row.get(4)?,
        content: row.get(5)?,
        embedding: embedding.map(|blob| blob_to_vec(&blob)),
        metadata,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Insert a record and return its id.
pub async fn insert(db: &Database, record: &MemoryRecord) -> Result<String, MnemoError> {
    let record = record.clone();
    let metadata = record.metadata.to_string();
    let embedding = record.embedding.as_deref().map(vec_to_blob);
    db.connection()
        .call(move |conn| -> Result<String, rusqlite::Error> {
            conn.execute(
                &format!("INSERT INTO memory_records ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
                params![
                    record.id,
                    record.owner_id,
                    record.thread_id,
                    record.kind.to_string(),
                    record.namespace,
                    record.content,
                    embedding,
                    metadata,
                    record.created_at,
                    record.updated_at,
                ],
            )?;
            Ok(record.id)
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a record by id.
pub async fn get(db: &Database, id: &str) -> Result<Option<MemoryRecord>, MnemoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<MemoryRecord>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM memory_records WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Rewrite content, embedding and metadata in place and refresh `updated_at`.
///
/// Returns false when no record has this id.
pub async fn update(db: &Database, id: &str, update: &MemoryUpdate) -> Result<bool, MnemoError> {
    let id = id.to_string();
    let content = update.content.clone();
    let embedding = vec_to_blob(&update.embedding);
    let metadata = update.metadata.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE memory_records
                 SET content = ?2, embedding = ?3, metadata = ?4,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id, content, embedding, metadata],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Search records of one kind for an owner, optionally restricted to a thread.
///
/// With a query embedding the candidates are ranked by cosine similarity and
/// filtered by the query threshold. Without one, the most recently updated
/// records are returned unscored.
pub async fn search(db: &Database, query: &SearchQuery) -> Result<Vec<RankedRecord>, MnemoError> {
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let owner_id = query.owner_id.clone();
    let kind = query.kind.to_string();
    let thread_id = query.thread_id.clone();
    let sql_limit: i64 = if query.embedding.is_some() {
        -1
    } else {
        query.limit as i64
    };

    let candidates = db
        .connection()
        .call(move |conn| -> Result<Vec<MemoryRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM memory_records
                 WHERE owner_id = ?1 AND kind = ?2 AND (?3 IS NULL OR thread_id = ?3)
                 ORDER BY updated_at DESC, rowid DESC
                 LIMIT ?4"
            ))?;
            let rows = stmt.query_map(params![owner_id, kind, thread_id, sql_limit], row_to_record)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(match &query.embedding {
        Some(embedding) => rank_candidates(candidates, embedding, query.threshold, query.limit),
        None => candidates
            .into_iter()
            .map(|record| RankedRecord {
                record,
                score: None,
            })
            .collect(),
    })
}
