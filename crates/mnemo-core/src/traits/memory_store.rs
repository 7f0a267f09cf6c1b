// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory store adapter trait for persisted memory records.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemoryRecord, MemoryUpdate, RankedRecord, SearchQuery};

/// Persistence and similarity search for memory records.
///
/// No optimistic concurrency check is performed on `update`: the last writer wins.
#[async_trait]
pub trait MemoryStoreAdapter: PluginAdapter {
    /// Inserts a new record and returns its id.
    async fn insert(&self, record: &MemoryRecord) -> Result<String, MnemoError>;

    /// Fetches a record by id.
    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>, MnemoError>;

    /// Rewrites content, embedding, and metadata of an existing record in place.
    ///
    /// Returns `false` (and changes nothing) when no record has this id.
    async fn update(&self, id: &str, update: &MemoryUpdate) -> Result<bool, MnemoError>;

    /// Searches records of one kind for one owner.
    ///
    /// With a query embedding, returns at most `limit` records whose cosine
    /// similarity is at least `threshold`, most similar first, each carrying
    /// its score. Without one, returns at most `limit` records unranked.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RankedRecord>, MnemoError>;
}
