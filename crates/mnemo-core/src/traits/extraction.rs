// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction adapter trait (the Extraction Oracle).

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ExtractionRequest, MemoryOperation};

/// Adapter that decides what to remember from a batch of exchanges.
///
/// Given the flushed exchanges and a snapshot of existing same-kind records,
/// returns `add`/`update`/`skip` operations. Must have no side effects
/// visible to the memory engine.
#[async_trait]
pub trait ExtractionAdapter: PluginAdapter {
    /// Proposes consolidation operations for one memory kind.
    async fn extract(&self, request: ExtractionRequest) -> Result<Vec<MemoryOperation>, MnemoError>;
}
