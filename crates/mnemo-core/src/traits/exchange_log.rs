// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exchange log adapter trait for per-thread conversation history.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ExchangeMessage, Role};

/// Append-only, per-thread message log with a per-message consolidated flag.
#[async_trait]
pub trait ExchangeLogAdapter: PluginAdapter {
    /// Appends a message and returns its log-assigned, monotonically increasing id.
    async fn append(&self, thread_id: &str, role: Role, content: &str) -> Result<i64, MnemoError>;

    /// Lists the thread's unconsolidated messages in log order.
    async fn list_unconsolidated(&self, thread_id: &str) -> Result<Vec<ExchangeMessage>, MnemoError>;

    /// Lists the last `limit` messages of the thread in log order.
    async fn list_recent(
        &self,
        thread_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ExchangeMessage>, MnemoError>;

    /// Marks the given messages consolidated. Idempotent.
    async fn mark_consolidated(&self, ids: &[i64]) -> Result<(), MnemoError>;
}
