// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted Extraction Oracle for deterministic consolidation tests.
//!
//! Each memory kind has its own FIFO of scripted replies. A reply is either
//! a list of operations or a failure. When a kind's queue is empty the
//! oracle proposes nothing. Every request is recorded for later assertions.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemo_core::types::ExtractionRequest;
use mnemo_core::{
    AdapterType, ExtractionAdapter, HealthStatus, MemoryAction, MemoryKind, MemoryOperation,
    MnemoError, PluginAdapter,
};

enum Reply {
    Operations(Vec<MemoryOperation>),
    Failure(String),
}

#[derive(Default)]
pub struct MockExtractionOracle {
    scripts: Mutex<HashMap<MemoryKind, VecDeque<Reply>>>,
    requests: Mutex<Vec<ExtractionRequest>>,
}

impl MockExtractionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the operations returned by the next call for `kind`.
    pub async fn push_operations(&self, kind: MemoryKind, operations: Vec<MemoryOperation>) {
        self.scripts
            .lock()
            .await
            .entry(kind)
            .or_default()
            .push_back(Reply::Operations(operations));
    }

    /// Make the next call for `kind` fail with an extraction error.
    pub async fn push_failure(&self, kind: MemoryKind, message: impl Into<String>) {
        self.scripts
            .lock()
            .await
            .entry(kind)
            .or_default()
            .push_back(Reply::Failure(message.into()));
    }

    /// All requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<ExtractionRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests received for one kind.
    pub async fn requests_for(&self, kind: MemoryKind) -> Vec<ExtractionRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect()
    }
}

/// An `add` operation carrying the given kind-specific fields.
pub fn add_op(fields: serde_json::Value) -> MemoryOperation {
    operation(MemoryAction::Add, None, fields)
}

/// An `update` operation targeting `target_id`.
pub fn update_op(target_id: &str, fields: serde_json::Value) -> MemoryOperation {
    operation(MemoryAction::Update, Some(target_id.to_string()), fields)
}

pub fn skip_op() -> MemoryOperation {
    operation(MemoryAction::Skip, None, serde_json::json!({}))
}

fn operation(
    action: MemoryAction,
    target_id: Option<String>,
    fields: serde_json::Value,
) -> MemoryOperation {
    MemoryOperation {
        action,
        target_id,
        fields: match fields {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        },
    }
}

#[async_trait]
impl PluginAdapter for MockExtractionOracle {
    fn name(&self) -> &str {
        "mock-extraction"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Extraction
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl ExtractionAdapter for MockExtractionOracle {
    async fn extract(&self, request: ExtractionRequest) -> Result<Vec<MemoryOperation>, MnemoError> {
        let kind = request.kind;
        self.requests.lock().await.push(request);
        let reply = self
            .scripts
            .lock()
            .await
            .get_mut(&kind)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Operations(ops)) => Ok(ops),
            Some(Reply::Failure(message)) => Err(MnemoError::extraction(message)),
            None => Ok(Vec::new()),
        }
    }
}
