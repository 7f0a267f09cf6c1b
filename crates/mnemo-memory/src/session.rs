// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session manager and the caller-facing memory session.
//!
//! [`SessionManager`] drives the windower and fans extraction and retrieval
//! out across the enabled strategies. [`MemorySession`] wraps it for one
//! conversation: it appends exchanges to the log, schedules per-turn
//! consolidation in the background, and serves retrieved context.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use mnemo_config::SessionConfig;
use mnemo_core::{
    EmbeddingAdapter, ExchangeLogAdapter, ExchangeMessage, ExtractionAdapter, MemoryKind,
    MemoryStoreAdapter, MnemoError, Role, WindowSize,
};
use tracing::{debug, info, warn};

use crate::scheduler::ConsolidationScheduler;
use crate::strategy::{AppliedOperation, MemoryStrategy, build_strategies};
use crate::windower::{FlushTrigger, flush_set};

const RECALL_HEADER: &str = "## RELEVANT MEMORIES";
const RECALL_PREAMBLE: &str =
    "The following information has been remembered from previous conversations:";

/// The external collaborators a session talks to.
#[derive(Clone)]
pub struct MemoryDeps {
    pub exchange_log: Arc<dyn ExchangeLogAdapter>,
    pub store: Arc<dyn MemoryStoreAdapter>,
    pub embedder: Arc<dyn EmbeddingAdapter>,
    pub oracle: Arc<dyn ExtractionAdapter>,
}

/// Result of one consolidation attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidationOutcome {
    /// Ids of the messages in the flush set; empty when no flush was due.
    pub flushed_ids: Vec<i64>,
    /// Operations applied per kind that succeeded.
    pub applied: BTreeMap<MemoryKind, Vec<AppliedOperation>>,
    /// Kinds whose extraction failed.
    pub failed: Vec<MemoryKind>,
    /// Whether the flush set was marked consolidated.
    pub marked: bool,
}

/// Owns the session's strategies and makes the flush and recall decisions.
pub struct SessionManager {
    config: SessionConfig,
    exchange_log: Arc<dyn ExchangeLogAdapter>,
    strategies: Vec<Arc<dyn MemoryStrategy>>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, deps: &MemoryDeps) -> Self {
        let strategies = build_strategies(
            &config,
            deps.store.clone(),
            deps.embedder.clone(),
            deps.oracle.clone(),
        );
        Self::with_strategies(config, deps.exchange_log.clone(), strategies)
    }

    pub fn with_strategies(
        config: SessionConfig,
        exchange_log: Arc<dyn ExchangeLogAdapter>,
        strategies: Vec<Arc<dyn MemoryStrategy>>,
    ) -> Self {
        Self {
            config,
            exchange_log,
            strategies,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn strategies(&self) -> &[Arc<dyn MemoryStrategy>] {
        &self.strategies
    }

    /// Flushes whatever `trigger` says is due for `thread_id`.
    ///
    /// Every strategy consolidates the flush set concurrently. The set is
    /// marked consolidated only when all of them succeeded; otherwise it
    /// stays pending and the next trigger retries it. Store failures while
    /// listing or marking are returned; strategy failures are reported in
    /// the outcome.
    pub async fn maybe_consolidate(
        &self,
        owner_id: &str,
        thread_id: &str,
        trigger: FlushTrigger,
    ) -> Result<ConsolidationOutcome, MnemoError> {
        let pending = self.exchange_log.list_unconsolidated(thread_id).await?;
        let flush = flush_set(&pending, trigger, self.config.window_size);
        if flush.is_empty() {
            debug!(thread_id, pending = pending.len(), ?trigger, "no flush due");
            return Ok(ConsolidationOutcome::default());
        }

        let flushed_ids: Vec<i64> = flush.iter().map(|m| m.id).collect();
        debug!(
            owner_id,
            thread_id,
            ?trigger,
            flushed = flushed_ids.len(),
            pending = pending.len(),
            "flushing exchanges"
        );

        let model = self.config.extraction_model.as_str();
        let results = join_all(self.strategies.iter().map(|strategy| {
            let flush = &flush;
            async move {
                let result = strategy
                    .extract_and_consolidate(owner_id, thread_id, flush, model)
                    .await;
                (strategy.kind(), result)
            }
        }))
        .await;

        let mut outcome = ConsolidationOutcome {
            flushed_ids,
            ..Default::default()
        };
        for (kind, result) in results {
            match result {
                Ok(applied) => {
                    outcome.applied.insert(kind, applied);
                }
                Err(e) => {
                    warn!(
                        owner_id,
                        thread_id,
                        kind = %kind,
                        oracle = e.is_oracle_failure(),
                        error = %e,
                        "strategy consolidation failed"
                    );
                    outcome.failed.push(kind);
                }
            }
        }

        if outcome.failed.is_empty() {
            self.exchange_log
                .mark_consolidated(&outcome.flushed_ids)
                .await?;
            outcome.marked = true;
            info!(
                owner_id,
                thread_id,
                flushed = outcome.flushed_ids.len(),
                "exchanges consolidated"
            );
        } else {
            warn!(
                owner_id,
                thread_id,
                failed = outcome.failed.len(),
                "consolidation incomplete; exchanges left pending for retry"
            );
        }
        Ok(outcome)
    }

    /// Retrieved memories of every enabled kind, rendered as one section.
    ///
    /// Kinds that find nothing, or fail, are left out. Returns an empty
    /// string when no kind contributed.
    pub async fn recall(&self, owner_id: &str, thread_id: Option<&str>, query: &str) -> String {
        let parts = join_all(self.strategies.iter().map(|strategy| async move {
            let kind = strategy.kind();
            let limit = strategy.config().max_results;
            match strategy.retrieve(owner_id, thread_id, Some(query), limit).await {
                Ok(records) => {
                    let formatted = strategy.format(&records);
                    (!formatted.is_empty())
                        .then(|| format!("### {} MEMORIES\n{formatted}", kind.label()))
                }
                Err(e) => {
                    warn!(owner_id, kind = %kind, error = %e, "memory retrieval failed");
                    None
                }
            }
        }))
        .await;

        let parts: Vec<String> = parts.into_iter().flatten().collect();
        if parts.is_empty() {
            debug!(owner_id, "no relevant memories found");
            return String::new();
        }

        let mut sections = vec![
            RECALL_HEADER.to_string(),
            RECALL_PREAMBLE.to_string(),
            String::new(),
        ];
        sections.extend(parts);
        sections.join("\n\n")
    }
}

/// One conversation's memory: the surface the surrounding agent calls.
pub struct MemorySession {
    manager: Arc<SessionManager>,
    exchange_log: Arc<dyn ExchangeLogAdapter>,
    scheduler: ConsolidationScheduler,
}

impl MemorySession {
    pub fn new(config: SessionConfig, deps: MemoryDeps) -> Self {
        let exchange_log = deps.exchange_log.clone();
        Self {
            manager: Arc::new(SessionManager::new(config, &deps)),
            exchange_log,
            scheduler: ConsolidationScheduler::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        self.manager.config()
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Logs a completed exchange and schedules per-turn consolidation.
    ///
    /// Returns once both messages are in the log; consolidation runs in the
    /// background and its failures are only logged.
    pub async fn on_turn_complete(
        &self,
        user_msg: &str,
        assistant_msg: &str,
    ) -> Result<(), MnemoError> {
        let config = self.manager.config();
        let thread_id = config.thread_id.clone();
        self.exchange_log
            .append(&thread_id, Role::User, user_msg)
            .await?;
        self.exchange_log
            .append(&thread_id, Role::Assistant, assistant_msg)
            .await?;

        let manager = self.manager.clone();
        let owner_id = config.owner_id.clone();
        let run_thread = thread_id.clone();
        self.scheduler.schedule(thread_id, async move {
            manager
                .maybe_consolidate(&owner_id, &run_thread, FlushTrigger::TurnComplete)
                .await
        });
        Ok(())
    }

    /// Flushes every outstanding exchange, including a trailing unanswered
    /// user message. Background runs still in flight are awaited first.
    pub async fn on_conversation_end(&self) -> Result<ConsolidationOutcome, MnemoError> {
        self.scheduler.wait_idle().await;
        let config = self.manager.config();
        self.manager
            .maybe_consolidate(
                &config.owner_id,
                &config.thread_id,
                FlushTrigger::EndOfConversation,
            )
            .await
    }

    /// Memory context for `query`. `thread_id = None` searches all of the
    /// owner's threads. Never fails; retrieval errors yield less context.
    pub async fn retrieve_context(&self, query: &str, thread_id: Option<&str>) -> String {
        self.manager
            .recall(&self.manager.config().owner_id, thread_id, query)
            .await
    }

    /// The last `window_size` messages of the thread, oldest first.
    pub async fn recent_exchanges(&self) -> Result<Vec<ExchangeMessage>, MnemoError> {
        let config = self.manager.config();
        let limit = match config.window_size {
            WindowSize::Bounded(n) => Some(n),
            WindowSize::Unbounded => None,
        };
        self.exchange_log.list_recent(&config.thread_id, limit).await
    }

    /// Waits for background consolidation scheduled so far.
    pub async fn flush_pending(&self) {
        self.scheduler.wait_idle().await;
    }

    /// Waits up to `timeout` for background consolidation; see
    /// [`ConsolidationScheduler::shutdown`].
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.scheduler.shutdown(timeout).await
    }
}
