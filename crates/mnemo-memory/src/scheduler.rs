// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detached background consolidation.
//!
//! Per-turn consolidation runs off the reply path: [`ConsolidationScheduler`]
//! spawns it onto the tokio runtime and tracks it, but nobody awaits its
//! result. Failures are logged and otherwise invisible to the caller.
//!
//! Delivery is at-least-once. A run only marks its messages consolidated
//! after every strategy succeeded, so a failed run, or one dropped because
//! the process exited before [`ConsolidationScheduler::shutdown`] returned,
//! leaves its messages unconsolidated and the next trigger on that thread
//! flushes them again. Kinds that had already written before the loss may
//! then store duplicates.

use std::future::Future;
use std::time::Duration;

use mnemo_core::MnemoError;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, warn};

use crate::session::ConsolidationOutcome;

#[derive(Debug, Default)]
pub struct ConsolidationScheduler {
    tracker: TaskTracker,
}

impl ConsolidationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `run` in the background, inside the caller's span. Must be
    /// called within a tokio runtime.
    pub fn schedule<F>(&self, thread_id: String, run: F)
    where
        F: Future<Output = Result<ConsolidationOutcome, MnemoError>> + Send + 'static,
    {
        let task = async move {
            match run.await {
                Ok(outcome) if outcome.flushed_ids.is_empty() => {
                    debug!(thread_id = %thread_id, "no flush due");
                }
                Ok(outcome) => {
                    debug!(
                        thread_id = %thread_id,
                        flushed = outcome.flushed_ids.len(),
                        marked = outcome.marked,
                        failed = outcome.failed.len(),
                        "background consolidation finished"
                    );
                }
                Err(e) => {
                    warn!(thread_id = %thread_id, error = %e, "background consolidation failed");
                }
            }
        };
        self.tracker.spawn(task.in_current_span());
    }

    /// Number of consolidation runs still in flight.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits for every run scheduled so far. New runs may be scheduled afterwards.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Waits up to `timeout` for in-flight runs. Returns `false` when runs
    /// were still pending at the deadline; those are abandoned once the
    /// runtime stops.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending == 0 {
            return true;
        }
        info!(pending, "waiting for background consolidation");
        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    pending = self.tracker.len(),
                    "shutdown timed out; unmarked messages will be re-flushed next run"
                );
                false
            }
        }
    }
}
