// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term conversational memory for the Mnemo engine.
//!
//! Exchanges accumulate in the Exchange Log until the windower decides a
//! flush is due. Each enabled strategy then asks the Extraction Oracle how
//! the flushed messages change its kind of memory, embeds the result, and
//! writes it to the Memory Store. Retrieval embeds the query and returns
//! each kind's records above its relevance threshold.
//!
//! ## Architecture
//!
//! - **Windower**: pairs exchanges and picks the flush set per trigger
//! - **MemoryStrategy**: summary, semantic and user-preference consolidation
//! - **LlmExtractionOracle**: prompt construction and reply parsing over a provider
//! - **SessionManager**: fan-out of consolidation and recall across strategies
//! - **ConsolidationScheduler**: background per-turn consolidation
//! - **MemorySession**: the per-conversation caller surface

pub mod extractor;
pub mod namespace;
pub mod prompts;
pub mod scheduler;
pub mod session;
pub mod strategy;
pub mod windower;

pub use extractor::LlmExtractionOracle;
pub use namespace::namespace_for;
pub use scheduler::ConsolidationScheduler;
pub use session::{ConsolidationOutcome, MemoryDeps, MemorySession, SessionManager};
pub use strategy::{AppliedOperation, MemoryStrategy, build_strategies};
pub use windower::{FlushTrigger, flush_set, pair_exchanges};
