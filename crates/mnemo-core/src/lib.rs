// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemo memory engine.
//!
//! This crate provides the error type, the domain types shared by every
//! component (exchange messages, memory records, consolidation operations),
//! and the adapter traits that the external collaborators implement: the
//! Exchange Log, the Memory Store, the Extraction Oracle, the Embedding
//! Oracle, and the LLM provider behind the extraction oracle.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MnemoError;
pub use types::{
    AdapterType, ExchangeMessage, HealthStatus, MemoryAction, MemoryKind, MemoryOperation,
    MemoryRecord, RankedRecord, Role, WindowSize,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    EmbeddingAdapter, ExchangeLogAdapter, ExtractionAdapter, MemoryStoreAdapter, PluginAdapter,
    ProviderAdapter,
};
