// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators of the memory engine.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod embedding;
pub mod exchange_log;
pub mod extraction;
pub mod memory_store;
pub mod provider;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use exchange_log::ExchangeLogAdapter;
pub use extraction::ExtractionAdapter;
pub use memory_store::MemoryStoreAdapter;
pub use provider::ProviderAdapter;
