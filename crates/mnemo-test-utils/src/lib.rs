// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mnemo integration tests.
//!
//! Provides mock oracles and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockEmbedder`] - Vocabulary-count embeddings with a failure toggle
//! - [`MockExtractionOracle`] - Scripted per-kind consolidation operations
//! - [`MockProvider`] - Mock LLM provider with pre-configured responses
//! - [`TestHarness`] - Temp SQLite database wired to the mocks

pub mod harness;
pub mod mock_embedder;
pub mod mock_extraction;
pub mod mock_provider;

pub use harness::TestHarness;
pub use mock_embedder::MockEmbedder;
pub use mock_extraction::{MockExtractionOracle, add_op, skip_op, update_op};
pub use mock_provider::MockProvider;
