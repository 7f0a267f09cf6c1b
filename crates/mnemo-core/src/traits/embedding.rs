// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait (the Embedding Oracle).

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for turning text into fixed-dimension vectors.
///
/// Implementations must be stateless from the engine's point of view and
/// return exactly one vector per input text, all of the store's configured width.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates embeddings for the given input.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MnemoError>;
}
