// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic embedding adapter for tests.
//!
//! Each vector component counts the occurrences of one vocabulary word in
//! the text (case-insensitive, split on non-alphanumerics), so similarity
//! between two texts is predictable from the words they share. Texts that
//! contain no vocabulary word embed to the zero vector, which the store
//! treats as incomparable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use mnemo_core::types::{EmbeddingInput, EmbeddingOutput};
use mnemo_core::{AdapterType, EmbeddingAdapter, HealthStatus, MnemoError, PluginAdapter};

pub struct MockEmbedder {
    vocabulary: Vec<String>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Self {
        Self {
            vocabulary: vocabulary
                .iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `embed` call fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `embed` calls so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    /// The vector `embed` would return for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        self.vocabulary
            .iter()
            .map(|word| tokens.iter().filter(|t| **t == word.as_str()).count() as f32)
            .collect()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(&[
            "tea", "coffee", "dog", "cat", "rust", "python", "hiking", "travel",
        ])
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MnemoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(MnemoError::embedding("mock embedder configured to fail"));
        }
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| self.vector_for(t)).collect(),
            dimensions: self.dimensions(),
        })
    }
}
