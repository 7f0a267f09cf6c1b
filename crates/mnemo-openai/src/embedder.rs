// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding Oracle over the `/embeddings` endpoint.

use async_trait::async_trait;
use mnemo_config::model::MnemoConfig;
use mnemo_core::types::{EmbeddingInput, EmbeddingOutput};
use mnemo_core::{AdapterType, EmbeddingAdapter, HealthStatus, MnemoError, PluginAdapter};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::EmbeddingRequest;

/// Remote embedding adapter producing fixed-dimension vectors.
///
/// Every returned vector is checked against the configured dimension
/// count; a mismatch is reported as an embedding failure rather than
/// stored.
pub struct OpenAiEmbedder {
    client: OpenAiClient,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &MnemoConfig) -> Result<Self, MnemoError> {
        let client = crate::client_from_config(config)?;
        info!(
            model = config.memory.embedding_model,
            dimensions = config.memory.embedding_dimensions,
            "OpenAI embedder initialized"
        );
        Ok(Self::with_client(
            client,
            config.memory.embedding_model.clone(),
            config.memory.embedding_dimensions,
        ))
    }

    pub fn with_client(client: OpenAiClient, model: String, dimensions: usize) -> Self {
        Self {
            client,
            model,
            dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Only the `text-embedding-3` family accepts a `dimensions` parameter.
    fn requested_dimensions(&self) -> Option<usize> {
        self.model
            .starts_with("text-embedding-3")
            .then_some(self.dimensions)
    }
}

#[async_trait]
impl PluginAdapter for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai-embedding"
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
impl EmbeddingAdapter for OpenAiEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MnemoError> {
        if input.texts.is_empty() {
            return Ok(EmbeddingOutput {
                embeddings: Vec::new(),
                dimensions: self.dimensions,
            });
        }

        let expected = input.texts.len();
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: input.texts,
            dimensions: self.requested_dimensions(),
        };
        let mut response = self
            .client
            .embeddings(&request)
            .await
            .map_err(|e| MnemoError::Embedding {
                message: e.to_string(),
                source: Some(Box::new(e)),
            })?;

        if response.data.len() != expected {
            return Err(MnemoError::embedding(format!(
                "expected {expected} embeddings, got {}",
                response.data.len()
            )));
        }

        // Servers may return items out of order.
        response.data.sort_by_key(|d| d.index);

        let mut embeddings = Vec::with_capacity(expected);
        for item in response.data {
            if item.embedding.len() != self.dimensions {
                return Err(MnemoError::embedding(format!(
                    "embedding {} has {} dimensions, expected {}",
                    item.index,
                    item.embedding.len(),
                    self.dimensions
                )));
            }
            embeddings.push(item.embedding);
        }

        debug!(count = embeddings.len(), model = %self.model, "embedded texts");
        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dimensions,
        })
    }
}
