// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat completion provider backing the LLM extraction oracle.

use async_trait::async_trait;
use mnemo_config::model::MnemoConfig;
use mnemo_core::types::{ProviderRequest, ProviderResponse};
use mnemo_core::{AdapterType, HealthStatus, MnemoError, PluginAdapter, ProviderAdapter};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest, ResponseFormat};

/// OpenAI-compatible provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    pub fn new(config: &MnemoConfig) -> Result<Self, MnemoError> {
        let client = crate::client_from_config(config)?;
        info!(
            base_url = client.base_url(),
            model = config.memory.extraction_model,
            "OpenAI provider initialized"
        );
        Ok(Self { client })
    }

    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }

    fn to_chat_request(request: &ProviderRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system".into(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".into(),
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then(ResponseFormat::json_object),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        // No probe request; completions cost tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MnemoError> {
        let chat = Self::to_chat_request(&request);
        let response = self.client.chat(&chat).await?;

        let choice = response.choices.into_iter().next();
        if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            debug!(finish_reason = reason, "completion finished");
        }
        let content = choice
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MnemoError::Provider {
                message: "completion returned no content".into(),
                source: None,
            })?;

        let model = if response.model.is_empty() {
            request.model
        } else {
            response.model
        };
        Ok(ProviderResponse { content, model })
    }
}
