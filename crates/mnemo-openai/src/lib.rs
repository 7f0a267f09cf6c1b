// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible adapters for the Mnemo memory engine.
//!
//! This crate implements [`mnemo_core::ProviderAdapter`] over chat
//! completions (the LLM behind the extraction oracle) and
//! [`mnemo_core::EmbeddingAdapter`] over the embeddings endpoint. Any
//! server speaking the same wire format can be targeted through
//! `provider.base_url`.

pub mod client;
pub mod embedder;
pub mod provider;
pub mod types;

use std::time::Duration;

use mnemo_config::model::MnemoConfig;
use mnemo_core::MnemoError;
use secrecy::SecretString;

pub use client::OpenAiClient;
pub use embedder::OpenAiEmbedder;
pub use provider::OpenAiProvider;

/// Builds the shared HTTP client from `[provider]` settings.
pub fn client_from_config(config: &MnemoConfig) -> Result<OpenAiClient, MnemoError> {
    let api_key = resolve_api_key(&config.provider.api_key)?;
    OpenAiClient::new(
        &api_key,
        &config.provider.base_url,
        Duration::from_secs(config.provider.timeout_secs),
    )
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, MnemoError> {
    match config_key {
        Some(key) if !key.is_empty() => Ok(SecretString::from(key.clone())),
        _ => std::env::var("OPENAI_API_KEY")
            .map(SecretString::from)
            .map_err(|_| {
                MnemoError::Config(
                    "OpenAI API key not found. Set provider.api_key in config or OPENAI_API_KEY environment variable.".into(),
                )
            }),
    }
}
