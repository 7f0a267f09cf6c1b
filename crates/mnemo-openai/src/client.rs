// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible APIs.
//!
//! Provides [`OpenAiClient`] which handles bearer authentication, JSON
//! request/response handling, and a single retry on transient errors.

use std::time::Duration;

use mnemo_core::MnemoError;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse,
};

/// HTTP client shared by the completion and embedding adapters.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// `base_url` may be given with or without the trailing `/v1`.
    pub fn new(
        api_key: &SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MnemoError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| MnemoError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MnemoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            max_retries: 1,
        })
    }

    /// The normalized API root, always ending in `/v1`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /chat/completions`
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, MnemoError> {
        self.post_json("chat/completions", request).await
    }

    /// `POST /embeddings`
    pub async fn embeddings(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse, MnemoError> {
        self.post_json("embeddings", request).await
    }

    /// Sends a JSON request and decodes the JSON response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    async fn post_json<Req, Resp>(&self, endpoint: &str, body: &Req) -> Result<Resp, MnemoError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| MnemoError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint, "response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| MnemoError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&text).map_err(|e| MnemoError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let text = response.text().await.unwrap_or_default();

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(MnemoError::Provider {
                    message: format!("API returned {status}: {text}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_err) => format!(
                    "API error {status} ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {text}"),
            };
            return Err(MnemoError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| MnemoError::Provider {
            message: format!("{endpoint} request failed after retries"),
            source: None,
        }))
    }
}

/// Strips trailing slashes and appends `/v1` when missing.
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}
