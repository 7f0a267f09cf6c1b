// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed Extraction Oracle.
//!
//! Sends the kind's consolidation prompt to a [`ProviderAdapter`] and parses
//! the reply into [`MemoryOperation`]s. Malformed replies are extraction
//! failures, never an empty result.

use std::sync::Arc;

use async_trait::async_trait;
use mnemo_core::types::{ExtractionRequest, ProviderRequest};
use mnemo_core::{
    AdapterType, ExtractionAdapter, HealthStatus, MemoryOperation, MnemoError, PluginAdapter,
    ProviderAdapter,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::prompts;

/// Completion budget for one extraction call.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Field names some prompts use for the update target.
const TARGET_ALIASES: [&str; 4] = [
    "target_chunk_id",
    "target_semantic_id",
    "target_preference_id",
    "update_id",
];

/// Extraction Oracle backed by an LLM provider.
pub struct LlmExtractionOracle {
    provider: Arc<dyn ProviderAdapter>,
    max_tokens: u32,
}

impl LlmExtractionOracle {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            provider,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl PluginAdapter for LlmExtractionOracle {
    fn name(&self) -> &str {
        "llm-extraction"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Extraction
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        self.provider.health_check().await
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl ExtractionAdapter for LlmExtractionOracle {
    async fn extract(&self, request: ExtractionRequest) -> Result<Vec<MemoryOperation>, MnemoError> {
        let prompt = prompts::build_prompt(&request.messages, &request.existing);
        let provider_request = ProviderRequest {
            model: request.model,
            system_prompt: Some(prompts::system_prompt(request.kind).to_string()),
            prompt,
            max_tokens: self.max_tokens,
            json_mode: true,
        };

        let response = self.provider.complete(provider_request).await?;
        let operations = parse_operations(&response.content)?;
        debug!(
            kind = %request.kind,
            model = %response.model,
            operations = operations.len(),
            "extraction oracle replied"
        );
        Ok(operations)
    }
}

/// Parse an LLM reply into operations.
///
/// Accepts a bare array, an object wrapping the array under `operations` or
/// `memories`, or a single operation object. Markdown code fences and
/// surrounding prose are ignored.
pub fn parse_operations(response: &str) -> Result<Vec<MemoryOperation>, MnemoError> {
    let json = extract_json(response).ok_or_else(|| {
        debug!(raw = %response, "no JSON in extraction reply");
        MnemoError::extraction("extraction reply contains no JSON")
    })?;

    let value: Value = serde_json::from_str(json).map_err(|e| MnemoError::Extraction {
        message: format!("extraction reply is not valid JSON: {e}"),
        source: Some(Box::new(e)),
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => unwrap_envelope(obj)?,
        _ => {
            return Err(MnemoError::extraction(
                "extraction reply is not a JSON list or object",
            ));
        }
    };

    items.into_iter().map(parse_operation).collect()
}

/// Operations list out of `{"operations": [...]}` or `{"memories": [...]}`,
/// or the object itself when it is a single operation.
fn unwrap_envelope(mut obj: Map<String, Value>) -> Result<Vec<Value>, MnemoError> {
    let list = match obj.remove("operations") {
        Some(list) => Some(list),
        None => obj.remove("memories"),
    };
    match list {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) => Ok(Vec::new()),
        Some(_) => Err(MnemoError::extraction(
            "extraction reply has a non-list operations field",
        )),
        None if obj.contains_key("action") => Ok(vec![Value::Object(obj)]),
        None => Err(MnemoError::extraction(
            "extraction reply has no operations list",
        )),
    }
}

fn parse_operation(item: Value) -> Result<MemoryOperation, MnemoError> {
    let Value::Object(mut obj) = item else {
        return Err(MnemoError::extraction("extraction operation is not a JSON object"));
    };

    // Fold kind-specific target field names into `target_id`.
    for alias in TARGET_ALIASES {
        if let Some(value) = obj.remove(alias) {
            let missing = obj.get("target_id").is_none_or(Value::is_null);
            if missing && !value.is_null() {
                obj.insert("target_id".into(), value);
            }
        }
    }
    if obj.get("target_id").is_some_and(Value::is_null) {
        obj.remove("target_id");
    }

    if let Some(Value::String(action)) = obj.get_mut("action") {
        *action = normalize_action(action);
    }

    serde_json::from_value(Value::Object(obj)).map_err(|e| MnemoError::Extraction {
        message: format!("malformed extraction operation: {e}"),
        source: Some(Box::new(e)),
    })
}

/// `"ADD"`, `"Add"` and `"AddMemory"` all mean `add`.
fn normalize_action(action: &str) -> String {
    let lower = action.trim().to_ascii_lowercase();
    lower
        .strip_suffix("memory")
        .map(str::to_string)
        .unwrap_or(lower)
}

/// Slice out the outermost JSON array or object.
fn extract_json(response: &str) -> Option<&str> {
    let start = response.find(['[', '{'])?;
    let close = if response[start..].starts_with('[') { ']' } else { '}' };
    let end = response.rfind(close)?;
    (end > start).then(|| &response[start..=end])
}
