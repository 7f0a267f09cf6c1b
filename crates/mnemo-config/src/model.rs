// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo memory engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use mnemo_core::{MemoryKind, WindowSize};
use serde::{Deserialize, Serialize};

/// Top-level Mnemo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Process-level settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory engine settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// OpenAI-compatible endpoint used for extraction and embeddings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("mnemo").join("mnemo.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("mnemo.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Memory engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Memory kinds to extract and retrieve. An empty list disables extraction.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<MemoryKind>,

    /// Maximum number of records each kind contributes to retrieved context.
    #[serde(default = "default_max_memories")]
    pub max_memories: usize,

    /// Padded exchange entries kept verbatim before older ones are flushed.
    /// Either a positive integer or `"all"` to flush only at conversation end.
    #[serde(default = "default_window_size")]
    pub window_size: WindowSize,

    /// Model used by the extraction oracle.
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,

    /// Embedding model name.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Width of the embedding vectors produced by `embedding_model`.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Minimum cosine similarity for summary records (0.0-1.0).
    #[serde(default = "default_summary_threshold")]
    pub summary_threshold: f64,

    /// Minimum cosine similarity for semantic records (0.0-1.0).
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f64,

    /// Minimum cosine similarity for user preference records (0.0-1.0).
    #[serde(default = "default_user_preference_threshold")]
    pub user_preference_threshold: f64,
}

impl MemoryConfig {
    /// Relevance threshold configured for `kind`.
    pub fn threshold_for(&self, kind: MemoryKind) -> f64 {
        match kind {
            MemoryKind::Summary => self.summary_threshold,
            MemoryKind::Semantic => self.semantic_threshold,
            MemoryKind::UserPreference => self.user_preference_threshold,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            max_memories: default_max_memories(),
            window_size: default_window_size(),
            extraction_model: default_extraction_model(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: default_embedding_dimensions(),
            summary_threshold: default_summary_threshold(),
            semantic_threshold: default_semantic_threshold(),
            user_preference_threshold: default_user_preference_threshold(),
        }
    }
}

fn default_strategies() -> Vec<MemoryKind> {
    MemoryKind::ALL.to_vec()
}

fn default_max_memories() -> usize {
    5
}

fn default_window_size() -> WindowSize {
    WindowSize::Bounded(2)
}

fn default_extraction_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> usize {
    1536
}

fn default_summary_threshold() -> f64 {
    0.3
}

fn default_semantic_threshold() -> f64 {
    0.2
}

fn default_user_preference_threshold() -> f64 {
    0.1
}

/// OpenAI-compatible HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL, with or without the `/v1` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as a bearer token. Usually supplied via `MNEMO_PROVIDER_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}
