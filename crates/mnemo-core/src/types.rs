// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across Mnemo adapter traits and the memory engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Embedding,
    Extraction,
    Provider,
}

// --- Exchange log types ---

/// Author of an exchange message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a thread's exchange log.
///
/// `id` is assigned by the log and increases monotonically; it is the only
/// ordering the memory engine relies on. `consolidated` flips from false to
/// true exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeMessage {
    pub id: i64,
    pub thread_id: String,
    pub role: Role,
    pub content: String,
    pub consolidated: bool,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

// --- Memory types ---

/// The closed set of memory kinds, one strategy per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// Thread-scoped topic summaries.
    Summary,
    /// Owner-scoped durable facts.
    Semantic,
    /// Owner-scoped user preferences.
    UserPreference,
}

impl MemoryKind {
    /// Every kind, in the order strategies are instantiated by default.
    pub const ALL: [MemoryKind; 3] = [
        MemoryKind::Summary,
        MemoryKind::Semantic,
        MemoryKind::UserPreference,
    ];

    /// Upper-case label used in retrieved context headings.
    pub fn label(&self) -> &'static str {
        match self {
            MemoryKind::Summary => "SUMMARY",
            MemoryKind::Semantic => "SEMANTIC",
            MemoryKind::UserPreference => "USER_PREFERENCE",
        }
    }

    /// Whether records of this kind are grouped per thread rather than per owner.
    pub fn is_thread_scoped(&self) -> bool {
        matches!(self, MemoryKind::Summary)
    }
}

/// A persisted memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier, stable across updates.
    pub id: String,
    pub owner_id: String,
    /// Thread the record was extracted from; `None` means cross-thread.
    pub thread_id: Option<String>,
    pub kind: MemoryKind,
    /// Filter key, see `mnemo_memory::namespace`.
    pub namespace: String,
    /// Denormalized text that was embedded.
    pub content: String,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    /// Kind-specific structured fields.
    pub metadata: serde_json::Value,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// Fields rewritten in place by a consolidation `update`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryUpdate {
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
}

/// A search result, normalized at the store boundary.
///
/// `score` is the cosine similarity when the search was ranked by a query
/// embedding, and `None` for unranked listings.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    pub record: MemoryRecord,
    pub score: Option<f32>,
}

/// Filter for a Memory Store search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub owner_id: String,
    pub kind: MemoryKind,
    /// `None` searches across all of the owner's threads.
    pub thread_id: Option<String>,
    /// When present, results are ranked by cosine similarity and filtered by `threshold`.
    pub embedding: Option<Vec<f32>>,
    pub threshold: f32,
    pub limit: usize,
}

/// Consolidation decision proposed by the Extraction Oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemoryAction {
    /// Information is new; insert a record.
    Add,
    /// Information refines an existing record; rewrite it in place.
    Update,
    /// Information is redundant or irrelevant; leave the store alone.
    Skip,
}

/// A single operation returned by the Extraction Oracle.
///
/// The kind-specific fields (topic, title, preference, ...) are kept as a
/// JSON object and decoded by the strategy that owns the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryOperation {
    pub action: MemoryAction,
    /// Required iff `action` is `update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Input for one Extraction Oracle call.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub kind: MemoryKind,
    /// Extraction model identifier.
    pub model: String,
    /// Exchanges being flushed, in log order.
    pub messages: Vec<ExchangeMessage>,
    /// Existing same-kind records offered as consolidation targets.
    pub existing: Vec<MemoryRecord>,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter, one vector per input text.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

// --- Provider types ---

/// A single-prompt completion request to an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    /// Ask the provider to constrain its output to a JSON object.
    pub json_mode: bool,
}

/// A completion returned by an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub model: String,
}

// --- Windowing ---

/// Number of padded exchange entries kept verbatim as the hot window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowSizeRepr", into = "WindowSizeRepr")]
pub enum WindowSize {
    /// Flush on multiples of this many padded entries.
    Bounded(usize),
    /// Never flush per turn; only the end of the conversation flushes.
    Unbounded,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WindowSizeRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<WindowSizeRepr> for WindowSize {
    type Error = String;

    fn try_from(repr: WindowSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            WindowSizeRepr::Count(0) => Err("window_size must be at least 1".to_string()),
            WindowSizeRepr::Count(n) => Ok(WindowSize::Bounded(n)),
            WindowSizeRepr::Keyword(k) if k.eq_ignore_ascii_case("all") => {
                Ok(WindowSize::Unbounded)
            }
            WindowSizeRepr::Keyword(k) => Err(format!(
                "window_size must be a positive integer or \"all\", got \"{k}\""
            )),
        }
    }
}

impl From<WindowSize> for WindowSizeRepr {
    fn from(size: WindowSize) -> Self {
        match size {
            WindowSize::Bounded(n) => WindowSizeRepr::Count(n),
            WindowSize::Unbounded => WindowSizeRepr::Keyword("all".to_string()),
        }
    }
}
