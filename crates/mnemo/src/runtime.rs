// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter wiring shared by the subcommands.

use std::sync::Arc;

use mnemo_config::{MnemoConfig, SessionConfig};
use mnemo_core::{MnemoError, ProviderAdapter};
use mnemo_memory::{ConsolidationOutcome, LlmExtractionOracle, MemoryDeps, MemorySession};
use mnemo_openai::{OpenAiEmbedder, OpenAiProvider};
use mnemo_storage::SqliteStorage;
use tracing::debug;

/// Opens storage and the oracles, returning a session for one conversation.
pub async fn open_session(
    config: &MnemoConfig,
    owner_id: &str,
    thread_id: &str,
) -> Result<MemorySession, MnemoError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    let provider: Arc<dyn ProviderAdapter> = Arc::new(OpenAiProvider::new(config)?);
    let embedder = Arc::new(OpenAiEmbedder::new(config)?);
    let oracle = Arc::new(LlmExtractionOracle::new(provider));

    let session_config = SessionConfig::new(&config.memory, owner_id, thread_id);
    debug!(
        owner_id,
        thread_id,
        strategies = session_config.strategies.len(),
        "memory session opened"
    );

    Ok(MemorySession::new(
        session_config,
        MemoryDeps {
            exchange_log: storage.clone(),
            store: storage,
            embedder,
            oracle,
        },
    ))
}

/// One-line report of a consolidation attempt.
pub fn describe_outcome(outcome: &ConsolidationOutcome) -> String {
    if outcome.flushed_ids.is_empty() {
        return "nothing to consolidate".to_string();
    }
    let applied: usize = outcome.applied.values().map(Vec::len).sum();
    let mut line = format!(
        "flushed {} message(s), applied {applied} memory operation(s)",
        outcome.flushed_ids.len()
    );
    if !outcome.failed.is_empty() {
        let failed: Vec<String> = outcome.failed.iter().map(ToString::to_string).collect();
        line.push_str(&format!(
            "; failed: {}; exchanges left pending",
            failed.join(", ")
        ));
    }
    line
}

/// The effective configuration as TOML, with the API key redacted.
pub fn render_config(config: &MnemoConfig) -> Result<String, MnemoError> {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("<redacted>".to_string());
    }
    toml::to_string_pretty(&shown).map_err(|e| MnemoError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::{MemoryAction, MemoryKind};
    use mnemo_memory::AppliedOperation;

    #[test]
    fn describe_reports_failures() {
        assert_eq!(
            describe_outcome(&ConsolidationOutcome::default()),
            "nothing to consolidate"
        );

        let mut outcome = ConsolidationOutcome {
            flushed_ids: vec![1, 2, 3],
            ..Default::default()
        };
        outcome.applied.insert(
            MemoryKind::Semantic,
            vec![AppliedOperation {
                action: MemoryAction::Add,
                record_id: "m-1".into(),
                content: "Title: Tea".into(),
            }],
        );
        outcome.failed.push(MemoryKind::UserPreference);
        assert_eq!(
            describe_outcome(&outcome),
            "flushed 3 message(s), applied 1 memory operation(s); failed: user_preference; exchanges left pending"
        );
    }

    #[test]
    fn rendered_config_hides_api_key() {
        let mut config = MnemoConfig::default();
        config.provider.api_key = Some("sk-secret".into());
        let text = render_config(&config).unwrap();
        assert!(!text.contains("sk-secret"));
        assert!(text.contains("<redacted>"));
        assert!(text.contains("[memory]"));
    }

    #[tokio::test]
    async fn session_opens_against_temp_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = MnemoConfig::default();
        config.storage.database_path = dir.path().join("mnemo.db").to_string_lossy().into_owned();
        config.provider.api_key = Some("sk-test".into());

        let session = open_session(&config, "alice", "t-1").await.unwrap();
        assert_eq!(session.config().owner_id, "alice");
        assert!(session.recent_exchanges().await.unwrap().is_empty());
    }
}
