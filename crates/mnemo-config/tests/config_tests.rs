// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Mnemo configuration system.

use mnemo_config::diagnostic::ConfigError;
use mnemo_config::model::MnemoConfig;
use mnemo_config::{SessionConfig, load_and_validate_str, load_config_from_str};
use mnemo_core::{MemoryKind, WindowSize};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_mnemo_config() {
    let toml = r#"
[agent]
log_level = "debug"

[storage]
database_path = "/tmp/mnemo-test.db"
wal_mode = false

[memory]
strategies = ["summary", "user_preference"]
max_memories = 8
window_size = 4
extraction_model = "gpt-4.1-mini"
embedding_model = "text-embedding-3-large"
embedding_dimensions = 3072
summary_threshold = 0.5
semantic_threshold = 0.25
user_preference_threshold = 0.15

[provider]
base_url = "http://localhost:8080/v1"
api_key = "sk-local"
timeout_secs = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/mnemo-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(
        config.memory.strategies,
        vec![MemoryKind::Summary, MemoryKind::UserPreference]
    );
    assert_eq!(config.memory.max_memories, 8);
    assert_eq!(config.memory.window_size, WindowSize::Bounded(4));
    assert_eq!(config.memory.extraction_model, "gpt-4.1-mini");
    assert_eq!(config.memory.embedding_dimensions, 3072);
    assert_eq!(config.memory.summary_threshold, 0.5);
    assert_eq!(config.provider.base_url, "http://localhost:8080/v1");
    assert_eq!(config.provider.api_key.as_deref(), Some("sk-local"));
    assert_eq!(config.provider.timeout_secs, 10);
}

/// Empty TOML produces the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.memory.strategies, MemoryKind::ALL.to_vec());
    assert_eq!(config.memory.max_memories, 5);
    assert_eq!(config.memory.window_size, WindowSize::Bounded(2));
    assert_eq!(config.memory.summary_threshold, 0.3);
    assert_eq!(config.memory.semantic_threshold, 0.2);
    assert_eq!(config.memory.user_preference_threshold, 0.1);
    assert!(config.provider.api_key.is_none());
}

#[test]
fn window_size_all_is_unbounded() {
    let config = load_config_from_str("[memory]\nwindow_size = \"all\"\n").unwrap();
    assert_eq!(config.memory.window_size, WindowSize::Unbounded);
}

#[test]
fn window_size_zero_is_rejected() {
    let errors = load_and_validate_str("[memory]\nwindow_size = 0\n")
        .expect_err("zero window should be rejected");
    assert!(!errors.is_empty());
}

/// Unknown field in [memory] produces a diagnostic with a suggestion.
#[test]
fn unknown_memory_key_suggests_correction() {
    let toml = r#"
[memory]
windw_size = 4
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "windw_size");
            assert_eq!(suggestion.as_deref(), Some("window_size"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let err = load_config_from_str("[telemetry]\nenabled = true\n")
        .expect_err("unknown section should be rejected");
    assert!(format!("{err}").contains("telemetry"));
}

#[test]
fn unknown_strategy_kind_is_rejected() {
    let errors = load_and_validate_str("[memory]\nstrategies = [\"episodic\"]\n")
        .expect_err("unknown kind should be rejected");
    assert!(!errors.is_empty());
}

#[test]
fn threshold_out_of_range_fails_validation() {
    let errors = load_and_validate_str("[memory]\nsemantic_threshold = 1.2\n")
        .expect_err("threshold above 1.0 should fail");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
    assert!(errors[0].to_string().contains("semantic_threshold"));
}

#[test]
fn session_config_follows_memory_section() {
    let config = load_and_validate_str(
        "[memory]\nstrategies = [\"semantic\"]\nmax_memories = 3\nsemantic_threshold = 0.6\n",
    )
    .unwrap();
    let session = SessionConfig::new(&config.memory, "bob", "thread-9");
    assert_eq!(session.owner_id, "bob");
    assert_eq!(session.thread_id, "thread-9");
    assert_eq!(session.strategies.len(), 1);
    let semantic = &session.strategies[0];
    assert_eq!(semantic.kind, MemoryKind::Semantic);
    assert_eq!(semantic.max_results, 3);
    assert!((semantic.relevance_threshold - 0.6).abs() < 1e-6);
}

#[test]
fn default_config_serializes_back_to_toml() {
    let rendered = toml::to_string(&MnemoConfig::default()).expect("defaults serialize");
    assert!(rendered.contains("window_size = 2"));
    let reparsed = load_config_from_str(&rendered).expect("rendered config reloads");
    assert_eq!(reparsed.memory.window_size, WindowSize::Bounded(2));
}
