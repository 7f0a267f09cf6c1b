// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as threshold ranges and duplicate strategy kinds.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::MnemoConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MnemoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of: {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let memory = &config.memory;

    for (key, value) in [
        ("summary_threshold", memory.summary_threshold),
        ("semantic_threshold", memory.semantic_threshold),
        ("user_preference_threshold", memory.user_preference_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("memory.{key} must be between 0.0 and 1.0, got {value}"),
            });
        }
    }

    if memory.max_memories == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.max_memories must be at least 1".to_string(),
        });
    }

    if memory.embedding_dimensions == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.embedding_dimensions must be at least 1".to_string(),
        });
    }

    if memory.extraction_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.extraction_model must not be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for kind in &memory.strategies {
        if !seen.insert(kind) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate strategy `{kind}` in memory.strategies"),
            });
        }
    }

    if config.provider.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "provider.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
