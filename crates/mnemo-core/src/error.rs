// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mnemo memory engine.

use thiserror::Error;

/// The primary error type used across all Mnemo adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MnemoError {
    /// Configuration errors (invalid TOML, out-of-range values, bad headers).
    #[error("configuration error: {0}")]
    Config(String),

    /// Memory Store or Exchange Log errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The Extraction Oracle failed or returned output that could not be used.
    #[error("extraction error: {message}")]
    Extraction {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The Embedding Oracle failed or returned vectors of the wrong shape.
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// LLM provider errors (HTTP failure, non-success status, empty completion).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MnemoError {
    /// Shorthand for an extraction failure without an underlying source.
    pub fn extraction(message: impl Into<String>) -> Self {
        MnemoError::Extraction {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for an embedding failure without an underlying source.
    pub fn embedding(message: impl Into<String>) -> Self {
        MnemoError::Embedding {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the failure came from one of the oracles
    /// (extraction, embedding, or the LLM provider behind them) rather than
    /// from storage.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            MnemoError::Extraction { .. } | MnemoError::Embedding { .. } | MnemoError::Provider { .. }
        )
    }
}
