// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end memory engine tests.
//!
//! `TestHarness` assembles a temp SQLite database serving both the Exchange
//! Log and the Memory Store, plus the mock oracles, so tests can drive the
//! full consolidation pipeline without external services.

use std::sync::Arc;

use mnemo_config::model::{MnemoConfig, StorageConfig};
use mnemo_core::MnemoError;
use mnemo_storage::SqliteStorage;

use crate::mock_embedder::MockEmbedder;
use crate::mock_extraction::MockExtractionOracle;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: MnemoConfig,
    vocabulary: Option<Vec<String>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: MnemoConfig::default(),
            vocabulary: None,
        }
    }

    /// Start from a specific configuration. The storage path is always
    /// replaced by one inside the harness temp directory.
    pub fn with_config(mut self, config: MnemoConfig) -> Self {
        self.config = config;
        self
    }

    /// Vocabulary for the mock embedder.
    pub fn with_vocabulary<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.vocabulary = Some(words.iter().map(|w| w.as_ref().to_string()).collect());
        self
    }

    pub async fn build(self) -> Result<TestHarness, MnemoError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| MnemoError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;

        let embedder = match self.vocabulary {
            Some(words) => MockEmbedder::new(&words),
            None => MockEmbedder::default(),
        };

        Ok(TestHarness {
            storage: Arc::new(storage),
            embedder: Arc::new(embedder),
            oracle: Arc::new(MockExtractionOracle::new()),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock oracles and temp storage.
pub struct TestHarness {
    /// SQLite Exchange Log and Memory Store (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    pub embedder: Arc<MockEmbedder>,
    pub oracle: Arc<MockExtractionOracle>,
    pub config: MnemoConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default configuration and vocabulary.
    pub async fn new() -> Result<Self, MnemoError> {
        Self::builder().build().await
    }
}
