// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation configuration derived from [`MemoryConfig`].

use mnemo_core::{MemoryKind, WindowSize};

use crate::model::MemoryConfig;

/// Immutable settings for one memory kind within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub kind: MemoryKind,
    /// Minimum cosine similarity for a record to be retrieved.
    pub relevance_threshold: f32,
    /// Upper bound on records returned by one retrieval.
    pub max_results: usize,
    pub window_size: WindowSize,
    pub embedding_model: String,
}

/// Immutable settings for one conversation, built once and shared by every
/// component of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub owner_id: String,
    pub thread_id: String,
    pub extraction_model: String,
    pub max_memories: usize,
    pub window_size: WindowSize,
    /// Enabled kinds, in configuration order.
    pub strategies: Vec<StrategyConfig>,
}

impl SessionConfig {
    pub fn new(
        memory: &MemoryConfig,
        owner_id: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Self {
        let strategies = memory
            .strategies
            .iter()
            .map(|&kind| StrategyConfig {
                kind,
                relevance_threshold: memory.threshold_for(kind) as f32,
                max_results: memory.max_memories,
                window_size: memory.window_size,
                embedding_model: memory.embedding_model.clone(),
            })
            .collect();

        Self {
            owner_id: owner_id.into(),
            thread_id: thread_id.into(),
            extraction_model: memory.extraction_model.clone(),
            max_memories: memory.max_memories,
            window_size: memory.window_size,
            strategies,
        }
    }

    /// Settings for `kind`, if that kind is enabled.
    pub fn strategy(&self, kind: MemoryKind) -> Option<&StrategyConfig> {
        self.strategies.iter().find(|s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_gets_its_own_threshold() {
        let session = SessionConfig::new(&MemoryConfig::default(), "alice", "t-1");
        assert_eq!(session.strategies.len(), 3);
        let summary = session.strategy(MemoryKind::Summary).unwrap();
        let semantic = session.strategy(MemoryKind::Semantic).unwrap();
        let pref = session.strategy(MemoryKind::UserPreference).unwrap();
        assert!((summary.relevance_threshold - 0.3).abs() < 1e-6);
        assert!((semantic.relevance_threshold - 0.2).abs() < 1e-6);
        assert!((pref.relevance_threshold - 0.1).abs() < 1e-6);
        assert_eq!(summary.max_results, 5);
    }

    #[test]
    fn disabled_kinds_are_absent() {
        let memory = MemoryConfig {
            strategies: vec![MemoryKind::UserPreference],
            window_size: WindowSize::Unbounded,
            ..MemoryConfig::default()
        };
        let session = SessionConfig::new(&memory, "alice", "t-1");
        assert!(session.strategy(MemoryKind::Summary).is_none());
        assert_eq!(session.strategies[0].window_size, WindowSize::Unbounded);
        assert_eq!(session.window_size, WindowSize::Unbounded);
    }
}
