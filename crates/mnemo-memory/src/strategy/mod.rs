// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-kind extraction, consolidation, retrieval and formatting.
//!
//! [`MemoryStrategy`] is the capability set the session manager drives.
//! The three kinds share one implementation, [`Strategy`], and differ only
//! in their [`KindProfile`]: the oracle fields they accept, how those render
//! to embeddable text, how many existing records are offered as
//! consolidation context, and how retrieved records are labeled.

pub mod semantic;
pub mod summary;
pub mod user_preference;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mnemo_config::{SessionConfig, StrategyConfig};
use mnemo_core::types::{EmbeddingInput, ExtractionRequest, MemoryUpdate, SearchQuery};
use mnemo_core::{
    EmbeddingAdapter, ExchangeMessage, ExtractionAdapter, MemoryAction, MemoryKind,
    MemoryOperation, MemoryRecord, MemoryStoreAdapter, MnemoError, RankedRecord,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::namespace::namespace_for;

pub use semantic::{SemanticFields, SemanticProfile, SemanticStrategy};
pub use summary::{SummaryFields, SummaryProfile, SummaryStrategy};
pub use user_preference::{PreferenceFields, UserPreferenceProfile, UserPreferenceStrategy};

/// A store write performed during consolidation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedOperation {
    /// `add` or `update`; skips are never applied.
    pub action: MemoryAction,
    pub record_id: String,
    /// Rendered text that was embedded and stored.
    pub content: String,
}

#[async_trait]
pub trait MemoryStrategy: Send + Sync {
    fn kind(&self) -> MemoryKind;

    fn config(&self) -> &StrategyConfig;

    /// Extract from `messages` and write the resulting operations.
    ///
    /// No-op on empty input. Oracle failures and malformed operations abandon
    /// the whole batch before anything is written.
    async fn extract_and_consolidate(
        &self,
        owner_id: &str,
        thread_id: &str,
        messages: &[ExchangeMessage],
        model: &str,
    ) -> Result<Vec<AppliedOperation>, MnemoError>;

    /// Records of this kind for `owner_id`, ranked by similarity to `query`
    /// when one is given. `thread_id = None` searches every thread.
    async fn retrieve(
        &self,
        owner_id: &str,
        thread_id: Option<&str>,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, MnemoError>;

    /// Labeled text block for `records`; empty when there are none.
    fn format(&self, records: &[RankedRecord]) -> String;
}

/// Kind-specific behaviour plugged into [`Strategy`].
pub trait KindProfile: Send + Sync + 'static {
    const KIND: MemoryKind;
    /// Existing records offered to the oracle as consolidation targets.
    const CONTEXT_LIMIT: usize;
    const HEADING: &'static str;
    const ITEM_LABEL: &'static str;

    /// Oracle fields for this kind, stored as the record's metadata.
    type Fields: Serialize + DeserializeOwned + Send;

    /// Text that is embedded and stored as the record's content.
    fn render(fields: &Self::Fields) -> String;
}

/// Shared strategy implementation, parameterized by kind.
pub struct Strategy<P: KindProfile> {
    config: StrategyConfig,
    store: Arc<dyn MemoryStoreAdapter>,
    embedder: Arc<dyn EmbeddingAdapter>,
    oracle: Arc<dyn ExtractionAdapter>,
    profile: PhantomData<fn() -> P>,
}

enum Write {
    Insert,
    Update(String),
}

struct PlannedWrite {
    write: Write,
    content: String,
    metadata: Value,
}

impl<P: KindProfile> Strategy<P> {
    pub fn new(
        config: StrategyConfig,
        store: Arc<dyn MemoryStoreAdapter>,
        embedder: Arc<dyn EmbeddingAdapter>,
        oracle: Arc<dyn ExtractionAdapter>,
    ) -> Self {
        Self {
            config,
            store,
            embedder,
            oracle,
            profile: PhantomData,
        }
    }

    /// Existing same-kind records offered as consolidation context.
    async fn consolidation_context(
        &self,
        owner_id: &str,
        thread_id: &str,
    ) -> Result<Vec<MemoryRecord>, MnemoError> {
        let query = SearchQuery {
            owner_id: owner_id.to_string(),
            kind: P::KIND,
            thread_id: P::KIND.is_thread_scoped().then(|| thread_id.to_string()),
            embedding: None,
            threshold: 0.0,
            limit: P::CONTEXT_LIMIT,
        };
        let ranked = self.store.search(&query).await?;
        Ok(ranked.into_iter().map(|r| r.record).collect())
    }

    /// Decode and render one operation. Skips yield `None`.
    async fn plan(
        &self,
        owner_id: &str,
        op: MemoryOperation,
    ) -> Result<Option<PlannedWrite>, MnemoError> {
        if op.action == MemoryAction::Skip {
            return Ok(None);
        }

        let fields: P::Fields =
            serde_json::from_value(Value::Object(op.fields)).map_err(|e| MnemoError::Extraction {
                message: format!("malformed {} operation: {e}", P::KIND),
                source: Some(Box::new(e)),
            })?;
        let content = P::render(&fields);
        let metadata = serde_json::to_value(&fields)
            .map_err(|e| MnemoError::Internal(format!("failed to encode metadata: {e}")))?;

        let write = match op.action {
            MemoryAction::Update => match self.update_target(owner_id, op.target_id.as_deref()).await? {
                Some(id) => Write::Update(id),
                None => return Ok(None),
            },
            _ => Write::Insert,
        };

        Ok(Some(PlannedWrite {
            write,
            content,
            metadata,
        }))
    }

    /// The update target when it exists with this kind and owner.
    async fn update_target(
        &self,
        owner_id: &str,
        target_id: Option<&str>,
    ) -> Result<Option<String>, MnemoError> {
        let Some(target_id) = target_id.filter(|id| !id.is_empty()) else {
            warn!(kind = %P::KIND, owner_id, "update without target_id ignored");
            return Ok(None);
        };
        match self.store.get(target_id).await? {
            Some(record) if record.kind == P::KIND && record.owner_id == owner_id => {
                Ok(Some(record.id))
            }
            Some(record) => {
                warn!(
                    kind = %P::KIND,
                    owner_id,
                    target_id,
                    target_kind = %record.kind,
                    "update target belongs to another kind or owner, ignored"
                );
                Ok(None)
            }
            None => {
                warn!(kind = %P::KIND, owner_id, target_id, "update target not found, ignored");
                Ok(None)
            }
        }
    }

    async fn embed_all(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, MnemoError> {
        let expected = texts.len();
        let output = self.embedder.embed(EmbeddingInput { texts }).await?;
        if output.embeddings.len() != expected {
            return Err(MnemoError::embedding(format!(
                "expected {expected} embeddings, got {}",
                output.embeddings.len()
            )));
        }
        Ok(output.embeddings)
    }
}

#[async_trait]
impl<P: KindProfile> MemoryStrategy for Strategy<P> {
    fn kind(&self) -> MemoryKind {
        P::KIND
    }

    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    async fn extract_and_consolidate(
        &self,
        owner_id: &str,
        thread_id: &str,
        messages: &[ExchangeMessage],
        model: &str,
    ) -> Result<Vec<AppliedOperation>, MnemoError> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        let existing = self.consolidation_context(owner_id, thread_id).await?;
        let operations = self
            .oracle
            .extract(ExtractionRequest {
                kind: P::KIND,
                model: model.to_string(),
                messages: messages.to_vec(),
                existing,
            })
            .await?;
        let proposed = operations.len();

        let mut planned = Vec::with_capacity(proposed);
        for op in operations {
            if let Some(write) = self.plan(owner_id, op).await? {
                planned.push(write);
            }
        }
        if planned.is_empty() {
            debug!(kind = %P::KIND, owner_id, thread_id, proposed, "nothing to consolidate");
            return Ok(Vec::new());
        }

        let texts = planned.iter().map(|p| p.content.clone()).collect();
        let embeddings = self.embed_all(texts).await?;

        let namespace = namespace_for(P::KIND, owner_id, thread_id);
        let now = timestamp();
        let mut applied = Vec::with_capacity(planned.len());

        for (plan, embedding) in planned.into_iter().zip(embeddings) {
            match plan.write {
                Write::Insert => {
                    let record = MemoryRecord {
                        id: Uuid::new_v4().to_string(),
                        owner_id: owner_id.to_string(),
                        thread_id: Some(thread_id.to_string()),
                        kind: P::KIND,
                        namespace: namespace.clone(),
                        content: plan.content.clone(),
                        embedding: Some(embedding),
                        metadata: plan.metadata,
                        created_at: now.clone(),
                        updated_at: now.clone(),
                    };
                    let record_id = self.store.insert(&record).await?;
                    applied.push(AppliedOperation {
                        action: MemoryAction::Add,
                        record_id,
                        content: plan.content,
                    });
                }
                Write::Update(record_id) => {
                    let update = MemoryUpdate {
                        content: plan.content.clone(),
                        embedding,
                        metadata: plan.metadata,
                    };
                    if self.store.update(&record_id, &update).await? {
                        applied.push(AppliedOperation {
                            action: MemoryAction::Update,
                            record_id,
                            content: plan.content,
                        });
                    } else {
                        warn!(kind = %P::KIND, record_id = %record_id, "update target vanished before write, ignored");
                    }
                }
            }
        }

        info!(
            kind = %P::KIND,
            owner_id,
            thread_id,
            proposed,
            applied = applied.len(),
            "memories consolidated"
        );
        Ok(applied)
    }

    async fn retrieve(
        &self,
        owner_id: &str,
        thread_id: Option<&str>,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RankedRecord>, MnemoError> {
        let embedding = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => self.embed_all(vec![q.to_string()]).await?.pop(),
            None => None,
        };
        self.store
            .search(&SearchQuery {
                owner_id: owner_id.to_string(),
                kind: P::KIND,
                thread_id: thread_id.map(str::to_string),
                embedding,
                threshold: self.config.relevance_threshold,
                limit,
            })
            .await
    }

    fn format(&self, records: &[RankedRecord]) -> String {
        if records.is_empty() {
            return String::new();
        }
        let mut lines = Vec::with_capacity(records.len() + 1);
        lines.push(P::HEADING.to_string());
        for (i, ranked) in records.iter().enumerate() {
            let n = i + 1;
            let line = match ranked.score {
                Some(score) => format!(
                    "### {} {n} [Score: {score:.4}]. {}",
                    P::ITEM_LABEL,
                    ranked.record.content
                ),
                None => format!("### {} {n}. {}", P::ITEM_LABEL, ranked.record.content),
            };
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// One strategy per enabled kind, in configuration order.
pub fn build_strategies(
    session: &SessionConfig,
    store: Arc<dyn MemoryStoreAdapter>,
    embedder: Arc<dyn EmbeddingAdapter>,
    oracle: Arc<dyn ExtractionAdapter>,
) -> Vec<Arc<dyn MemoryStrategy>> {
    session
        .strategies
        .iter()
        .map(|config| -> Arc<dyn MemoryStrategy> {
            let (store, embedder, oracle) = (store.clone(), embedder.clone(), oracle.clone());
            match config.kind {
                MemoryKind::Summary => {
                    Arc::new(SummaryStrategy::new(config.clone(), store, embedder, oracle))
                }
                MemoryKind::Semantic => {
                    Arc::new(SemanticStrategy::new(config.clone(), store, embedder, oracle))
                }
                MemoryKind::UserPreference => Arc::new(UserPreferenceStrategy::new(
                    config.clone(),
                    store,
                    embedder,
                    oracle,
                )),
            }
        })
        .collect()
}

/// ISO 8601 UTC timestamp with millisecond precision.
fn timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Word counts arrive as numbers, numeric strings, or not at all.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_config::model::MnemoConfig;
    use mnemo_core::Role;
    use mnemo_test_utils::{TestHarness, add_op, skip_op, update_op};
    use serde_json::json;

    fn messages(texts: &[(Role, &str)]) -> Vec<ExchangeMessage> {
        texts
            .iter()
            .enumerate()
            .map(|(i, (role, content))| ExchangeMessage {
                id: i as i64 + 1,
                thread_id: "t-1".into(),
                role: *role,
                content: content.to_string(),
                consolidated: false,
                created_at: "2026-03-01T10:00:00.000Z".into(),
            })
            .collect()
    }

    fn tea_chat() -> Vec<ExchangeMessage> {
        messages(&[(Role::User, "I drink tea every day"), (Role::Assistant, "Lovely")])
    }

    fn make_strategy<P: KindProfile>(harness: &TestHarness) -> Strategy<P> {
        let session = SessionConfig::new(&MnemoConfig::default().memory, "alice", "t-1");
        let config = session
            .strategy(P::KIND)
            .cloned()
            .expect("kind enabled by default");
        Strategy::new(
            config,
            harness.storage.clone(),
            harness.embedder.clone(),
            harness.oracle.clone(),
        )
    }

    fn pref(preference: &str) -> serde_json::Value {
        json!({"preference": preference, "context": "stated", "categories": ["food"]})
    }

    #[tokio::test]
    async fn empty_input_never_calls_the_oracle() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<UserPreferenceProfile>(&harness);
        let applied = strategy
            .extract_and_consolidate("alice", "t-1", &[], "m")
            .await
            .unwrap();
        assert!(applied.is_empty());
        assert!(harness.oracle.requests().await.is_empty());
    }

    #[tokio::test]
    async fn add_inserts_embedded_record_with_namespace() {
        let harness = TestHarness::new().await.unwrap();
        harness
            .oracle
            .push_operations(
                MemoryKind::UserPreference,
                vec![add_op(pref("green tea")), skip_op(), add_op(pref("black coffee"))],
            )
            .await;
        let strategy = make_strategy::<UserPreferenceProfile>(&harness);

        let applied = strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();
        assert_eq!(applied.len(), 2);
        assert!(applied.iter().all(|a| a.action == MemoryAction::Add));
        assert_ne!(applied[0].record_id, applied[1].record_id);

        let stored = harness.storage.get(&applied[0].record_id).await.unwrap().unwrap();
        assert_eq!(stored.namespace, "/strategies/user_preference/users/alice");
        assert_eq!(stored.content, "Preference: green tea\nContext: stated\nCategories: food");
        assert_eq!(stored.metadata["preference"], "green tea");
        assert_eq!(stored.embedding, Some(harness.embedder.vector_for(&stored.content)));
        assert_eq!(stored.thread_id.as_deref(), Some("t-1"));
    }

    #[tokio::test]
    async fn valid_update_preserves_id() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<UserPreferenceProfile>(&harness);
        harness
            .oracle
            .push_operations(MemoryKind::UserPreference, vec![add_op(pref("tea"))])
            .await;
        let first = strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();
        let id = first[0].record_id.clone();
        let before = harness.storage.get(&id).await.unwrap().unwrap();

        harness
            .oracle
            .push_operations(MemoryKind::UserPreference, vec![update_op(&id, pref("green tea"))])
            .await;
        let second = strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();
        assert_eq!(second[0].action, MemoryAction::Update);
        assert_eq!(second[0].record_id, id);

        let after = harness.storage.get(&id).await.unwrap().unwrap();
        assert_eq!(after.metadata["preference"], "green tea");
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.namespace, before.namespace);
        assert_eq!(after.owner_id, before.owner_id);
        assert_ne!(after.content, before.content);
    }

    #[tokio::test]
    async fn invalid_updates_are_no_ops() {
        let harness = TestHarness::new().await.unwrap();
        let semantic = make_strategy::<SemanticProfile>(&harness);
        let preference = make_strategy::<UserPreferenceProfile>(&harness);

        harness
            .oracle
            .push_operations(
                MemoryKind::Semantic,
                vec![add_op(json!({"title": "Pet", "memory_type": "fact", "description": "Has a dog"}))],
            )
            .await;
        let semantic_id = semantic
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap()[0]
            .record_id
            .clone();

        harness
            .oracle
            .push_operations(
                MemoryKind::UserPreference,
                vec![
                    update_op("does-not-exist", pref("tea")),
                    // Right id, wrong kind.
                    update_op(&semantic_id, pref("tea")),
                    skip_op(),
                ],
            )
            .await;
        let mut untargeted = update_op("x", pref("tea"));
        untargeted.target_id = None;
        harness
            .oracle
            .push_operations(MemoryKind::UserPreference, vec![untargeted])
            .await;

        for _ in 0..2 {
            let applied = preference
                .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
                .await
                .unwrap();
            assert!(applied.is_empty());
        }
        let semantic_record = harness.storage.get(&semantic_id).await.unwrap().unwrap();
        assert_eq!(semantic_record.kind, MemoryKind::Semantic);
        assert!(semantic_record.content.contains("Has a dog"));
        assert!(preference.retrieve("alice", None, None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_another_owners_record_is_ignored() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<UserPreferenceProfile>(&harness);
        harness
            .oracle
            .push_operations(MemoryKind::UserPreference, vec![add_op(pref("tea"))])
            .await;
        let bob_id = strategy
            .extract_and_consolidate("bob", "t-9", &tea_chat(), "m")
            .await
            .unwrap()[0]
            .record_id
            .clone();

        harness
            .oracle
            .push_operations(MemoryKind::UserPreference, vec![update_op(&bob_id, pref("coffee"))])
            .await;
        let applied = strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();
        assert!(applied.is_empty());
        let bob = harness.storage.get(&bob_id).await.unwrap().unwrap();
        assert_eq!(bob.metadata["preference"], "tea");
    }

    #[tokio::test]
    async fn malformed_operation_abandons_the_batch() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<SemanticProfile>(&harness);
        harness
            .oracle
            .push_operations(
                MemoryKind::Semantic,
                vec![
                    add_op(json!({"title": "Pet", "description": "Has a dog"})),
                    add_op(json!({"title": "No description"})),
                ],
            )
            .await;

        let err = strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap_err();
        assert!(matches!(err, MnemoError::Extraction { .. }), "got: {err}");
        assert!(strategy.retrieve("alice", None, None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_writes_nothing() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<UserPreferenceProfile>(&harness);
        harness
            .oracle
            .push_operations(MemoryKind::UserPreference, vec![add_op(pref("tea"))])
            .await;
        harness.embedder.set_failing(true);

        let err = strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap_err();
        assert!(err.is_oracle_failure());
        harness.embedder.set_failing(false);
        assert!(strategy.retrieve("alice", None, None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn consolidation_context_scope_follows_kind() {
        let harness = TestHarness::new().await.unwrap();
        let summary = make_strategy::<SummaryProfile>(&harness);
        let semantic = make_strategy::<SemanticProfile>(&harness);
        let summary_fields = json!({"topic_name": "Tea", "global_summary": "g", "detailed_summary": "d"});
        let semantic_fields = json!({"title": "Tea", "memory_type": "fact", "description": "Drinks tea"});

        harness
            .oracle
            .push_operations(MemoryKind::Summary, vec![add_op(summary_fields)])
            .await;
        harness
            .oracle
            .push_operations(MemoryKind::Semantic, vec![add_op(semantic_fields)])
            .await;
        summary
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();
        semantic
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();

        // A second thread sees the owner's facts but not the other thread's summaries.
        summary
            .extract_and_consolidate("alice", "t-2", &tea_chat(), "m")
            .await
            .unwrap();
        semantic
            .extract_and_consolidate("alice", "t-2", &tea_chat(), "m")
            .await
            .unwrap();
        let summary_requests = harness.oracle.requests_for(MemoryKind::Summary).await;
        let semantic_requests = harness.oracle.requests_for(MemoryKind::Semantic).await;
        assert!(summary_requests[1].existing.is_empty());
        assert_eq!(semantic_requests[1].existing.len(), 1);
        assert_eq!(semantic_requests[1].model, "m");
    }

    #[tokio::test]
    async fn retrieve_applies_threshold_and_ranks() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<UserPreferenceProfile>(&harness);
        harness
            .oracle
            .push_operations(
                MemoryKind::UserPreference,
                vec![
                    add_op(json!({"preference": "tea tea tea", "categories": []})),
                    add_op(json!({"preference": "tea and coffee", "categories": []})),
                    add_op(json!({"preference": "hiking", "categories": []})),
                ],
            )
            .await;
        strategy
            .extract_and_consolidate("alice", "t-1", &tea_chat(), "m")
            .await
            .unwrap();

        let ranked = strategy.retrieve("alice", None, Some("tea"), 10).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].record.content.contains("tea tea tea"));
        assert!(ranked[0].score.unwrap() >= ranked[1].score.unwrap());
        assert!(ranked.iter().all(|r| r.score.unwrap() >= 0.1));

        let unranked = strategy.retrieve("alice", None, Some("   "), 10).await.unwrap();
        assert_eq!(unranked.len(), 3);
        assert!(unranked.iter().all(|r| r.score.is_none()));

        let limited = strategy.retrieve("alice", None, None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert!(strategy.retrieve("bob", None, None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn format_labels_items_and_scores() {
        let harness = TestHarness::new().await.unwrap();
        let strategy = make_strategy::<SemanticProfile>(&harness);
        assert_eq!(strategy.format(&[]), "");

        let record = |content: &str| MemoryRecord {
            id: "m".into(),
            owner_id: "alice".into(),
            thread_id: None,
            kind: MemoryKind::Semantic,
            namespace: "/strategies/semantic/users/alice".into(),
            content: content.into(),
            embedding: None,
            metadata: json!({}),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let text = strategy.format(&[
            RankedRecord {
                record: record("Title: Pet"),
                score: Some(0.87654),
            },
            RankedRecord {
                record: record("Title: Tea"),
                score: None,
            },
        ]);
        assert_eq!(
            text,
            "## Semantic Knowledge Base\n### Semantic Memory 1 [Score: 0.8765]. Title: Pet\n### Semantic Memory 2. Title: Tea"
        );
    }

    #[tokio::test]
    async fn build_strategies_follows_configured_subset() {
        let harness = TestHarness::new().await.unwrap();
        let mut memory = MnemoConfig::default().memory;
        memory.strategies = vec![MemoryKind::UserPreference, MemoryKind::Summary];
        let session = SessionConfig::new(&memory, "alice", "t-1");
        let strategies = build_strategies(
            &session,
            harness.storage.clone(),
            harness.embedder.clone(),
            harness.oracle.clone(),
        );
        let kinds: Vec<_> = strategies.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![MemoryKind::UserPreference, MemoryKind::Summary]);
        assert!((strategies[1].config().relevance_threshold - 0.3).abs() < 1e-6);
    }

    #[derive(Deserialize)]
    struct Counted {
        #[serde(default, deserialize_with = "lenient_count")]
        n: Option<u64>,
    }

    #[test]
    fn lenient_count_accepts_numbers_and_strings() {
        let parse = |s: &str| serde_json::from_str::<Counted>(s).unwrap().n;
        assert_eq!(parse(r#"{"n": 42}"#), Some(42));
        assert_eq!(parse(r#"{"n": "17"}"#), Some(17));
        assert_eq!(parse(r#"{"n": 3.0}"#), Some(3));
        assert_eq!(parse(r#"{"n": "many"}"#), None);
        assert_eq!(parse(r#"{"n": null}"#), None);
        assert_eq!(parse("{}"), None);
    }
}
