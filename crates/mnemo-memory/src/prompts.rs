// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates for the LLM extraction oracle.
//!
//! Every kind shares the same output envelope, `{"operations": [...]}`, so
//! the response can be requested in JSON mode. Each operation carries an
//! `action` (`add`, `update` or `skip`), a `target_id` for updates, and the
//! kind's own fields.

use mnemo_core::{ExchangeMessage, MemoryKind, MemoryRecord};
use serde_json::{Map, Value, json};

const SUMMARY_PROMPT: &str = r#"You maintain topic summaries of a conversation.

You are given the latest chat exchanges and the summary chunks already stored for this thread. Work out what the new exchanges add, then decide per topic:
- "update" an existing chunk when the new information refines, extends, exemplifies or answers a follow-up about its topic. Prefer updating when in doubt. Merge the old and new content into one coherent summary rather than appending.
- "add" a new chunk only when the topic is unrelated to every existing chunk.
If new information touches several chunks, split it and emit one operation per chunk.

Write in the same language as the conversation. Do not repeat information already present in a chunk's detailed summary.

Fields for every operation:
- "topic_name": short topic label
- "global_summary": condensed overview, about 250 words and never more than 400
- "detailed_summary": topical synthesis wrapped as <topic name="TOPIC_NAME">...</topic>, about 1000 words and never more than 2000
- "global_summary_word_count" and "detailed_summary_word_count": integers

Respond with a single JSON object and nothing else:
{"operations": [{"action": "add" | "update", "target_id": null | "<existing chunk id>", "topic_name": "...", "global_summary": "...", "detailed_summary": "...", "global_summary_word_count": 0, "detailed_summary_word_count": 0}]}"#;

const SEMANTIC_PROMPT: &str = r#"You extract durable facts about the user for a long-term memory.

Extract only what the user states or what follows logically from the user's messages; use assistant messages as context only. Do not add outside knowledge. Keep the user's language. Each fact must stand alone: replace pronouns with the entities they refer to and keep numbers, places and dates.

Consolidate conservatively against the existing memories:
- "add" when the fact is new, or when it contradicts an existing memory or describes a different event.
- "update" when the fact complements an existing memory on the same subject. Return the full merged memory and keep every detail of the original.
- "skip" when the fact is already covered or carries no lasting value.

Fields for every operation:
- "title": short label
- "memory_type": one of "fact", "definition", "explanation", "procedure", "example", "comparison", "reference"
- "description": the memory as one well-formed standalone statement
- "description_word_count": integer

Respond with a single JSON object and nothing else. Use an empty list when nothing changes:
{"operations": [{"action": "add" | "update" | "skip", "target_id": null | "<existing memory id>", "title": "...", "memory_type": "fact", "description": "...", "description_word_count": 0}]}"#;

const USER_PREFERENCE_PROMPT: &str = r#"You extract the user's lasting preferences.

Explicit preferences are stated by the user. Implicit preferences may be inferred only from strong signals such as repeated requests. Extract from the user's messages only, keep the user's language, and include only preferences you are confident about.

Before choosing "update", ask whether the new and the existing preference could both hold in different situations. If they could, they are distinct: use "add". If one narrows or supersedes the other in the same situation, use "update" and return the full merged preference.
Use "skip" for one-off events, temporary states, personal details that are not preferences, speculation, personal identifiers, harmful content, and anything already stored.

Fields for every operation:
- "context": why this preference was extracted
- "preference": the preference itself
- "categories": list of topic categories such as "food" or "travel"

Respond with a single JSON object and nothing else. Use an empty list when nothing changes:
{"operations": [{"action": "add" | "update" | "skip", "target_id": null | "<existing preference id>", "context": "...", "preference": "...", "categories": ["..."]}]}"#;

/// System prompt for `kind`.
pub fn system_prompt(kind: MemoryKind) -> &'static str {
    match kind {
        MemoryKind::Summary => SUMMARY_PROMPT,
        MemoryKind::Semantic => SEMANTIC_PROMPT,
        MemoryKind::UserPreference => USER_PREFERENCE_PROMPT,
    }
}

/// User prompt carrying the flushed exchanges and the existing records.
pub fn build_prompt(messages: &[ExchangeMessage], existing: &[MemoryRecord]) -> String {
    format!(
        "<current_conversation>\n{}\n</current_conversation>\n\n<existing_memories>\n{}\n</existing_memories>",
        render_json(&conversation_json(messages)),
        render_json(&existing_json(existing)),
    )
}

fn conversation_json(messages: &[ExchangeMessage]) -> Value {
    Value::Array(
        messages
            .iter()
            .map(|m| {
                json!({
                    "role": m.role.to_string().to_uppercase(),
                    "content": m.content,
                    "created_at": m.created_at,
                })
            })
            .collect(),
    )
}

/// Existing records as `{id, <metadata fields>, created_at, updated_at}`.
fn existing_json(existing: &[MemoryRecord]) -> Value {
    Value::Array(
        existing
            .iter()
            .map(|r| {
                let mut obj = Map::new();
                obj.insert("id".into(), Value::String(r.id.clone()));
                match &r.metadata {
                    Value::Object(fields) => {
                        for (k, v) in fields {
                            obj.insert(k.clone(), v.clone());
                        }
                    }
                    _ => {
                        obj.insert("content".into(), Value::String(r.content.clone()));
                    }
                }
                obj.insert("created_at".into(), Value::String(r.created_at.clone()));
                obj.insert("updated_at".into(), Value::String(r.updated_at.clone()));
                Value::Object(obj)
            })
            .collect(),
    )
}

fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::Role;

    fn message(role: Role, content: &str) -> ExchangeMessage {
        ExchangeMessage {
            id: 1,
            thread_id: "t-1".into(),
            role,
            content: content.into(),
            consolidated: false,
            created_at: "2026-03-01T10:00:00.000Z".into(),
        }
    }

    fn record(metadata: Value) -> MemoryRecord {
        MemoryRecord {
            id: "mem-1".into(),
            owner_id: "alice".into(),
            thread_id: Some("t-1".into()),
            kind: MemoryKind::UserPreference,
            namespace: "/strategies/user_preference/users/alice".into(),
            content: "Preference: green tea".into(),
            embedding: None,
            metadata,
            created_at: "2026-02-01T00:00:00.000Z".into(),
            updated_at: "2026-02-02T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn every_kind_asks_for_the_operations_envelope() {
        for kind in MemoryKind::ALL {
            assert!(system_prompt(kind).contains(r#"{"operations": ["#), "{kind}");
            assert!(system_prompt(kind).contains("target_id"), "{kind}");
        }
    }

    #[test]
    fn conversation_roles_are_upper_case() {
        let prompt = build_prompt(
            &[message(Role::User, "I love green tea"), message(Role::Assistant, "Noted!")],
            &[],
        );
        assert!(prompt.contains(r#""role": "USER""#));
        assert!(prompt.contains(r#""role": "ASSISTANT""#));
        assert!(prompt.contains("I love green tea"));
        assert!(prompt.contains("2026-03-01T10:00:00.000Z"));
        assert!(prompt.contains("<existing_memories>\n[]\n</existing_memories>"));
    }

    #[test]
    fn existing_records_expose_id_and_metadata() {
        let existing = [record(json!({"preference": "green tea", "categories": ["food"]}))];
        let value = existing_json(&existing);
        assert_eq!(value[0]["id"], "mem-1");
        assert_eq!(value[0]["preference"], "green tea");
        assert_eq!(value[0]["updated_at"], "2026-02-02T00:00:00.000Z");
        assert!(value[0].get("content").is_none());
    }

    #[test]
    fn non_object_metadata_falls_back_to_content() {
        let value = existing_json(&[record(Value::Null)]);
        assert_eq!(value[0]["content"], "Preference: green tea");
    }
}
