// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-scoped durable facts.

use mnemo_core::MemoryKind;
use serde::{Deserialize, Serialize};

use super::{KindProfile, Strategy, lenient_count};

pub struct SemanticProfile;

pub type SemanticStrategy = Strategy<SemanticProfile>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticFields {
    pub title: String,
    /// fact, definition, explanation, procedure, example, comparison or reference.
    #[serde(default = "default_memory_type")]
    pub memory_type: String,
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_word_count: Option<u64>,
}

fn default_memory_type() -> String {
    "fact".to_string()
}

impl KindProfile for SemanticProfile {
    const KIND: MemoryKind = MemoryKind::Semantic;
    const CONTEXT_LIMIT: usize = 5;
    const HEADING: &'static str = "## Semantic Knowledge Base";
    const ITEM_LABEL: &'static str = "Semantic Memory";

    type Fields = SemanticFields;

    fn render(fields: &SemanticFields) -> String {
        format!(
            "Title: {}\nType: {}\nDescription: {}\n",
            fields.title, fields.memory_type, fields.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_trailing_newline_and_default_type() {
        let fields: SemanticFields = serde_json::from_value(serde_json::json!({
            "title": "Pet",
            "description": "The user has a dog named Max",
            "updated_memory": "ignored extra field"
        }))
        .unwrap();
        assert_eq!(fields.memory_type, "fact");
        assert_eq!(
            SemanticProfile::render(&fields),
            "Title: Pet\nType: fact\nDescription: The user has a dog named Max\n"
        );
        let metadata = serde_json::to_value(&fields).unwrap();
        assert!(metadata.get("description_word_count").is_none());
    }
}
