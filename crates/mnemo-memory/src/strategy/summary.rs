// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-scoped topic summaries.

use mnemo_core::MemoryKind;
use serde::{Deserialize, Serialize};

use super::{KindProfile, Strategy, lenient_count};

pub struct SummaryProfile;

pub type SummaryStrategy = Strategy<SummaryProfile>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFields {
    pub topic_name: String,
    pub global_summary: String,
    /// Topical synthesis wrapped in `<topic name="...">` tags.
    #[serde(default)]
    pub detailed_summary: String,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub global_summary_word_count: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub detailed_summary_word_count: Option<u64>,
}

impl KindProfile for SummaryProfile {
    const KIND: MemoryKind = MemoryKind::Summary;
    const CONTEXT_LIMIT: usize = 50;
    const HEADING: &'static str = "## Conversation Summaries";
    const ITEM_LABEL: &'static str = "Summary Memory";

    type Fields = SummaryFields;

    fn render(fields: &SummaryFields) -> String {
        format!(
            "Topic: {}\nGlobal Summary: {}\nDetailed Summary: {}",
            fields.topic_name, fields.global_summary, fields.detailed_summary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_topic_and_both_summaries() {
        let fields: SummaryFields = serde_json::from_value(serde_json::json!({
            "topic_name": "Rust async",
            "global_summary": "User is learning tokio.",
            "detailed_summary": "<topic name=\"Rust async\">Discussed join_all.</topic>",
            "global_summary_word_count": "4",
            "detailed_summary_word_count": 2
        }))
        .unwrap();
        assert_eq!(fields.global_summary_word_count, Some(4));
        assert_eq!(
            SummaryProfile::render(&fields),
            "Topic: Rust async\nGlobal Summary: User is learning tokio.\nDetailed Summary: <topic name=\"Rust async\">Discussed join_all.</topic>"
        );
    }

    #[test]
    fn topic_is_required() {
        let result = serde_json::from_value::<SummaryFields>(serde_json::json!({
            "global_summary": "no topic"
        }));
        assert!(result.is_err());
    }
}
