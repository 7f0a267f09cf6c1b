// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use mnemo_core::MemoryKind;
use serde::{Deserialize, Serialize};

use super::{KindProfile, Strategy};

/// Owner-scoped user preferences, explicit or inferred from strong signals.
pub struct UserPreferenceProfile;

pub type UserPreferenceStrategy = Strategy<UserPreferenceProfile>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceFields {
    pub preference: String,
    /// Why the preference was extracted.
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl KindProfile for UserPreferenceProfile {
    const KIND: MemoryKind = MemoryKind::UserPreference;
    const CONTEXT_LIMIT: usize = 5;
    const HEADING: &'static str = "## User Preferences";
    const ITEM_LABEL: &'static str = "Preference";

    type Fields = PreferenceFields;

    fn render(fields: &PreferenceFields) -> String {
        format!(
            "Preference: {}\nContext: {}\nCategories: {}",
            fields.preference,
            fields.context,
            fields.categories.join(", ")
        )
    }
}
