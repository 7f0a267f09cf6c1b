// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Namespace keys for memory records.
//!
//! A namespace is a filter key, not a uniqueness constraint. Summaries are
//! grouped per thread; semantic facts and preferences are grouped per owner
//! so they follow the user across threads.

use mnemo_core::MemoryKind;

/// Builds `/strategies/<kind>/users/<owner_id>`, plus `/threads/<thread_id>`
/// for thread-scoped kinds.
pub fn namespace_for(kind: MemoryKind, owner_id: &str, thread_id: &str) -> String {
    let mut ns = format!("/strategies/{kind}/users/{owner_id}");
    if kind.is_thread_scoped() {
        ns.push_str("/threads/");
        ns.push_str(thread_id);
    }
    ns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_thread_scoped() {
        assert_eq!(
            namespace_for(MemoryKind::Summary, "alice", "t-1"),
            "/strategies/summary/users/alice/threads/t-1"
        );
        assert_eq!(
            namespace_for(MemoryKind::Summary, "alice", "t-1"),
            namespace_for(MemoryKind::Summary, "alice", "t-1")
        );
        assert_ne!(
            namespace_for(MemoryKind::Summary, "alice", "t-1"),
            namespace_for(MemoryKind::Summary, "alice", "t-2")
        );
    }

    #[test]
    fn owner_scoped_kinds_ignore_thread() {
        for kind in [MemoryKind::Semantic, MemoryKind::UserPreference] {
            assert_eq!(
                namespace_for(kind, "alice", "t-1"),
                namespace_for(kind, "alice", "t-2")
            );
        }
        assert_eq!(
            namespace_for(MemoryKind::UserPreference, "bob", "t-9"),
            "/strategies/user_preference/users/bob"
        );
    }
}
