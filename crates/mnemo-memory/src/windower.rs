// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flush decisions over a thread's unconsolidated messages.
//!
//! Messages are first paired: a gap marker follows every user message that
//! has no assistant reply right after it, so the padded sequence is made of
//! exchanges. Two triggers read that sequence:
//!
//! - [`FlushTrigger::EndOfConversation`] flushes everything outstanding.
//! - [`FlushTrigger::TurnComplete`] flushes only when the padded length `L`
//!   is a multiple of the window size `W` and exceeds it. The flushed prefix
//!   has length `L - W`; the last `W` entries stay behind as the hot window.
//!
//! Gap markers are never part of a flush set.

use mnemo_core::{ExchangeMessage, Role, WindowSize};

/// What prompted a flush evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// Evaluated after every assistant reply.
    TurnComplete,
    /// The conversation is over; flush every outstanding message.
    EndOfConversation,
}

/// One slot of the padded sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddedEntry<'a> {
    Message(&'a ExchangeMessage),
    /// Stands in for a missing assistant reply.
    Gap,
}

impl<'a> PaddedEntry<'a> {
    pub fn message(&self) -> Option<&'a ExchangeMessage> {
        match self {
            PaddedEntry::Message(m) => Some(m),
            PaddedEntry::Gap => None,
        }
    }
}

/// Pads `messages` so every user message is followed by an assistant
/// message or a gap.
pub fn pair_exchanges(messages: &[ExchangeMessage]) -> Vec<PaddedEntry<'_>> {
    let mut padded = Vec::with_capacity(messages.len() + 1);
    for (i, msg) in messages.iter().enumerate() {
        padded.push(PaddedEntry::Message(msg));
        if msg.role == Role::User {
            let answered = messages
                .get(i + 1)
                .is_some_and(|next| next.role == Role::Assistant);
            if !answered {
                padded.push(PaddedEntry::Gap);
            }
        }
    }
    padded
}

/// Returns the messages that must be flushed now, in log order.
pub fn flush_set(
    messages: &[ExchangeMessage],
    trigger: FlushTrigger,
    window_size: WindowSize,
) -> Vec<ExchangeMessage> {
    let padded = pair_exchanges(messages);
    let end = match trigger {
        FlushTrigger::EndOfConversation => padded.len(),
        FlushTrigger::TurnComplete => match turn_flush_len(padded.len(), window_size) {
            Some(len) => len,
            None => return Vec::new(),
        },
    };
    padded[..end]
        .iter()
        .filter_map(PaddedEntry::message)
        .cloned()
        .collect()
}

/// Length of the padded prefix a per-turn flush takes, if one is due.
fn turn_flush_len(padded_len: usize, window_size: WindowSize) -> Option<usize> {
    match window_size {
        WindowSize::Unbounded => None,
        WindowSize::Bounded(w) if w > 0 && padded_len % w == 0 && padded_len > w => {
            Some(padded_len - w)
        }
        WindowSize::Bounded(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn msg(id: i64, role: Role) -> ExchangeMessage {
        ExchangeMessage {
            id,
            thread_id: "t-1".into(),
            role,
            content: format!("{role} {id}"),
            consolidated: false,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    fn conversation(roles: &[Role]) -> Vec<ExchangeMessage> {
        roles
            .iter()
            .enumerate()
            .map(|(i, &r)| msg(i as i64 + 1, r))
            .collect()
    }

    fn pairs(n: usize) -> Vec<ExchangeMessage> {
        let roles: Vec<Role> = (0..n).flat_map(|_| [Role::User, Role::Assistant]).collect();
        conversation(&roles)
    }

    fn ids(messages: &[ExchangeMessage]) -> Vec<i64> {
        messages.iter().map(|m| m.id).collect()
    }

    #[test]
    fn gap_after_unanswered_user_messages() {
        let messages = conversation(&[Role::User, Role::User, Role::Assistant, Role::User]);
        let padded = pair_exchanges(&messages);
        assert_eq!(padded.len(), 6);
        assert_eq!(padded[1], PaddedEntry::Gap);
        assert_eq!(padded[5], PaddedEntry::Gap);
        assert_eq!(padded[3].message().map(|m| m.id), Some(3));
    }

    #[test]
    fn leading_assistant_message_gets_no_gap() {
        let messages = conversation(&[Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(pair_exchanges(&messages).len(), 3);
    }

    #[test]
    fn window_of_four_flushes_on_the_fourth_pair() {
        let w = WindowSize::Bounded(4);
        for n in 1..=3 {
            assert!(
                flush_set(&pairs(n), FlushTrigger::TurnComplete, w).is_empty(),
                "{n} pairs must not flush"
            );
        }
        let flushed = flush_set(&pairs(4), FlushTrigger::TurnComplete, w);
        assert_eq!(ids(&flushed), vec![1, 2, 3, 4]);
    }

    #[test]
    fn hot_window_counts_gap_markers() {
        // U1 A1 U2 (gap) U3 A3 -> padded length 6, W = 3.
        let messages = conversation(&[Role::User, Role::Assistant, Role::User, Role::User, Role::Assistant]);
        let flushed = flush_set(&messages, FlushTrigger::TurnComplete, WindowSize::Bounded(3));
        assert_eq!(ids(&flushed), vec![1, 2, 3]);
    }

    #[test]
    fn end_of_conversation_keeps_trailing_user_message() {
        let mut messages = pairs(4);
        messages.push(msg(9, Role::User));
        let flushed = flush_set(&messages, FlushTrigger::EndOfConversation, WindowSize::Bounded(4));
        assert_eq!(flushed.len(), 9);
        assert_eq!(flushed.last().map(|m| m.id), Some(9));
    }

    #[test]
    fn unbounded_window_never_flushes_per_turn() {
        let messages = pairs(50);
        assert!(flush_set(&messages, FlushTrigger::TurnComplete, WindowSize::Unbounded).is_empty());
        assert_eq!(
            flush_set(&messages, FlushTrigger::EndOfConversation, WindowSize::Unbounded).len(),
            100
        );
    }

    #[test]
    fn empty_log_flushes_nothing() {
        assert!(flush_set(&[], FlushTrigger::EndOfConversation, WindowSize::Bounded(2)).is_empty());
        assert!(flush_set(&[], FlushTrigger::TurnComplete, WindowSize::Bounded(2)).is_empty());
    }

    fn arb_roles() -> impl Strategy<Value = Vec<Role>> {
        prop::collection::vec(
            prop_oneof![Just(Role::User), Just(Role::Assistant)],
            0..40,
        )
    }

    proptest! {
        #[test]
        fn user_is_never_followed_by_user(roles in arb_roles()) {
            let messages = conversation(&roles);
            let padded = pair_exchanges(&messages);
            for (i, entry) in padded.iter().enumerate() {
                if let Some(m) = entry.message() {
                    if m.role == Role::User {
                        let next = padded.get(i + 1);
                        let ok = matches!(next, Some(PaddedEntry::Gap))
                            || next.and_then(|e| e.message()).is_some_and(|n| n.role == Role::Assistant);
                        prop_assert!(ok, "user message {} not followed by reply or gap", m.id);
                    }
                }
            }
        }

        #[test]
        fn turn_flush_size_and_boundaries(roles in arb_roles(), w in 1usize..8) {
            let messages = conversation(&roles);
            let padded = pair_exchanges(&messages);
            let l = padded.len();
            let flushed = flush_set(&messages, FlushTrigger::TurnComplete, WindowSize::Bounded(w));
            if l <= w || l % w != 0 {
                prop_assert!(flushed.is_empty());
            } else {
                let expected = padded[..l - w].iter().filter(|e| e.message().is_some()).count();
                prop_assert_eq!(flushed.len(), expected);
                // The flush is a prefix of the log.
                prop_assert_eq!(ids(&flushed), ids(&messages[..flushed.len()]));
            }
        }

        #[test]
        fn reevaluating_the_hot_window_flushes_nothing(roles in arb_roles(), w in 1usize..8) {
            let messages = conversation(&roles);
            let flushed = flush_set(&messages, FlushTrigger::TurnComplete, WindowSize::Bounded(w));
            let remaining = &messages[flushed.len()..];
            if !flushed.is_empty() {
                prop_assert!(flush_set(remaining, FlushTrigger::TurnComplete, WindowSize::Bounded(w)).is_empty());
            }
        }

        #[test]
        fn end_of_conversation_flushes_everything(roles in arb_roles()) {
            let messages = conversation(&roles);
            let flushed = flush_set(&messages, FlushTrigger::EndOfConversation, WindowSize::Bounded(2));
            prop_assert_eq!(ids(&flushed), ids(&messages));
        }
    }
}
