use chrono::Utc;
use confab_context::Exchange;

use crate::models::{ChatMessage, ConversationRecord, Sender};

/// Placeholder title for a conversation that has not earned one yet.
pub const DEFAULT_TITLE: &str = "New chat";

/// Maximum derived-title length in characters, excluding the ellipsis.
pub const TITLE_MAX_LENGTH: usize = 60;

/// Maximum number of conversation records kept in the store.
pub const HISTORY_LIMIT: usize = 50;

/// Derive a conversation title from its first user message.
///
/// Pure and idempotent: the same input always yields the same title.
pub fn generate_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let mut title: String = trimmed.chars().take(TITLE_MAX_LENGTH).collect();
    if trimmed.chars().count() > TITLE_MAX_LENGTH {
        title.push_str("...");
    }
    title
}

/// Inputs for building a savable conversation snapshot.
#[derive(Debug, Clone)]
pub struct RecordDraft<'a> {
    /// Previously stored version of this conversation, if any. Only its
    /// `created_at` is carried over.
    pub existing: Option<&'a ConversationRecord>,
    pub id: &'a str,
    pub title: &'a str,
    pub messages: &'a [ChatMessage],
    pub context_history: &'a [Exchange],
}

/// Produce a normalized record from the current in-memory state.
///
/// Never mutates its inputs. `updated_at` is always the call time;
/// `created_at` is preserved from the existing record when there is one.
/// A still-placeholder title is re-derived from the first user message.
pub fn build_record(draft: RecordDraft<'_>) -> ConversationRecord {
    let now = Utc::now();

    let title = if draft.title == DEFAULT_TITLE {
        draft
            .messages
            .iter()
            .find(|m| m.sender == Sender::User)
            .map(|m| generate_title(&m.text))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    } else {
        draft.title.to_string()
    };

    ConversationRecord {
        id: draft.id.to_string(),
        title,
        messages: draft.messages.to_vec(),
        context_history: draft.context_history.to_vec(),
        created_at: draft.existing.map(|r| r.created_at).unwrap_or(now),
        updated_at: now,
        message_count: draft.messages.len(),
    }
}

/// Insert or replace `record` in the newest-first history list.
///
/// The list is re-ordered by `updated_at` descending and capped at
/// [`HISTORY_LIMIT`], evicting the least recently updated records.
pub fn upsert_record(records: &mut Vec<ConversationRecord>, record: ConversationRecord) {
    match records.iter().position(|r| r.id == record.id) {
        Some(index) => records[index] = record,
        None => records.insert(0, record),
    }

    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    records.truncate(HISTORY_LIMIT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str, age_minutes: i64) -> ConversationRecord {
        let at = Utc::now() - Duration::minutes(age_minutes);
        ConversationRecord {
            id: id.to_string(),
            title: format!("chat {id}"),
            messages: Vec::new(),
            context_history: Vec::new(),
            created_at: at,
            updated_at: at,
            message_count: 0,
        }
    }

    #[test]
    fn title_generation_is_idempotent() {
        let once = generate_title("What is the weather like today?");
        let twice = generate_title("What is the weather like today?");
        assert_eq!(once, twice);
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let input = "x".repeat(90);
        let title = generate_title(&input);

        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), TITLE_MAX_LENGTH + 3);
    }

    #[test]
    fn title_at_exactly_the_limit_gets_no_ellipsis() {
        let input = "y".repeat(TITLE_MAX_LENGTH);
        assert_eq!(generate_title(&input), input);
    }

    #[test]
    fn blank_input_falls_back_to_placeholder() {
        assert_eq!(generate_title("   "), DEFAULT_TITLE);
    }

    #[test]
    fn build_preserves_created_at_of_existing_record() {
        let existing = record("a", 120);
        let built = build_record(RecordDraft {
            existing: Some(&existing),
            id: "a",
            title: "chat a",
            messages: &[],
            context_history: &[],
        });

        assert_eq!(built.created_at, existing.created_at);
        assert!(built.updated_at > existing.updated_at);
    }

    #[test]
    fn build_derives_title_from_first_user_message_when_placeholder() {
        let messages = vec![
            ChatMessage::user(1, "tell me about lighthouses"),
            ChatMessage::assistant(2, "gladly"),
        ];
        let built = build_record(RecordDraft {
            existing: None,
            id: "a",
            title: DEFAULT_TITLE,
            messages: &messages,
            context_history: &[],
        });

        assert_eq!(built.title, "tell me about lighthouses");
        assert_eq!(built.message_count, 2);
    }

    #[test]
    fn build_keeps_a_user_renamed_title() {
        let built = build_record(RecordDraft {
            existing: None,
            id: "a",
            title: "my research notes",
            messages: &[ChatMessage::user(1, "something else entirely")],
            context_history: &[],
        });

        assert_eq!(built.title, "my research notes");
    }

    #[test]
    fn upsert_replaces_existing_record_by_id() {
        let mut records = vec![record("a", 10), record("b", 20)];
        let mut replacement = record("b", 0);
        replacement.title = "updated".to_string();

        upsert_record(&mut records, replacement);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "b");
        assert_eq!(records[0].title, "updated");
    }

    #[test]
    fn upsert_beyond_limit_evicts_least_recently_updated() {
        let mut records: Vec<ConversationRecord> =
            (0..HISTORY_LIMIT).map(|i| record(&format!("c{i}"), i as i64 + 1)).collect();

        upsert_record(&mut records, record("fresh", 0));

        assert_eq!(records.len(), HISTORY_LIMIT);
        assert_eq!(records[0].id, "fresh");
        // c49 was the oldest by updated_at and is gone.
        assert!(records.iter().all(|r| r.id != format!("c{}", HISTORY_LIMIT - 1)));
    }
}
