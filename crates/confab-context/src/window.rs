use confab_gateway::ContextEntry;
use serde::{Deserialize, Serialize};

/// Default cap on context entries replayed to the completion service.
pub const HISTORY_MAX_LENGTH: usize = 20;

/// One completed user/assistant turn.
///
/// The window stores whole exchanges rather than a flat interleaved list,
/// so trimming and truncation can never split a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Bounded conversational memory for one conversation.
///
/// Holds the most recent completed exchanges, capped so that the flattened
/// entry count never exceeds `max_entries`; the oldest exchanges are
/// evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    exchanges: Vec<Exchange>,
    max_entries: usize,
}

impl ContextWindow {
    pub fn new() -> Self {
        Self::with_max_entries(HISTORY_MAX_LENGTH)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            exchanges: Vec::new(),
            max_entries,
        }
    }

    /// Rebuild a window from persisted exchanges, re-applying the cap.
    pub fn from_exchanges(exchanges: Vec<Exchange>, max_entries: usize) -> Self {
        let mut window = Self {
            exchanges,
            max_entries,
        };
        window.trim();
        window
    }

    /// Append one completed exchange, evicting the oldest beyond the cap.
    pub fn push(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.exchanges.push(Exchange::new(user, assistant));
        self.trim();
    }

    /// Keep only the first `count` exchanges.
    ///
    /// Used when an edit invalidates everything from a given turn onward.
    /// A `count` at or beyond the current length is a no-op.
    pub fn truncate_before(&mut self, count: usize) {
        self.exchanges.truncate(count);
    }

    /// Flatten to the wire sequence `[user, assistant, user, assistant, ...]`.
    pub fn entries(&self) -> Vec<ContextEntry> {
        self.exchanges
            .iter()
            .flat_map(|exchange| {
                [
                    ContextEntry::user(exchange.user.clone()),
                    ContextEntry::assistant(exchange.assistant.clone()),
                ]
            })
            .collect()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Configured cap on flattened entries.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn exchange_len(&self) -> usize {
        self.exchanges.len()
    }

    /// Number of flattened entries, always `2 * exchange_len()`.
    pub fn entry_len(&self) -> usize {
        self.exchanges.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    fn trim(&mut self) {
        let max_exchanges = self.max_entries / 2;
        if self.exchanges.len() > max_exchanges {
            let excess = self.exchanges.len() - max_exchanges;
            self.exchanges.drain(..excess);
        }
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(window: &mut ContextWindow, turns: usize) {
        for i in 0..turns {
            window.push(format!("question {i}"), format!("answer {i}"));
        }
    }

    #[test]
    fn push_appends_user_then_assistant() {
        let mut window = ContextWindow::new();
        window.push("Hello", "Hi there");

        let entries = window.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ContextEntry::user("Hello"));
        assert_eq!(entries[1], ContextEntry::assistant("Hi there"));
    }

    #[test]
    fn entry_count_never_exceeds_cap() {
        let mut window = ContextWindow::new();
        filled(&mut window, 37);

        assert_eq!(window.entry_len(), HISTORY_MAX_LENGTH);
    }

    #[test]
    fn eviction_is_oldest_first_preserving_order() {
        let mut window = ContextWindow::new();
        filled(&mut window, 15);

        // Cap of 20 entries keeps the last 10 exchanges: 5 through 14.
        let entries = window.entries();
        assert_eq!(entries[0], ContextEntry::user("question 5"));
        assert_eq!(entries[19], ContextEntry::assistant("answer 14"));
    }

    #[test]
    fn odd_cap_rounds_down_to_whole_exchanges() {
        let mut window = ContextWindow::with_max_entries(5);
        filled(&mut window, 4);

        // 5 entries can hold two whole exchanges, never a split pair.
        assert_eq!(window.exchange_len(), 2);
        assert_eq!(window.entries()[0], ContextEntry::user("question 2"));
    }

    #[test]
    fn truncate_before_keeps_whole_leading_exchanges() {
        let mut window = ContextWindow::new();
        filled(&mut window, 4);

        window.truncate_before(2);

        let entries = window.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3], ContextEntry::assistant("answer 1"));
    }

    #[test]
    fn truncate_before_zero_empties_the_window() {
        let mut window = ContextWindow::new();
        filled(&mut window, 3);

        window.truncate_before(0);
        assert!(window.is_empty());
    }

    #[test]
    fn truncate_before_past_the_end_is_a_noop() {
        let mut window = ContextWindow::new();
        filled(&mut window, 3);

        window.truncate_before(10);
        assert_eq!(window.exchange_len(), 3);
    }

    #[test]
    fn from_exchanges_reapplies_the_cap() {
        let exchanges: Vec<Exchange> = (0..12)
            .map(|i| Exchange::new(format!("q{i}"), format!("a{i}")))
            .collect();

        let window = ContextWindow::from_exchanges(exchanges, HISTORY_MAX_LENGTH);
        assert_eq!(window.exchange_len(), 10);
        assert_eq!(window.exchanges()[0].user, "q2");
    }
}
