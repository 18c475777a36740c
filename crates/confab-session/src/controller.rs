use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use confab_context::{ContextWindow, HISTORY_MAX_LENGTH};
use confab_gateway::CompletionGateway;
use confab_store::{
    build_record, generate_title, upsert_record, ChatMessage, ConversationRecord,
    ConversationStore, RecordDraft, Sender, DEFAULT_TITLE,
};

use crate::error::{Result, SessionError};
use crate::events::SessionEvent;
use crate::persister::PersistQueue;

/// Reply shown in place of an assistant answer when the gateway fails.
pub const GATEWAY_ERROR_REPLY: &str =
    "Sorry, something went wrong while contacting the assistant. Please try again.";

/// Lifecycle of the active conversation.
///
/// `AwaitingReply` is the sole concurrency control: no operation that
/// issues a completion request is accepted while one is in flight.
/// `Error` marks a failed exchange; it permits everything `Idle` does,
/// since recovery is simply resending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingReply,
    Error,
}

/// Owner of the canonical in-memory conversation state.
///
/// Orchestrates send / edit / switch / delete against the completion
/// gateway and the store, and notifies presentation layers through
/// [`SessionEvent`]s.
pub struct SessionController {
    phase: SessionPhase,
    conversation_id: Option<String>,
    title: String,
    messages: Vec<ChatMessage>,
    context: ContextWindow,
    histories: Vec<ConversationRecord>,
    last_message_id: u64,
    gateway: Arc<dyn CompletionGateway>,
    persist: PersistQueue,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    /// Create a controller with the default context window capacity,
    /// loading previously saved conversations from `store`.
    pub async fn new(
        gateway: Arc<dyn CompletionGateway>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self::with_context_capacity(gateway, store, HISTORY_MAX_LENGTH).await
    }

    /// Same as [`SessionController::new`] with an explicit cap on context
    /// entries replayed to the completion service.
    pub async fn with_context_capacity(
        gateway: Arc<dyn CompletionGateway>,
        store: Arc<dyn ConversationStore>,
        max_context_entries: usize,
    ) -> Self {
        // A failed read degrades to an empty history; it never blocks the chat.
        let histories = match store.load().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("could not load saved conversations: {e}");
                Vec::new()
            }
        };

        let (events, _) = broadcast::channel(64);

        Self {
            phase: SessionPhase::Idle,
            conversation_id: None,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            context: ContextWindow::with_max_entries(max_context_entries),
            histories,
            last_message_id: 0,
            gateway,
            persist: PersistQueue::spawn(store),
            events,
        }
    }

    /// Observe state changes. Every subscriber sees every event.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn histories(&self) -> &[ConversationRecord] {
        &self.histories
    }

    pub fn context(&self) -> &ContextWindow {
        &self.context
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn exchange_count(&self) -> usize {
        self.context.exchange_len()
    }

    /// Send a user message and await the assistant reply.
    ///
    /// The user message is appended optimistically before the gateway call.
    /// On failure it stays in the transcript (it was genuinely sent) and a
    /// fixed-text error reply is appended instead; the context window and
    /// the store are left untouched.
    pub async fn send_message(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.ensure_not_busy()?;

        if self.messages.is_empty() {
            self.conversation_id = Some(Uuid::new_v4().to_string());
            self.title = generate_title(text);
        }

        let id = self.next_message_id();
        self.messages.push(ChatMessage::user(id, text));
        self.set_phase(SessionPhase::AwaitingReply);
        self.emit(SessionEvent::TranscriptChanged);

        self.exchange(text.to_string()).await
    }

    /// Replace the most recent user message and regenerate the reply.
    ///
    /// Everything after the edited message is discarded, the context window
    /// is truncated to the exchanges that still stand, and the edit then
    /// proceeds exactly like a send. Editing any other message is rejected.
    pub async fn edit_message(&mut self, id: u64, new_text: &str) -> Result<()> {
        self.ensure_not_busy()?;
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(SessionError::NotEditable)?;
        let last_user = self.messages.iter().rposition(|m| m.sender == Sender::User);
        if self.messages[index].sender != Sender::User || last_user != Some(index) {
            return Err(SessionError::NotEditable);
        }

        // The edited message invalidates at most the final exchange, and
        // only when its own send actually produced one (a failed send
        // leaves the window without a pair for it).
        let keep = self.context.exchange_len() - usize::from(self.last_exchange_is_live());

        self.messages.truncate(index);
        let mut edited = ChatMessage::user(id, new_text);
        edited.is_regenerated = true;
        self.messages.push(edited);
        self.context.truncate_before(keep);

        self.set_phase(SessionPhase::AwaitingReply);
        self.emit(SessionEvent::TranscriptChanged);

        self.exchange(new_text.to_string()).await
    }

    /// Persist the active conversation (if it has any messages) and start
    /// a fresh one.
    pub fn new_conversation(&mut self) -> Result<()> {
        self.ensure_not_busy()?;

        if !self.messages.is_empty() {
            self.persist_active();
        }
        self.reset_active();
        self.set_phase(SessionPhase::Idle);
        self.emit(SessionEvent::TranscriptChanged);
        Ok(())
    }

    /// Replace the in-memory state wholesale from a stored record.
    ///
    /// Does not touch the store.
    pub fn load_conversation(&mut self, record: ConversationRecord) -> Result<()> {
        self.ensure_not_busy()?;

        // Keep id allocation ahead of everything in the loaded transcript.
        let max_loaded_id = record.messages.iter().map(|m| m.id).max().unwrap_or(0);
        self.last_message_id = self.last_message_id.max(max_loaded_id);

        self.conversation_id = Some(record.id);
        self.title = record.title;
        self.messages = record.messages;
        self.context =
            ContextWindow::from_exchanges(record.context_history, self.context.max_entries());

        self.set_phase(SessionPhase::Idle);
        self.emit(SessionEvent::TranscriptChanged);
        Ok(())
    }

    /// Give the active conversation a user-chosen title.
    ///
    /// A renamed title is never overwritten by derivation again. Blank
    /// input falls back to re-deriving from the first user message on the
    /// next persist.
    pub fn rename_conversation(&mut self, title: &str) -> Result<()> {
        self.ensure_not_busy()?;

        let title = title.trim();
        self.title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        };

        if self.conversation_id.is_some() && !self.messages.is_empty() {
            self.persist_active();
        }
        Ok(())
    }

    /// Remove a conversation from the store; if it is the active one, the
    /// in-memory state is reset as well.
    pub fn delete_conversation(&mut self, id: &str) -> Result<()> {
        self.ensure_not_busy()?;

        let before = self.histories.len();
        self.histories.retain(|r| r.id != id);
        if self.histories.len() != before {
            self.persist.save(self.histories.clone());
            self.emit(SessionEvent::HistoriesChanged);
        }

        if self.conversation_id.as_deref() == Some(id) {
            self.reset_active();
            self.emit(SessionEvent::TranscriptChanged);
        }
        self.set_phase(SessionPhase::Idle);
        Ok(())
    }

    /// Empty the store and reset all in-memory state.
    pub fn clear_all(&mut self) {
        self.histories.clear();
        self.persist.clear();
        self.reset_active();
        self.set_phase(SessionPhase::Idle);
        self.emit(SessionEvent::HistoriesChanged);
        self.emit(SessionEvent::TranscriptChanged);
    }

    /// Wait until every queued store write has been applied.
    pub async fn flush_persistence(&self) {
        self.persist.flush().await;
    }

    async fn exchange(&mut self, prompt: String) -> Result<()> {
        let history = self.context.entries();

        match self.gateway.complete(&prompt, &history).await {
            Ok(reply) => {
                let id = self.next_message_id();
                self.messages.push(ChatMessage::assistant(id, reply.clone()));
                self.context.push(prompt, reply);
                self.persist_active();
                self.set_phase(SessionPhase::Idle);
            }
            Err(e) => {
                tracing::warn!("completion request failed: {e}");
                let id = self.next_message_id();
                self.messages.push(ChatMessage::assistant(id, GATEWAY_ERROR_REPLY));
                self.set_phase(SessionPhase::Error);
            }
        }

        self.emit(SessionEvent::TranscriptChanged);
        Ok(())
    }

    fn persist_active(&mut self) {
        let Some(id) = self.conversation_id.clone() else {
            return;
        };

        let existing = self.histories.iter().find(|r| r.id == id).cloned();
        let record = build_record(RecordDraft {
            existing: existing.as_ref(),
            id: &id,
            title: &self.title,
            messages: &self.messages,
            context_history: self.context.exchanges(),
        });
        self.title = record.title.clone();

        upsert_record(&mut self.histories, record);
        self.persist.save(self.histories.clone());
        self.emit(SessionEvent::HistoriesChanged);
    }

    /// Whether the final two transcript messages are the pair recorded as
    /// the window's last exchange. False after a failed send, whose error
    /// reply never enters the window.
    fn last_exchange_is_live(&self) -> bool {
        let Some(exchange) = self.context.exchanges().last() else {
            return false;
        };
        let len = self.messages.len();
        if len < 2 {
            return false;
        }

        let prompt = &self.messages[len - 2];
        let reply = &self.messages[len - 1];
        prompt.sender == Sender::User
            && reply.sender == Sender::Assistant
            && prompt.text == exchange.user
            && reply.text == exchange.assistant
    }

    fn reset_active(&mut self) {
        self.messages.clear();
        self.context.clear();
        self.conversation_id = None;
        self.title = DEFAULT_TITLE.to_string();
    }

    fn ensure_not_busy(&self) -> Result<()> {
        if self.phase == SessionPhase::AwaitingReply {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn next_message_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis() as u64;
        self.last_message_id = now.max(self.last_message_id + 1);
        self.last_message_id
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.emit(SessionEvent::PhaseChanged(phase));
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine; presentation layers come and go.
        let _ = self.events.send(event);
    }
}
