use crate::controller::SessionPhase;

/// Notifications for presentation layers.
///
/// Subscribers observe the controller through these instead of any shared
/// global; the controller owns the canonical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The active conversation's message list changed.
    TranscriptChanged,
    /// The stored conversation list changed.
    HistoriesChanged,
    /// The session moved to a new phase.
    PhaseChanged(SessionPhase),
}
