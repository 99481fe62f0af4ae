//! Session domain model.
//!
//! This module contains the per-owner Session entity the dispatcher mutates
//! on every event.

use super::history::TransformHistory;
use super::settings::{AwaitingInput, SessionSettings};
use crate::error::Result;
use crate::transform::TransformKind;
use uuid::Uuid;

/// Opaque owner identifier (the chat user id).
pub type OwnerId = i64;

/// Represents one owner's working state.
///
/// A session contains:
/// - The transform history of the committed token list
/// - Display settings and the settings sub-state flag
/// - A staged token list awaiting access-gate clearance
/// - Timestamps for creation and last update
///
/// Sessions live only in process memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique session identifier (UUID format), rotated by "new season"
    pub id: String,
    /// Owner of this session
    pub owner: OwnerId,
    /// Generations of the committed token list
    pub history: TransformHistory,
    /// Display tunables
    pub settings: SessionSettings,
    /// Token list staged while the gate was not passed
    pub pending: Option<Vec<String>>,
    /// Set while the next text message answers a settings prompt
    pub awaiting_input: Option<AwaitingInput>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    /// Creates an empty session with the given default settings.
    pub fn new(owner: OwnerId, settings: SessionSettings) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            owner,
            history: TransformHistory::default(),
            settings,
            pending: None,
            awaiting_input: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// The active generation's tokens.
    pub fn active_tokens(&self) -> &[String] {
        self.history.current()
    }

    /// Promotes `tokens` to the new base generation and drops any staged list.
    pub fn commit(&mut self, tokens: Vec<String>) {
        tracing::info!(
            owner = self.owner,
            session_id = %self.id,
            count = tokens.len(),
            "Committed token list"
        );
        self.history.reset(tokens);
        self.pending = None;
        self.touch();
    }

    /// Stages `tokens` for commit after the gate passes.
    ///
    /// A previously staged list is discarded; history is untouched.
    pub fn stage(&mut self, tokens: Vec<String>) {
        if let Some(previous) = self.pending.replace(tokens) {
            tracing::debug!(
                owner = self.owner,
                discarded = previous.len(),
                "Replaced staged token list"
            );
        }
        self.touch();
    }

    /// Commits the staged list, if any. Returns whether a commit happened.
    pub fn commit_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(tokens) if !tokens.is_empty() => {
                self.commit(tokens);
                true
            }
            _ => false,
        }
    }

    /// Advances the transform cycle on this session.
    pub fn apply_next_transform(&mut self) -> Result<TransformKind> {
        let kind = self.history.cycle()?;
        tracing::debug!(
            owner = self.owner,
            generation = self.history.current_index(),
            transform = kind.label(),
            "Applied transform"
        );
        self.touch();
        Ok(kind)
    }

    /// Starts a fresh session id while keeping history and settings.
    pub fn rotate_id(&mut self) {
        self.id = Uuid::new_v4().to_string();
        self.touch();
    }

    pub fn begin_awaiting(&mut self, tag: AwaitingInput) {
        self.awaiting_input = Some(tag);
    }

    /// Answers the pending settings prompt.
    ///
    /// On invalid input the flag stays set so the owner is re-prompted.
    /// Returns `Ok(None)` when no prompt was pending.
    pub fn answer_awaiting(&mut self, input: &str) -> Result<Option<AwaitingInput>> {
        let Some(tag) = self.awaiting_input else {
            return Ok(None);
        };
        match tag {
            AwaitingInput::PerPage => {
                self.settings.per_page = super::settings::parse_positive(input)?;
            }
        }
        self.awaiting_input = None;
        self.touch();
        Ok(Some(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(42, SessionSettings::default());
        assert_eq!(session.owner, 42);
        assert!(session.active_tokens().is_empty());
        assert_eq!(session.settings.per_page, 10);
        assert!(!session.settings.show_all_enabled);
        assert!(session.pending.is_none());
        assert!(session.awaiting_input.is_none());
    }

    #[test]
    fn test_stage_leaves_history_untouched() {
        let mut session = Session::new(1, SessionSettings::default());
        session.commit(tokens(&["5551234567"]));
        session.stage(tokens(&["6661234567"]));
        assert_eq!(session.active_tokens(), ["5551234567"]);
        assert_eq!(session.pending, Some(tokens(&["6661234567"])));
    }

    #[test]
    fn test_second_stage_replaces_first() {
        let mut session = Session::new(1, SessionSettings::default());
        session.stage(tokens(&["1111111111"]));
        session.stage(tokens(&["2222222222"]));
        assert!(session.commit_pending());
        assert_eq!(session.history.slot_count(), 1);
        assert_eq!(session.active_tokens(), ["2222222222"]);
        assert!(session.pending.is_none());
    }

    #[test]
    fn test_commit_pending_without_stage_is_noop() {
        let mut session = Session::new(1, SessionSettings::default());
        session.commit(tokens(&["5551234567"]));
        session.apply_next_transform().unwrap();
        assert!(!session.commit_pending());
        assert_eq!(session.history.current_index(), 1);
    }

    #[test]
    fn test_awaiting_input_flow() {
        let mut session = Session::new(1, SessionSettings::default());
        assert_eq!(session.answer_awaiting("5").unwrap(), None);

        session.begin_awaiting(AwaitingInput::PerPage);
        assert!(session.answer_awaiting("zero").is_err());
        assert_eq!(session.awaiting_input, Some(AwaitingInput::PerPage));
        assert_eq!(session.settings.per_page, 10);

        assert_eq!(
            session.answer_awaiting("25").unwrap(),
            Some(AwaitingInput::PerPage)
        );
        assert_eq!(session.settings.per_page, 25);
        assert!(session.awaiting_input.is_none());
    }

    #[test]
    fn test_rotate_id_keeps_history() {
        let mut session = Session::new(1, SessionSettings::default());
        session.commit(tokens(&["5551234567"]));
        let old_id = session.id.clone();
        session.rotate_id();
        assert_ne!(session.id, old_id);
        assert_eq!(session.active_tokens(), ["5551234567"]);
    }
}
