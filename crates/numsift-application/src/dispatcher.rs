//! Routes inbound transport events to the use case and renders the result.
//!
//! Every error kind of the session engine is handled here and turned into a
//! prompt; only transport failures reach the caller.

use crate::action::Action;
use crate::menus;
use crate::render::{MessageRef, Renderer};
use crate::screen::Screen;
use crate::session_usecase::{Outgoing, SessionUseCase};
use anyhow::Result;
use numsift_core::NumsiftError;
use numsift_core::session::OwnerId;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub owner: OwnerId,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/start`
    Start,
    /// `/stop`
    Stop,
    /// Plain text message
    Text(String),
    /// Uploaded file, already downloaded to `path`
    Document { file_name: String, path: PathBuf },
    /// Inline button press on `message`
    Button { message: MessageRef, data: String },
}

pub struct Dispatcher {
    usecase: Arc<SessionUseCase>,
    renderer: Arc<Renderer>,
}

impl Dispatcher {
    pub fn new(usecase: Arc<SessionUseCase>, renderer: Arc<Renderer>) -> Self {
        Self { usecase, renderer }
    }

    /// Handles one event end to end.
    ///
    /// # Errors
    ///
    /// Only transport failures are returned; session-level errors become
    /// prompts.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<()> {
        let owner = event.owner;

        let (result, message) = match &event.kind {
            EventKind::Start => (self.usecase.start(owner).await, None),
            EventKind::Stop => (self.usecase.stop(owner).await, None),
            EventKind::Text(text) => (self.usecase.handle_text(owner, text).await, None),
            EventKind::Document { file_name, path } => (
                self.usecase.handle_document(owner, file_name, path).await,
                None,
            ),
            EventKind::Button { message, data } => {
                let action = match data.parse::<Action>() {
                    Ok(action) => action,
                    Err(e) => {
                        tracing::warn!(owner, "Ignoring button press: {}", e);
                        return Ok(());
                    }
                };
                (self.usecase.handle_action(owner, action).await, Some(*message))
            }
        };

        let replies = match result {
            Ok(replies) => replies,
            Err(e) => {
                tracing::debug!(owner, "Event ended in {:?}", e);
                match self.notice_for(&e, &event.kind) {
                    Some(screen) if message.is_some() => vec![Outgoing::Edit(screen)],
                    Some(screen) => vec![Outgoing::Send(screen)],
                    None => Vec::new(),
                }
            }
        };
        self.deliver(owner, message, replies).await?;

        if event.kind == EventKind::Stop {
            self.renderer.forget(owner).await;
        }
        Ok(())
    }

    async fn deliver(
        &self,
        owner: OwnerId,
        message: Option<MessageRef>,
        replies: Vec<Outgoing>,
    ) -> Result<()> {
        for reply in replies {
            match (reply, message) {
                (Outgoing::Edit(screen), Some(message)) => {
                    self.renderer.edit(message, screen).await?;
                }
                (Outgoing::Edit(screen), None) | (Outgoing::Send(screen), _) => {
                    self.renderer.send(owner, screen).await?;
                }
                (Outgoing::Document(artifact), _) => {
                    self.renderer.send_document(owner, &artifact).await?;
                }
            }
        }
        Ok(())
    }

    /// The prompt shown for an error, if any.
    fn notice_for(&self, err: &NumsiftError, origin: &EventKind) -> Option<Screen> {
        let text = match err {
            NumsiftError::GateNotPassed { missing } => {
                return Some(menus::join_menu(self.usecase.channels(), missing));
            }
            NumsiftError::RenderNoop => return None,
            NumsiftError::ExpiredSession { .. } => menus::EXPIRED_TEXT,
            NumsiftError::NoData => match origin {
                EventKind::Text(_) => menus::NO_NUMBERS_FOUND_TEXT,
                EventKind::Document { .. } => menus::NO_NUMBERS_IN_FILE_TEXT,
                EventKind::Start | EventKind::Stop | EventKind::Button { .. } => {
                    menus::NO_NUMBERS_YET_TEXT
                }
            },
            NumsiftError::InvalidSettingValue { .. } => menus::INVALID_NUMBER_TEXT,
            NumsiftError::UnsupportedInputFormat { .. } => menus::UNSUPPORTED_FILE_TEXT,
            other => {
                tracing::error!("Unhandled error while dispatching: {}", other);
                menus::INTERNAL_ERROR_TEXT
            }
        };
        Some(Screen::text(text))
    }
}
