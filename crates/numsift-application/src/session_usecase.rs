//! Session use case implementation.
//!
//! `SessionUseCase` turns one inbound event into session mutations and the
//! screens that should be shown afterwards. It coordinates the session store,
//! the access gate and the document collaborators; it never talks to the
//! transport itself.

use crate::action::Action;
use crate::menus;
use crate::screen::Screen;
use numsift_core::NumsiftError;
use numsift_core::document::{DocumentDecoder, ExportArtifact, ExportFormat, Exporter, InputFormat};
use numsift_core::error::Result;
use numsift_core::extract::extract_distinct;
use numsift_core::gate::{AccessGate, RequiredChannel};
use numsift_core::session::{AwaitingInput, OwnerId, SessionStore};
use numsift_core::view::render_page;
use std::path::Path;
use std::sync::Arc;

/// Something to deliver after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Reply with a new message
    Send(Screen),
    /// Replace the content of the message whose button was pressed
    Edit(Screen),
    /// Deliver an exported file
    Document(ExportArtifact),
}

/// Whether a token list ended up in history or in the staging slot.
enum Ingested {
    Committed,
    Staged(Vec<usize>),
}

pub struct SessionUseCase {
    /// Live sessions, one lock per owner
    store: Arc<SessionStore>,
    /// Membership check across required channels
    gate: Arc<AccessGate>,
    /// Upload decoding collaborator
    decoder: Arc<dyn DocumentDecoder>,
    /// Export encoding collaborator
    exporter: Arc<dyn Exporter>,
    /// Text ingestions at or above this size get a warning first
    text_limit: usize,
}

impl SessionUseCase {
    pub fn new(
        store: Arc<SessionStore>,
        gate: Arc<AccessGate>,
        decoder: Arc<dyn DocumentDecoder>,
        exporter: Arc<dyn Exporter>,
        text_limit: usize,
    ) -> Self {
        Self {
            store,
            gate,
            decoder,
            exporter,
            text_limit,
        }
    }

    pub fn channels(&self) -> &[RequiredChannel] {
        self.gate.channels()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// `/start`: creates a fresh session, then shows the main menu or the
    /// join prompt.
    pub async fn start(&self, owner: OwnerId) -> Result<Vec<Outgoing>> {
        self.store.start(owner).await;
        self.gate.check(owner).await.into_result()?;
        let session = self.store.lock(owner).await?;
        Ok(vec![Outgoing::Send(menus::main_menu(&session))])
    }

    /// `/stop`: ends the owner's session. Later events other than `/start`
    /// see an expired session.
    pub async fn stop(&self, owner: OwnerId) -> Result<Vec<Outgoing>> {
        if !self.store.evict(owner).await {
            return Err(NumsiftError::expired(owner));
        }
        Ok(vec![Outgoing::Send(Screen::text(menus::SESSION_ENDED_TEXT))])
    }

    /// Plain text: answers a pending settings prompt, otherwise ingests the
    /// numbers it contains.
    pub async fn handle_text(&self, owner: OwnerId, text: &str) -> Result<Vec<Outgoing>> {
        {
            let mut session = self.store.lock(owner).await?;
            if let Some(tag) = session.answer_awaiting(text)? {
                tracing::debug!(owner, ?tag, per_page = session.settings.per_page, "Setting updated");
                return Ok(vec![Outgoing::Send(menus::settings_menu(&session.settings))]);
            }
        }

        let tokens = extract_distinct(text);
        if tokens.is_empty() {
            return Err(NumsiftError::no_data());
        }
        let count = tokens.len();
        if let Ingested::Staged(missing) = self.ingest(owner, tokens).await? {
            return Err(NumsiftError::GateNotPassed { missing });
        }

        let mut replies = Vec::new();
        if count >= self.text_limit {
            replies.push(Outgoing::Send(menus::large_dataset_warning(count, self.text_limit)));
        }
        let session = self.store.lock(owner).await?;
        replies.push(Outgoing::Send(menus::main_menu(&session)));
        Ok(replies)
    }

    /// Uploaded file: checks the extension, decodes, then ingests.
    pub async fn handle_document(
        &self,
        owner: OwnerId,
        file_name: &str,
        path: &Path,
    ) -> Result<Vec<Outgoing>> {
        if self.store.get(owner).await.is_none() {
            return Err(NumsiftError::expired(owner));
        }
        let format = InputFormat::from_file_name(file_name)?;
        let raw = self.decoder.decode(path, format).await.map_err(|e| {
            tracing::warn!(owner, file_name, "Failed to decode upload: {:#}", e);
            NumsiftError::no_data()
        })?;

        let tokens = extract_distinct(&raw);
        if tokens.is_empty() {
            return Err(NumsiftError::no_data());
        }
        if let Ingested::Staged(missing) = self.ingest(owner, tokens).await? {
            return Err(NumsiftError::GateNotPassed { missing });
        }
        let session = self.store.lock(owner).await?;
        Ok(vec![Outgoing::Send(menus::file_processed(&session))])
    }

    /// Runs the gate, then commits or stages `tokens`.
    ///
    /// The session lock is taken only after the membership queries finish.
    async fn ingest(&self, owner: OwnerId, tokens: Vec<String>) -> Result<Ingested> {
        let report = self.gate.check(owner).await;
        let mut session = self.store.lock(owner).await?;
        if report.passed() {
            session.commit(tokens);
            Ok(Ingested::Committed)
        } else {
            tracing::info!(owner, count = tokens.len(), "Gate not passed, staging input");
            session.stage(tokens);
            Ok(Ingested::Staged(report.missing()))
        }
    }

    /// Inline button press. Every screen replaces the pressed message.
    pub async fn handle_action(&self, owner: OwnerId, action: Action) -> Result<Vec<Outgoing>> {
        if self.store.get(owner).await.is_none() {
            return Err(NumsiftError::expired(owner));
        }
        match action {
            Action::CheckJoins => {
                self.gate.check(owner).await.into_result()?;
                let mut session = self.store.lock(owner).await?;
                if session.commit_pending() {
                    tracing::info!(owner, "Committed staged input after recheck");
                }
                Ok(vec![Outgoing::Edit(menus::main_menu(&session))])
            }
            Action::NewSeason => {
                let mut session = self.store.lock(owner).await?;
                session.rotate_id();
                Ok(vec![Outgoing::Edit(menus::new_season(&session))])
            }
            Action::Export => Ok(vec![Outgoing::Edit(menus::export_menu())]),
            Action::ExportAs(format) => self.export(owner, format).await,
            Action::View { offset, show_all } => {
                let session = self.store.lock(owner).await?;
                let view = render_page(session.active_tokens(), offset, show_all, &session.settings)?;
                Ok(vec![Outgoing::Edit(menus::page(&view))])
            }
            Action::Transform => {
                let mut session = self.store.lock(owner).await?;
                let kind = session.apply_next_transform()?;
                Ok(vec![Outgoing::Edit(menus::transform_applied(&session, kind))])
            }
            Action::Settings => {
                let session = self.store.lock(owner).await?;
                Ok(vec![Outgoing::Edit(menus::settings_menu(&session.settings))])
            }
            Action::ToggleShowAll => {
                let mut session = self.store.lock(owner).await?;
                session.settings.toggle_show_all();
                Ok(vec![Outgoing::Edit(menus::settings_menu(&session.settings))])
            }
            Action::SetPerPage => {
                let mut session = self.store.lock(owner).await?;
                session.begin_awaiting(AwaitingInput::PerPage);
                Ok(vec![Outgoing::Edit(menus::per_page_prompt(&session.settings))])
            }
            Action::BackToMenu => {
                let session = self.store.lock(owner).await?;
                Ok(vec![Outgoing::Edit(menus::main_menu(&session))])
            }
        }
    }

    async fn export(&self, owner: OwnerId, format: ExportFormat) -> Result<Vec<Outgoing>> {
        let (tokens, done) = {
            let session = self.store.lock(owner).await?;
            let tokens = session.active_tokens().to_vec();
            if tokens.is_empty() {
                return Err(NumsiftError::no_data());
            }
            (tokens, menus::export_complete(&session))
        };
        let artifact = self.exporter.export(&tokens, format, owner).await?;
        tracing::info!(owner, file_name = %artifact.file_name, count = tokens.len(), "Exported list");
        Ok(vec![Outgoing::Document(artifact), Outgoing::Edit(done)])
    }
}
