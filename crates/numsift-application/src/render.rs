//! Render boundary between the dispatcher and the messaging transport.
//!
//! Re-rendering identical content must be a silent no-op. `Renderer` detects
//! it up front by remembering the last screen put into each chat's active
//! message, and also swallows [`NumsiftError::RenderNoop`] when the transport
//! reports it after the fact.

use crate::screen::Screen;
use async_trait::async_trait;
use numsift_core::NumsiftError;
use numsift_core::document::ExportArtifact;
use numsift_core::error::Result;
use numsift_core::session::OwnerId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Address of a message the transport has delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat: OwnerId,
    pub message_id: i64,
}

/// The messaging transport, as seen by the bot.
///
/// `edit` reports "content not modified" as [`NumsiftError::RenderNoop`].
#[async_trait]
pub trait RenderTarget: Send + Sync {
    async fn send(&self, chat: OwnerId, screen: &Screen) -> Result<MessageRef>;
    async fn edit(&self, message: MessageRef, screen: &Screen) -> Result<()>;
    async fn send_document(&self, chat: OwnerId, artifact: &ExportArtifact) -> Result<MessageRef>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Sent(MessageRef),
    Edited,
    /// The edit would not change anything; nothing was sent
    Unchanged,
}

/// Last screen rendered into a chat, with the message it went into.
type ChatSlot = Arc<Mutex<Option<(MessageRef, Screen)>>>;

/// Wraps a [`RenderTarget`] with no-op detection.
///
/// Renders into one chat are serialized: the chat's slot stays locked across
/// the comparison, the transport call and the update of the remembered
/// screen, so overlapping events cannot record a screen the transport no
/// longer shows.
pub struct Renderer {
    target: Arc<dyn RenderTarget>,
    chats: Mutex<HashMap<OwnerId, ChatSlot>>,
}

impl Renderer {
    pub fn new(target: Arc<dyn RenderTarget>) -> Self {
        Self {
            target,
            chats: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, chat: OwnerId) -> ChatSlot {
        self.chats.lock().await.entry(chat).or_default().clone()
    }

    pub async fn send(&self, chat: OwnerId, screen: Screen) -> Result<RenderOutcome> {
        let slot = self.slot(chat).await;
        let mut last = slot.lock().await;
        let message = self.target.send(chat, &screen).await?;
        *last = Some((message, screen));
        Ok(RenderOutcome::Sent(message))
    }

    pub async fn edit(&self, message: MessageRef, screen: Screen) -> Result<RenderOutcome> {
        let slot = self.slot(message.chat).await;
        let mut last = slot.lock().await;
        if let Some((previous, content)) = last.as_ref() {
            if *previous == message && *content == screen {
                tracing::debug!(chat = message.chat, "Skipping unchanged edit");
                return Ok(RenderOutcome::Unchanged);
            }
        }
        match self.target.edit(message, &screen).await {
            Ok(()) => {
                *last = Some((message, screen));
                Ok(RenderOutcome::Edited)
            }
            Err(NumsiftError::RenderNoop) => {
                tracing::debug!(chat = message.chat, "Transport reported unchanged edit");
                *last = Some((message, screen));
                Ok(RenderOutcome::Unchanged)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn send_document(
        &self,
        chat: OwnerId,
        artifact: &ExportArtifact,
    ) -> Result<RenderOutcome> {
        let message = self.target.send_document(chat, artifact).await?;
        Ok(RenderOutcome::Sent(message))
    }

    /// Drops everything remembered for `chat`.
    pub async fn forget(&self, chat: OwnerId) {
        if self.chats.lock().await.remove(&chat).is_some() {
            tracing::debug!(chat, "Forgot rendered screens");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Records every transport call; `edit` can be told to report no-ops.
    #[derive(Default)]
    pub(crate) struct RecordingTarget {
        pub sent: StdMutex<Vec<(OwnerId, Screen)>>,
        pub edits: StdMutex<Vec<(MessageRef, Screen)>>,
        pub documents: StdMutex<Vec<(OwnerId, ExportArtifact)>>,
        pub report_noop: StdMutex<bool>,
        pub fail_edits: StdMutex<bool>,
    }

    #[async_trait]
    impl RenderTarget for RecordingTarget {
        async fn send(&self, chat: OwnerId, screen: &Screen) -> Result<MessageRef> {
            let mut sent = self.sent.lock().unwrap();
            sent.push((chat, screen.clone()));
            Ok(MessageRef {
                chat,
                message_id: sent.len() as i64,
            })
        }

        async fn edit(&self, message: MessageRef, screen: &Screen) -> Result<()> {
            if *self.fail_edits.lock().unwrap() {
                return Err(NumsiftError::internal("transport down"));
            }
            if *self.report_noop.lock().unwrap() {
                return Err(NumsiftError::RenderNoop);
            }
            self.edits.lock().unwrap().push((message, screen.clone()));
            Ok(())
        }

        async fn send_document(
            &self,
            chat: OwnerId,
            artifact: &ExportArtifact,
        ) -> Result<MessageRef> {
            let mut documents = self.documents.lock().unwrap();
            documents.push((chat, artifact.clone()));
            Ok(MessageRef {
                chat,
                message_id: 1000 + documents.len() as i64,
            })
        }
    }

    #[tokio::test]
    async fn test_identical_edit_is_skipped() {
        let target = Arc::new(RecordingTarget::default());
        let renderer = Renderer::new(target.clone());

        let outcome = renderer.send(1, Screen::text("menu")).await.unwrap();
        let RenderOutcome::Sent(message) = outcome else {
            panic!("expected Sent, got {outcome:?}");
        };

        assert_eq!(
            renderer.edit(message, Screen::text("menu")).await.unwrap(),
            RenderOutcome::Unchanged
        );
        assert_eq!(
            renderer.edit(message, Screen::text("page")).await.unwrap(),
            RenderOutcome::Edited
        );
        assert_eq!(
            renderer.edit(message, Screen::text("page")).await.unwrap(),
            RenderOutcome::Unchanged
        );
        assert_eq!(target.edits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_noop_is_swallowed() {
        let target = Arc::new(RecordingTarget::default());
        *target.report_noop.lock().unwrap() = true;
        let renderer = Renderer::new(target.clone());

        let message = MessageRef {
            chat: 1,
            message_id: 7,
        };
        assert_eq!(
            renderer.edit(message, Screen::text("menu")).await.unwrap(),
            RenderOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn test_other_transport_errors_propagate() {
        let target = Arc::new(RecordingTarget::default());
        *target.fail_edits.lock().unwrap() = true;
        let renderer = Renderer::new(target.clone());

        let message = MessageRef {
            chat: 1,
            message_id: 7,
        };
        let err = renderer.edit(message, Screen::text("menu")).await.unwrap_err();
        assert!(!err.is_render_noop());
    }

    #[tokio::test]
    async fn test_edit_of_other_message_is_not_skipped() {
        let target = Arc::new(RecordingTarget::default());
        let renderer = Renderer::new(target.clone());
        renderer.send(1, Screen::text("menu")).await.unwrap();

        let older = MessageRef {
            chat: 1,
            message_id: 99,
        };
        assert_eq!(
            renderer.edit(older, Screen::text("menu")).await.unwrap(),
            RenderOutcome::Edited
        );
    }

    /// Shows edits immediately but is slow to acknowledge screens titled "A".
    #[derive(Default)]
    struct SlowAckTarget {
        shown: StdMutex<Option<Screen>>,
    }

    #[async_trait]
    impl RenderTarget for SlowAckTarget {
        async fn send(&self, chat: OwnerId, screen: &Screen) -> Result<MessageRef> {
            *self.shown.lock().unwrap() = Some(screen.clone());
            Ok(MessageRef {
                chat,
                message_id: 1,
            })
        }

        async fn edit(&self, _message: MessageRef, screen: &Screen) -> Result<()> {
            *self.shown.lock().unwrap() = Some(screen.clone());
            if screen.text == "A" {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            Ok(())
        }

        async fn send_document(
            &self,
            chat: OwnerId,
            _artifact: &ExportArtifact,
        ) -> Result<MessageRef> {
            Ok(MessageRef {
                chat,
                message_id: 2,
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_overlapping_edits_keep_remembered_screen_accurate() {
        let target = Arc::new(SlowAckTarget::default());
        let renderer = Arc::new(Renderer::new(target.clone()));
        let RenderOutcome::Sent(message) = renderer.send(1, Screen::text("menu")).await.unwrap()
        else {
            panic!("expected Sent");
        };

        let slow = {
            let renderer = renderer.clone();
            tokio::spawn(async move { renderer.edit(message, Screen::text("A")).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        renderer.edit(message, Screen::text("B")).await.unwrap();
        slow.await.unwrap().unwrap();
        assert_eq!(target.shown.lock().unwrap().as_ref().unwrap().text, "B");

        assert_eq!(
            renderer.edit(message, Screen::text("A")).await.unwrap(),
            RenderOutcome::Edited
        );
        assert_eq!(target.shown.lock().unwrap().as_ref().unwrap().text, "A");
    }

    #[tokio::test]
    async fn test_forget_drops_remembered_screen() {
        let target = Arc::new(RecordingTarget::default());
        let renderer = Renderer::new(target.clone());
        let RenderOutcome::Sent(message) = renderer.send(1, Screen::text("menu")).await.unwrap()
        else {
            panic!("expected Sent");
        };

        renderer.forget(1).await;
        assert_eq!(
            renderer.edit(message, Screen::text("menu")).await.unwrap(),
            RenderOutcome::Edited
        );
        assert_eq!(target.edits.lock().unwrap().len(), 1);
    }
}
