//! Terminal rendering of bot screens.
//!
//! Every screen gets a message id. The most recent message carrying a
//! keyboard is the "active" one; `#n` presses its n-th button.

use async_trait::async_trait;
use colored::Colorize;
use numsift_application::{Button, ButtonKind, MessageRef, RenderTarget, Screen};
use numsift_core::NumsiftError;
use numsift_core::document::ExportArtifact;
use numsift_core::error::Result;
use numsift_core::session::OwnerId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
struct Messages {
    next_id: i64,
    screens: HashMap<i64, Screen>,
    active: Option<MessageRef>,
}

impl Messages {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A pressed button, resolved against the active message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pressed {
    Callback { message: MessageRef, data: String },
    Link(String),
}

pub struct ConsoleRenderTarget {
    /// Exported files are written here
    export_dir: PathBuf,
    messages: Mutex<Messages>,
}

impl ConsoleRenderTarget {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            messages: Mutex::new(Messages::default()),
        }
    }

    fn messages(&self) -> std::sync::MutexGuard<'_, Messages> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves the `index`-th (1-based) button of the active message.
    pub fn press(&self, index: usize) -> Option<Pressed> {
        let messages = self.messages();
        let message = messages.active?;
        let keyboard = messages.screens.get(&message.message_id)?.keyboard.as_ref()?;
        let button = keyboard.rows.iter().flatten().nth(index.checked_sub(1)?)?;
        Some(match &button.kind {
            ButtonKind::Callback(action) => Pressed::Callback {
                message,
                data: action.to_string(),
            },
            ButtonKind::Url(url) => Pressed::Link(url.clone()),
        })
    }

    /// Reprints the active message, if any.
    pub fn show_active(&self) -> bool {
        let messages = self.messages();
        let Some(screen) = messages
            .active
            .and_then(|m| messages.screens.get(&m.message_id))
        else {
            return false;
        };
        print_screen(screen);
        true
    }

    fn remember(&self, message: MessageRef, screen: &Screen) {
        let mut messages = self.messages();
        messages.screens.insert(message.message_id, screen.clone());
        if screen.keyboard.is_some() {
            messages.active = Some(message);
        }
    }
}

#[async_trait]
impl RenderTarget for ConsoleRenderTarget {
    async fn send(&self, chat: OwnerId, screen: &Screen) -> Result<MessageRef> {
        let message = MessageRef {
            chat,
            message_id: self.messages().allocate(),
        };
        self.remember(message, screen);
        print_screen(screen);
        Ok(message)
    }

    async fn edit(&self, message: MessageRef, screen: &Screen) -> Result<()> {
        match self.messages().screens.get(&message.message_id) {
            None => {
                return Err(NumsiftError::internal(format!(
                    "message {} not found",
                    message.message_id
                )));
            }
            Some(current) if current == screen => return Err(NumsiftError::RenderNoop),
            Some(_) => {}
        }
        self.remember(message, screen);
        println!("{}", format!("(message {} updated)", message.message_id).bright_black());
        print_screen(screen);
        Ok(())
    }

    async fn send_document(&self, chat: OwnerId, artifact: &ExportArtifact) -> Result<MessageRef> {
        tokio::fs::create_dir_all(&self.export_dir).await?;
        let path = self.export_dir.join(&artifact.file_name);
        tokio::fs::write(&path, &artifact.bytes).await?;
        tracing::info!(chat, "Wrote export to {}", path.display());
        println!(
            "{}",
            format!("📎 {} ({} bytes)", path.display(), artifact.bytes.len()).bright_cyan()
        );
        Ok(MessageRef {
            chat,
            message_id: self.messages().allocate(),
        })
    }
}

fn print_screen(screen: &Screen) {
    for line in screen.text.lines() {
        println!("{}", line.bright_blue());
    }
    let Some(keyboard) = &screen.keyboard else {
        println!();
        return;
    };
    let mut number = 0;
    for row in &keyboard.rows {
        let labels: Vec<String> = row
            .iter()
            .map(|button| {
                number += 1;
                button_label(number, button)
            })
            .collect();
        println!("  {}", labels.join("  "));
    }
    println!();
}

fn button_label(number: usize, button: &Button) -> String {
    let label = format!("[#{number} {}]", button.label);
    match button.kind {
        ButtonKind::Callback(_) => label.yellow().to_string(),
        ButtonKind::Url(_) => label.bright_magenta().underline().to_string(),
    }
}
