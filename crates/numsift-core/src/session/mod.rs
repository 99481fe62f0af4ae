//! Session domain module.
//!
//! This module contains the per-owner session model, its transform history,
//! the settings sub-state, and the process-wide session store.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `history`: Generation slots per transform kind (`TransformHistory`)
//! - `settings`: Display tunables and the awaiting-input tag
//! - `store`: Session registry with per-session locking (`SessionStore`)

mod history;
mod model;
mod settings;
mod store;

// Re-export public API
pub use history::TransformHistory;
pub use model::{OwnerId, Session};
pub use settings::{AwaitingInput, DEFAULT_PER_PAGE, SessionSettings, parse_positive};
pub use store::{SessionHandle, SessionStore};
