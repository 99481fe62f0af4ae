//! Application layer for numsift.
//!
//! This crate turns inbound chat events into session-engine calls and the
//! screens to render afterwards. Transports plug in through
//! [`render::RenderTarget`].

pub mod action;
pub mod dispatcher;
pub mod menus;
pub mod render;
pub mod screen;
pub mod session_usecase;

pub use action::Action;
pub use dispatcher::{Dispatcher, EventKind, InboundEvent};
pub use render::{MessageRef, RenderOutcome, RenderTarget, Renderer};
pub use screen::{Button, ButtonKind, Keyboard, Screen};
pub use session_usecase::{Outgoing, SessionUseCase};
