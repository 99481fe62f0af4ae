//! Session engine for the numsift bot.
//!
//! Pure building blocks (extraction, transforms, pagination) plus the stateful
//! pieces that tie them together per owner (session store, access gate), and
//! the ports the outer layers implement.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod gate;
pub mod session;
pub mod transform;
pub mod view;

// Re-export common error type
pub use error::NumsiftError;
