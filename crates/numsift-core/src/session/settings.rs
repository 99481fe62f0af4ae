//! Per-session display tunables and the "awaiting input" sub-state.

use crate::error::{NumsiftError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 10;

/// Tunables applied on the next render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Page size, always positive
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// Offer "show all" regardless of list size
    #[serde(default)]
    pub show_all_enabled: bool,
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            show_all_enabled: false,
        }
    }
}

impl SessionSettings {
    pub fn toggle_show_all(&mut self) -> bool {
        self.show_all_enabled = !self.show_all_enabled;
        self.show_all_enabled
    }
}

/// Marks that the next plain-text message answers a settings prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwaitingInput {
    PerPage,
}

/// Parses a settings answer as a positive integer.
///
/// # Errors
///
/// Returns [`NumsiftError::InvalidSettingValue`] for non-numeric, zero or
/// negative input.
pub fn parse_positive(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(value) if value > 0 => {
            usize::try_from(value).map_err(|_| NumsiftError::invalid_setting(trimmed))
        }
        _ => Err(NumsiftError::invalid_setting(trimmed)),
    }
}
