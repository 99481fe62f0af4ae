//! Root configuration model.
//!
//! Loaded from `config.toml` by the infrastructure `ConfigService`; every
//! field has a default so an empty or missing file is a valid config.

use crate::error::{NumsiftError, Result};
use crate::gate::{RequiredChannel, default_channels};
use crate::session::{OwnerId, SessionSettings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text ingestions at or above this many tokens trigger a warning.
pub const DEFAULT_TEXT_LIMIT: usize = 335;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub bot: BotSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(rename = "channel", default = "default_channels")]
    pub channels: Vec<RequiredChannel>,
    /// Static membership table: chat id to member owner ids
    #[serde(default)]
    pub membership: HashMap<String, Vec<OwnerId>>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            bot: BotSettings::default(),
            session: SessionSettings::default(),
            channels: default_channels(),
            membership: HashMap::new(),
        }
    }
}

impl RootConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RootConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the session engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.session.per_page == 0 {
            return Err(NumsiftError::config("session.per_page must be positive"));
        }
        if self.bot.text_limit == 0 {
            return Err(NumsiftError::config("bot.text_limit must be positive"));
        }
        if let Some(channel) = self.channels.iter().find(|c| c.chat_id.trim().is_empty()) {
            return Err(NumsiftError::config(format!(
                "channel '{}' has an empty chat_id",
                channel.name
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BotSettings {
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Bot API token; enables the HTTP membership oracle when set
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_text_limit() -> usize {
    DEFAULT_TEXT_LIMIT
}

fn default_temp_dir() -> String {
    "temp_files".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            text_limit: default_text_limit(),
            temp_dir: default_temp_dir(),
            log_level: default_log_level(),
            api_token: None,
        }
    }
}
