//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/numsift/config.toml by default).

use crate::paths::NumsiftPaths;
use numsift_core::config::RootConfig;
use numsift_core::error::{NumsiftError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Environment variable overriding `bot.api_token`.
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the defaults; a malformed file is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// File the configuration is read from
    path: PathBuf,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService for the default config location.
    pub fn new() -> Result<Self> {
        let path = NumsiftPaths::config_file().map_err(|e| NumsiftError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a ConfigService reading from `path`.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let mut loaded = Self::load_config(&self.path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
    }

    fn load_config(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(RootConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = RootConfig::from_toml_str(&content).map_err(|e| match e {
            NumsiftError::Serialization { message, .. } => {
                NumsiftError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        tracing::debug!(
            "Loaded config from {} ({} required channel(s))",
            path.display(),
            config.channels.len()
        );
        Ok(config)
    }
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
        config.bot.api_token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        let config = service.get_config().unwrap();
        assert_eq!(config.session.per_page, 10);
        assert_eq!(config.channels.len(), 3);
    }

    #[test]
    fn test_reads_and_caches_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[session]\nper_page = 4").unwrap();
        drop(file);

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().unwrap().session.per_page, 4);

        std::fs::write(&path, "[session]\nper_page = 8\n").unwrap();
        assert_eq!(service.get_config().unwrap().session.per_page, 4);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().session.per_page, 8);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session\nper_page = ").unwrap();
        let err = ConfigService::with_path(&path).get_config().unwrap_err();
        assert!(err.is_config(), "unexpected error: {err:?}");
    }

    #[test]
    fn test_bot_token_override() {
        let mut config = RootConfig::default();
        apply_env_overrides(&mut config, |_| Some("123:abc".to_string()));
        assert_eq!(config.bot.api_token.as_deref(), Some("123:abc"));

        let mut config = RootConfig::default();
        apply_env_overrides(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.bot.api_token, None);
    }
}
