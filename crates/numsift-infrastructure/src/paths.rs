//! Path resolution for numsift configuration files.

use std::path::PathBuf;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "NUMSIFT_CONFIG";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path management for numsift.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/numsift/          # Config directory (platform default via `dirs`)
/// └── config.toml             # Bot configuration
/// ```
pub struct NumsiftPaths;

impl NumsiftPaths {
    /// Returns the numsift configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("numsift"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the config file path, honouring [`CONFIG_ENV`].
    pub fn config_file() -> Result<PathBuf, PathError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(Self::config_dir()?.join("config.toml")),
        }
    }
}
