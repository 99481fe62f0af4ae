//! Error types for numsift.

use thiserror::Error;

/// A shared error type for the whole numsift workspace.
///
/// The first six variants are the user-facing taxonomy: every one of them is
/// handled locally by the dispatcher and turned into a prompt. The remaining
/// variants cover ambient failures (files, config parsing) that adapters may
/// surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumsiftError {
    /// Operation against an unknown or evicted session
    #[error("Session expired for owner {owner}")]
    ExpiredSession { owner: i64 },

    /// Pagination, export or transform on an empty base list
    #[error("No numbers available")]
    NoData,

    /// Non-positive or non-numeric settings input
    #[error("Invalid setting value: '{input}'")]
    InvalidSettingValue { input: String },

    /// Disallowed upload extension
    #[error("Unsupported input format: '{extension}'")]
    UnsupportedInputFormat { extension: String },

    /// Blocked state: the owner is missing at least one required channel.
    /// `missing` holds indices into the configured channel list.
    #[error("Access gate not passed ({} channel(s) missing)", .missing.len())]
    GateNotPassed { missing: Vec<usize> },

    /// Transport-level "message is not modified"
    #[error("Render produced no change")]
    RenderNoop,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NumsiftError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an ExpiredSession error
    pub fn expired(owner: i64) -> Self {
        Self::ExpiredSession { owner }
    }

    /// Creates a NoData error
    pub fn no_data() -> Self {
        Self::NoData
    }

    /// Creates an InvalidSettingValue error
    pub fn invalid_setting(input: impl Into<String>) -> Self {
        Self::InvalidSettingValue {
            input: input.into(),
        }
    }

    /// Creates an UnsupportedInputFormat error
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedInputFormat {
            extension: extension.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an ExpiredSession error
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::ExpiredSession { .. })
    }

    /// Check if this is a NoData error
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Check if this is a gate block rather than a failure
    pub fn is_gate_block(&self) -> bool {
        matches!(self, Self::GateNotPassed { .. })
    }

    /// Check if this is a render no-op
    pub fn is_render_noop(&self) -> bool {
        matches!(self, Self::RenderNoop)
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for NumsiftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for NumsiftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used where adapters report through anyhow
impl From<anyhow::Error> for NumsiftError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, NumsiftError>`.
pub type Result<T> = std::result::Result<T, NumsiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(NumsiftError::expired(7).is_expired());
        assert!(NumsiftError::no_data().is_no_data());
        assert!(NumsiftError::GateNotPassed { missing: vec![0, 2] }.is_gate_block());
        assert!(NumsiftError::RenderNoop.is_render_noop());
        assert!(!NumsiftError::internal("x").is_expired());
    }

    #[test]
    fn test_gate_message_counts_missing_channels() {
        let err = NumsiftError::GateNotPassed { missing: vec![0, 2] };
        assert_eq!(err.to_string(), "Access gate not passed (2 channel(s) missing)");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: NumsiftError = io.into();
        assert!(matches!(err, NumsiftError::Io { ref message } if message.contains("NotFound")));
    }
}
