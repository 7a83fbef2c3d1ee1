//! Error types for the Nexus application.

use thiserror::Error;

/// Failures of the storage and configuration layers.
///
/// Gateway and voice failures have their own types
/// ([`GatewayError`](crate::provider::GatewayError),
/// [`VoiceError`](crate::voice::VoiceError)) because callers branch on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NexusError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("I/O failure: {0}")]
    Io(String),

    /// A file on disk could not be parsed or rendered.
    #[error("Invalid {format} data: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Broken invariant inside the application.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NexusError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn serialization(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            format,
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for NexusError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(format!("{err} ({:?})", err.kind()))
    }
}

impl From<serde_json::Error> for NexusError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err)
    }
}

impl From<toml::de::Error> for NexusError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization("TOML", err)
    }
}

impl From<toml::ser::Error> for NexusError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization("TOML", err)
    }
}

pub type Result<T> = std::result::Result<T, NexusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: NexusError = io.into();
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_toml_error_is_serialization() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: NexusError = parse.unwrap_err().into();
        assert!(matches!(err, NexusError::Serialization { format: "TOML", .. }));
    }

    #[test]
    fn test_not_found_message_names_the_key() {
        let err = NexusError::not_found("persona", "email");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "persona 'email' not found");
        assert!(NexusError::config("missing orchestrator").is_config());
        assert!(!NexusError::internal("boom").is_not_found());
    }
}
