//! Error types for KeepAlive
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither the manufacturer document nor the default document exists
    #[error("No configuration document found for manufacturer '{manufacturer}'")]
    NotFound { manufacturer: String },

    /// A document exists but does not describe a valid configuration
    #[error("Malformed configuration document '{document}': {reason}")]
    Malformed { document: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Application config error: {0}")]
    AppConfig(String),
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn malformed(document: &str, reason: impl Into<String>) -> Self {
        ConfigError::Malformed {
            document: document.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the capability list cannot be presented
    pub fn is_missing_personalization(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. } | ConfigError::Malformed { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NotFound { .. } | ConfigError::Malformed { .. } => {
                "Personalization data for this device is unavailable".to_string()
            }
            ConfigError::Io(e) => format!("File operation failed: {}", e),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_details() {
        let not_found = ConfigError::NotFound { manufacturer: "acme".into() };
        let malformed = ConfigError::malformed("acme.json", "bad id");

        assert_eq!(not_found.user_message(), malformed.user_message());
        assert!(not_found.is_missing_personalization());
        assert!(malformed.to_string().contains("acme.json"));
    }
}
