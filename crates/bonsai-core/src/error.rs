//! Configuration error types shared by the binary and the library crates.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory unavailable")]
    NoConfigDir,

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => "Could not locate a configuration directory.",
            ConfigError::Io(_) => "Configuration file could not be accessed.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::SerializeError(_) => "Failed to save settings. Please try again.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_missing_setting_message() {
        let err = ConfigError::MissingSetting("weather.api_key".into());
        assert!(err.to_string().contains("weather.api_key"));
        assert_eq!(
            err.user_message(),
            "A required setting is missing. Check your settings."
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
