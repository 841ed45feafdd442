use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const WEATHER_API_KEY_ENV: &str = "BONSAI_WEATHER_API_KEY";

/// Largest UTC offset accepted for calendar-day computations (±14h).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Local document store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Weather observation settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Care scheduling settings
    #[serde(default)]
    pub care: CareConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the profile, reminder and session documents
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bonsai")
        .join("bonsai.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Access key for the weather service (can be set via environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the current-weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Location query used for the daily advisory (e.g. "Lyon,FR")
    #[serde(default)]
    pub location: String,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            location: String::new(),
        }
    }
}

impl WeatherConfig {
    /// True if a non-blank access key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareConfig {
    /// Optional JSON file replacing the built-in species table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_file: Option<PathBuf>,

    /// Offset from UTC, in minutes, that defines calendar days
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Environment wins over the file for the weather access key.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(WEATHER_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather.api_key = Some(key);
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "Weather access key not configured (set {}) - advisories unavailable",
                    WEATHER_API_KEY_ENV
                ),
            );
        }

        if self.weather.location.trim().is_empty() {
            result.add_warning("weather.location", "No weather location configured");
        }

        if self.care.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            result.add_error(
                "care.utc_offset_minutes",
                format!(
                    "Offset must be within ±{} minutes, got {}",
                    MAX_UTC_OFFSET_MINUTES, self.care.utc_offset_minutes
                ),
            );
        }

        if let Some(path) = &self.care.species_file {
            if !path.is_file() {
                result.add_error(
                    "care.species_file",
                    format!("Species file not found: {}", path.display()),
                );
            }
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("bonsai").join("config.toml"))
    }
}
