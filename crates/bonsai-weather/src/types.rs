use serde::{Deserialize, Serialize};

/// A point-in-time environmental observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub temperature_c: f64,
    pub condition_text: String,
}

impl Observation {
    pub fn new(temperature_c: f64, condition_text: impl Into<String>) -> Self {
        Self {
            temperature_c,
            condition_text: condition_text.into(),
        }
    }

    pub fn kind(&self) -> ConditionKind {
        ConditionKind::classify(&self.condition_text)
    }
}

/// Coarse condition categories recognised in free condition text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Other,
}

impl ConditionKind {
    /// Classify condition text by keyword, case-insensitively.
    ///
    /// Precipitation wins over cloud cover ("light rain, overcast" is rain).
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if has(&["thunder", "storm"]) {
            Self::Thunderstorm
        } else if has(&["snow", "sleet", "hail"]) {
            Self::Snow
        } else if has(&["rain", "drizzle", "shower"]) {
            Self::Rain
        } else if has(&["cloud", "overcast", "fog", "mist"]) {
            Self::Cloudy
        } else if has(&["clear", "sun"]) {
            Self::Clear
        } else {
            Self::Other
        }
    }

    pub fn is_wet(&self) -> bool {
        matches!(self, Self::Rain | Self::Thunderstorm)
    }
}

/// Weather fetch errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather configuration error: {0}")]
    Configuration(String),
    #[error("Location not found: {0}")]
    NotFound(String),
    #[error("Weather service returned {status}: {message}")]
    Transport { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Configuration(_) => "Weather access key is missing. Check settings.",
            WeatherError::NotFound(_) => "Location not found. Check and try again.",
            WeatherError::Transport { status, .. } if *status == 401 => {
                "Weather access key is invalid. Check settings."
            }
            WeatherError::Transport { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            WeatherError::Transport { .. } => "Weather service error. Please try again.",
            WeatherError::Network(_) => "Unable to reach the weather service. Check your connection.",
            WeatherError::Parse(_) => "Received an unexpected weather response.",
        }
    }

    /// HTTP status of a remote failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            WeatherError::Transport { status, .. } => Some(*status),
            WeatherError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_classify_clear() {
        assert_eq!(ConditionKind::classify("clear sky"), ConditionKind::Clear);
        assert_eq!(ConditionKind::classify("Sunny"), ConditionKind::Clear);
    }

    #[test]
    fn test_classify_rain_beats_cloud() {
        assert_eq!(
            ConditionKind::classify("light rain, overcast clouds"),
            ConditionKind::Rain
        );
        assert_eq!(ConditionKind::classify("Drizzle"), ConditionKind::Rain);
    }

    #[test]
    fn test_classify_snow_and_storm() {
        assert_eq!(ConditionKind::classify("heavy snow"), ConditionKind::Snow);
        assert_eq!(
            ConditionKind::classify("thunderstorm with rain"),
            ConditionKind::Thunderstorm
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(ConditionKind::classify("smoke"), ConditionKind::Other);
        assert_eq!(ConditionKind::classify(""), ConditionKind::Other);
    }

    #[test]
    fn test_observation_serializes_camel_case() {
        let obs = Observation::new(21.5, "clear");
        let json = serde_json::to_string(&obs).unwrap();
        assert_eq!(json, r#"{"temperatureC":21.5,"conditionText":"clear"}"#);
    }

    #[test]
    fn test_error_status() {
        let err = WeatherError::Transport {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.user_message().contains("unavailable"));
        assert_eq!(WeatherError::NotFound("x".into()).status(), Some(404));
        assert_eq!(WeatherError::Configuration("x".into()).status(), None);
    }
}
