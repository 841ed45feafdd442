//! Weather advisories from species temperature thresholds.

use bonsai_weather::Observation;
use chrono::{Datelike, NaiveDate};

use crate::species::SpeciesCareProfile;

/// Compose advisory text for an observation.
///
/// Starts from the observed condition text and appends the cold clause, then
/// the heat clause, for whichever thresholds the species sets and the
/// temperature crosses. Without a profile the condition text is returned as is.
pub fn advise(observation: &Observation, profile: Option<&SpeciesCareProfile>) -> String {
    let mut text = observation.condition_text.clone();
    let Some(profile) = profile else {
        return text;
    };
    let adj = &profile.weather_adjustments;
    let temp = observation.temperature_c;

    if let Some(cold) = adj.cold_threshold_c.filter(|&cold| temp < cold) {
        text.push_str(&cold_clause(&profile.common_name, cold));
    }
    if let Some(hot) = adj.hot_threshold_c.filter(|&hot| temp > hot) {
        text.push_str(&heat_clause(&profile.common_name, hot));
    }
    text
}

/// Sentence appended when the temperature is below the species' cold threshold.
pub fn cold_clause(common_name: &str, threshold: f64) -> String {
    format!(
        " Protect your {} from the cold: temperature is below {}°C.",
        common_name, threshold
    )
}

/// Sentence appended when the temperature is above the species' hot threshold.
pub fn heat_clause(common_name: &str, threshold: f64) -> String {
    format!(
        " Shade and water your {} more often: temperature is above {}°C.",
        common_name, threshold
    )
}

/// Species notes relevant to the current weather and season.
///
/// Kept apart from [`advise`]; callers decide how to show them. Empty notes
/// are skipped.
pub fn seasonal_notes<'p>(
    observation: &Observation,
    profile: &'p SpeciesCareProfile,
    date: NaiveDate,
) -> Vec<&'p str> {
    let adj = &profile.weather_adjustments;
    let mut notes = Vec::new();

    if observation.kind().is_wet() && !adj.rainy_note.is_empty() {
        notes.push(adj.rainy_note.as_str());
    }
    if matches!(date.month(), 12 | 1 | 2) && !adj.winter_note.is_empty() {
        notes.push(adj.winter_note.as_str());
    }
    notes
}
