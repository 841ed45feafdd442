//! Species care reference data.
//!
//! Loaded once at startup and read-only afterwards. Free-text cadence labels
//! are display-only; schedules come from the explicit [`CareCadence`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SpeciesTableError;
use crate::period::CarePeriod;

/// Period applied to every care kind when a plant's species is unknown.
pub const DEFAULT_CARE_PERIOD: CarePeriod = CarePeriod::Days(7);

/// How often each kind of care is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareCadence {
    pub watering: CarePeriod,
    pub fertilizing: CarePeriod,
    pub pruning: CarePeriod,
}

impl Default for CareCadence {
    fn default() -> Self {
        Self {
            watering: DEFAULT_CARE_PERIOD,
            fertilizing: DEFAULT_CARE_PERIOD,
            pruning: DEFAULT_CARE_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdjustments {
    #[serde(default)]
    pub rainy_note: String,
    #[serde(default)]
    pub hot_note: String,
    #[serde(default)]
    pub winter_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cold_threshold_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_threshold_c: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesCareProfile {
    pub species_id: String,
    pub common_name: String,
    pub watering_frequency_label: String,
    pub watering_amount_label: String,
    pub cadence: CareCadence,
    #[serde(default)]
    pub weather_adjustments: WeatherAdjustments,
    #[serde(default)]
    pub additional_care_note: String,
}

/// Species profiles keyed by species id.
#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    by_id: BTreeMap<String, SpeciesCareProfile>,
}

impl SpeciesTable {
    /// Build a table, rejecting duplicate ids and inverted thresholds.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = SpeciesCareProfile>,
    ) -> Result<Self, SpeciesTableError> {
        let mut by_id = BTreeMap::new();
        for profile in profiles {
            let adj = &profile.weather_adjustments;
            if let (Some(cold), Some(hot)) = (adj.cold_threshold_c, adj.hot_threshold_c) {
                if cold >= hot {
                    return Err(SpeciesTableError::InconsistentThresholds {
                        species_id: profile.species_id.clone(),
                        cold,
                        hot,
                    });
                }
            }
            if by_id.contains_key(&profile.species_id) {
                return Err(SpeciesTableError::DuplicateSpecies(profile.species_id));
            }
            by_id.insert(profile.species_id.clone(), profile);
        }
        Ok(Self { by_id })
    }

    /// Parse a JSON array of species profiles.
    pub fn from_json(json: &str) -> Result<Self, SpeciesTableError> {
        let profiles: Vec<SpeciesCareProfile> = serde_json::from_str(json)?;
        Self::from_profiles(profiles)
    }

    pub fn load(path: &Path) -> Result<Self, SpeciesTableError> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_json(&contents)?;
        tracing::info!("Loaded {} species from {}", table.len(), path.display());
        Ok(table)
    }

    /// The built-in reference table.
    pub fn builtin() -> Self {
        let by_id = builtin_profiles()
            .into_iter()
            .map(|p| (p.species_id.clone(), p))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, species_id: &str) -> Option<&SpeciesCareProfile> {
        self.by_id.get(species_id)
    }

    /// Cadence for a species, or the default cadence if it is unknown.
    pub fn cadence_for(&self, species_id: &str) -> CareCadence {
        match self.get(species_id) {
            Some(profile) => profile.cadence,
            None => {
                tracing::debug!("Unknown species '{}', using default cadence", species_id);
                CareCadence::default()
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesCareProfile> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn species(
    id: &str,
    common_name: &str,
    watering_label: &str,
    amount_label: &str,
    cadence: CareCadence,
    weather_adjustments: WeatherAdjustments,
    additional: &str,
) -> SpeciesCareProfile {
    SpeciesCareProfile {
        species_id: id.to_string(),
        common_name: common_name.to_string(),
        watering_frequency_label: watering_label.to_string(),
        watering_amount_label: amount_label.to_string(),
        cadence,
        weather_adjustments,
        additional_care_note: additional.to_string(),
    }
}

fn builtin_profiles() -> Vec<SpeciesCareProfile> {
    vec![
        species(
            "ficus-retusa",
            "Ficus",
            "Every 2-3 days",
            "Water until it drains from the pot",
            CareCadence {
                watering: CarePeriod::Days(3),
                fertilizing: CarePeriod::Weeks(2),
                pruning: CarePeriod::Months(2),
            },
            WeatherAdjustments {
                rainy_note: "Keep indoors; soil dries slowly in damp weather.".into(),
                hot_note: "Mist the foliage in the morning.".into(),
                winter_note: "Water less and keep away from radiators.".into(),
                cold_threshold_c: Some(12.0),
                hot_threshold_c: Some(35.0),
            },
            "Tolerates indoor light; rotate the pot weekly.",
        ),
        species(
            "juniperus-chinensis",
            "Chinese Juniper",
            "When the topsoil is dry",
            "Moderate, avoid waterlogging",
            CareCadence {
                watering: CarePeriod::Days(4),
                fertilizing: CarePeriod::Weeks(4),
                pruning: CarePeriod::Months(3),
            },
            WeatherAdjustments {
                rainy_note: "Skip watering after heavy rain.".into(),
                hot_note: "Water in the evening during heat waves.".into(),
                winter_note: "Keep outdoors but shelter the roots from frost.".into(),
                cold_threshold_c: Some(-10.0),
                hot_threshold_c: Some(32.0),
            },
            "Needs full sun outdoors; never keep indoors long term.",
        ),
        species(
            "acer-palmatum",
            "Japanese Maple",
            "Daily in summer",
            "Generous, keep soil evenly moist",
            CareCadence {
                watering: CarePeriod::Days(2),
                fertilizing: CarePeriod::Weeks(3),
                pruning: CarePeriod::Months(6),
            },
            WeatherAdjustments {
                rainy_note: "Check drainage after long rainy spells.".into(),
                hot_note: "Move to afternoon shade to avoid leaf scorch.".into(),
                winter_note: "Dormant: water sparingly, protect from hard frost.".into(),
                cold_threshold_c: Some(-5.0),
                hot_threshold_c: Some(30.0),
            },
            "Leaf-prune in early summer to reduce leaf size.",
        ),
        species(
            "carmona-microphylla",
            "Fukien Tea",
            "Every 2 days",
            "Small amounts, keep slightly moist",
            CareCadence {
                watering: CarePeriod::Days(2),
                fertilizing: CarePeriod::Weeks(2),
                pruning: CarePeriod::Months(1),
            },
            WeatherAdjustments {
                rainy_note: "Bring inside during prolonged rain.".into(),
                hot_note: "Raise humidity with a gravel tray.".into(),
                winter_note: "Keep indoors in a bright spot.".into(),
                cold_threshold_c: Some(10.0),
                hot_threshold_c: Some(32.0),
            },
            "Sensitive to repotting; root-prune lightly.",
        ),
        species(
            "pinus-thunbergii",
            "Japanese Black Pine",
            "Every 4-5 days",
            "Thorough, let the soil dry between waterings",
            CareCadence {
                watering: CarePeriod::Days(5),
                fertilizing: CarePeriod::Months(1),
                pruning: CarePeriod::Months(12),
            },
            WeatherAdjustments {
                rainy_note: "Fast-draining soil is essential in wet seasons.".into(),
                hot_note: "Water early in the day.".into(),
                winter_note: "Hardy outdoors; protect the pot from freezing.".into(),
                cold_threshold_c: Some(-10.0),
                hot_threshold_c: Some(35.0),
            },
            "Candle pruning in late spring.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_builtin_table_is_consistent() {
        let validated = SpeciesTable::from_profiles(builtin_profiles()).unwrap();
        assert_eq!(validated.len(), SpeciesTable::builtin().len());
        assert!(SpeciesTable::builtin().get("ficus-retusa").is_some());
    }

    #[test]
    fn test_unknown_species_uses_default_cadence() {
        let table = SpeciesTable::builtin();
        assert_eq!(table.cadence_for("not-a-tree"), CareCadence::default());
        assert_eq!(CareCadence::default().watering, CarePeriod::Days(7));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut bad = builtin_profiles().remove(0);
        bad.weather_adjustments.cold_threshold_c = Some(30.0);
        bad.weather_adjustments.hot_threshold_c = Some(20.0);

        let err = SpeciesTable::from_profiles(vec![bad]).unwrap_err();
        assert!(matches!(err, SpeciesTableError::InconsistentThresholds { .. }));
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let ficus = builtin_profiles().remove(0);
        let err = SpeciesTable::from_profiles(vec![ficus.clone(), ficus]).unwrap_err();
        assert!(matches!(err, SpeciesTableError::DuplicateSpecies(id) if id == "ficus-retusa"));
    }

    #[test]
    fn test_from_json_with_missing_optional_fields() {
        let json = r#"[{
            "speciesId": "ulmus-parvifolia",
            "commonName": "Chinese Elm",
            "wateringFrequencyLabel": "Every 2-3 days",
            "wateringAmountLabel": "Moderate",
            "cadence": {
                "watering": {"unit": "days", "count": 3},
                "fertilizing": {"unit": "weeks", "count": 2},
                "pruning": {"unit": "months", "count": 2}
            },
            "weatherAdjustments": {"coldThresholdC": -5}
        }]"#;

        let table = SpeciesTable::from_json(json).unwrap();
        let elm = table.get("ulmus-parvifolia").unwrap();
        assert_eq!(elm.weather_adjustments.cold_threshold_c, Some(-5.0));
        assert_eq!(elm.weather_adjustments.hot_threshold_c, None);
        assert_eq!(elm.cadence.watering, CarePeriod::Days(3));
        assert!(elm.additional_care_note.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("species.json");
        let json = serde_json::to_string(&builtin_profiles()).unwrap();
        std::fs::write(&path, json).unwrap();

        let table = SpeciesTable::load(&path).unwrap();
        assert_eq!(table.len(), 5);
    }
}
