//! Weather observations for bonsai care advisories.
//!
//! Fetches a point-in-time temperature and condition text for a location and
//! normalizes transport failures into a small error taxonomy.

pub mod provider;
pub mod types;

pub use provider::{ProviderSettings, WeatherProvider};
pub use types::{ConditionKind, Observation, WeatherError};
