//! Bonsai care tracking: plant profiles, recurring care reminders, schedule
//! projections and weather-threshold advisories.

pub mod advisory;
pub mod backend;
pub mod error;
pub mod period;
pub mod scheduler;
pub mod species;
pub mod store;
pub mod types;

pub use advisory::{advise, seasonal_notes};
pub use backend::{DocumentBackend, SqliteDocumentStore};
pub use error::{SpeciesTableError, StoreError, StoreResult};
pub use period::CarePeriod;
pub use scheduler::{DashboardStats, ReminderScheduler};
pub use species::{CareCadence, SpeciesCareProfile, SpeciesTable, WeatherAdjustments};
pub use store::{CareStore, PROFILES_KEY, REMINDERS_KEY, SESSIONS_KEY};
pub use types::{
    CareAction, CareHistoryEntry, CareReminder, Frequency, HealthStatus, Photo, PhotoKind,
    PlantLocation, PlantProfile, Priority, PruningSession, ReminderPatch, ReminderType,
};
