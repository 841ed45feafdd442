//! The care store: sole owner of plant profiles, reminders and pruning sessions.
//!
//! Every mutation builds the next collection, writes it through the backend and
//! only then swaps it in, so a failed write leaves the store as it was.

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::backend::DocumentBackend;
use crate::error::{StoreError, StoreResult};
use crate::scheduler::ReminderScheduler;
use crate::species::SpeciesTable;
use crate::types::{CareAction, CareReminder, PlantProfile, PruningSession, ReminderPatch};

/// Document key for plant profiles.
pub const PROFILES_KEY: &str = "bonsai-profiles";
/// Document key for care reminders.
pub const REMINDERS_KEY: &str = "care-reminders";
/// Document key for pruning sessions.
pub const SESSIONS_KEY: &str = "pruning-sessions";

pub struct CareStore<B: DocumentBackend> {
    backend: B,
    species: Arc<SpeciesTable>,
    profiles: Vec<PlantProfile>,
    reminders: Vec<CareReminder>,
    sessions: Vec<PruningSession>,
}

impl<B: DocumentBackend> std::fmt::Debug for CareStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareStore")
            .field("profiles", &self.profiles.len())
            .field("reminders", &self.reminders.len())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl<B: DocumentBackend> CareStore<B> {
    /// Load all collections from `backend`. Missing documents are empty.
    pub fn open(backend: B, species: Arc<SpeciesTable>) -> StoreResult<Self> {
        let profiles = load_collection(&backend, PROFILES_KEY)?;
        let reminders = load_collection(&backend, REMINDERS_KEY)?;
        let sessions = load_collection(&backend, SESSIONS_KEY)?;

        let store = Self {
            backend,
            species,
            profiles,
            reminders,
            sessions,
        };
        tracing::info!(
            "Care store opened: {} plants, {} reminders, {} pruning sessions",
            store.profiles.len(),
            store.reminders.len(),
            store.sessions.len()
        );
        Ok(store)
    }

    pub fn profiles(&self) -> &[PlantProfile] {
        &self.profiles
    }

    pub fn profile(&self, id: &str) -> Option<&PlantProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn reminders(&self) -> &[CareReminder] {
        &self.reminders
    }

    pub fn reminder(&self, id: &str) -> Option<&CareReminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn pruning_sessions(&self) -> &[PruningSession] {
        &self.sessions
    }

    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// Schedule queries over the current reminders, with calendar days in `offset`.
    pub fn scheduler(&self, offset: FixedOffset) -> ReminderScheduler<'_> {
        ReminderScheduler::with_offset(&self.reminders, offset)
    }

    /// Insert or fully replace a profile by id. `next_care_due_at` is recomputed.
    #[instrument(skip(self, profile), fields(id = %profile.id))]
    pub fn save_profile(&mut self, mut profile: PlantProfile) -> StoreResult<()> {
        let cadence = self.species.cadence_for(&profile.species_id);
        profile.next_care_due_at = profile.compute_next_care(&cadence);

        let mut profiles = self.profiles.clone();
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }

        self.write_one(PROFILES_KEY, &profiles)?;
        self.profiles = profiles;
        tracing::debug!("Profile saved");
        Ok(())
    }

    /// Remove a profile. Reminders that reference it are kept.
    #[instrument(skip(self))]
    pub fn delete_profile(&mut self, id: &str) -> StoreResult<bool> {
        if self.profile(id).is_none() {
            return Ok(false);
        }
        let profiles: Vec<_> = self.profiles.iter().filter(|p| p.id != id).cloned().collect();

        self.write_one(PROFILES_KEY, &profiles)?;
        self.profiles = profiles;
        tracing::debug!("Profile deleted");
        Ok(true)
    }

    /// Add a new reminder.
    ///
    /// # Errors
    /// Returns `StoreError::Conflict` if a reminder with the same id exists.
    #[instrument(skip(self, reminder), fields(id = %reminder.id))]
    pub fn add_reminder(&mut self, reminder: CareReminder) -> StoreResult<()> {
        if self.reminder(&reminder.id).is_some() {
            tracing::warn!("Rejected duplicate reminder");
            return Err(StoreError::Conflict(reminder.id));
        }
        let mut reminders = self.reminders.clone();
        reminders.push(reminder);

        self.write_one(REMINDERS_KEY, &reminders)?;
        self.reminders = reminders;
        tracing::debug!("Reminder added");
        Ok(())
    }

    /// Mark a reminder completed and spawn its successor if it recurs.
    ///
    /// If the reminder belongs to a known plant, the plant's care timestamps
    /// and history are updated in the same write. Returns the completed
    /// reminder, or `None` for an unknown id. Completing twice is a no-op, and
    /// a reopened reminder does not spawn a second successor.
    #[instrument(skip(self))]
    pub fn complete_reminder(
        &mut self,
        id: &str,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<Option<CareReminder>> {
        let Some(index) = self.reminders.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        if self.reminders[index].is_completed {
            tracing::debug!("Reminder already completed");
            return Ok(Some(self.reminders[index].clone()));
        }

        let mut reminders = self.reminders.clone();
        reminders[index].is_completed = true;
        let completed = reminders[index].clone();

        if let Some(next) = completed.successor(Uuid::new_v4().to_string()) {
            if reminders.iter().any(|r| r.is_same_link(&next)) {
                tracing::debug!("Successor for occurrence {} already exists", next.occurrence);
            } else {
                tracing::debug!("Spawned successor {} due {}", next.id, next.due_at);
                reminders.push(next);
            }
        }

        let profiles = completed
            .plant_id
            .as_deref()
            .and_then(|plant_id| self.profiles.iter().position(|p| p.id == plant_id))
            .map(|plant_index| {
                let mut profiles = self.profiles.clone();
                let plant = &mut profiles[plant_index];
                let cadence = self.species.cadence_for(&plant.species_id);
                plant.apply_care(
                    CareAction::from(completed.reminder_type),
                    completed_at,
                    completed.title.clone(),
                    &cadence,
                );
                profiles
            });

        match profiles {
            Some(profiles) => {
                let profiles_json = serde_json::to_string(&profiles)?;
                let reminders_json = serde_json::to_string(&reminders)?;
                self.write_entries(&[
                    (PROFILES_KEY, profiles_json.as_str()),
                    (REMINDERS_KEY, reminders_json.as_str()),
                ])?;
                self.profiles = profiles;
            }
            None => self.write_one(REMINDERS_KEY, &reminders)?,
        }
        self.reminders = reminders;
        Ok(Some(completed))
    }

    /// Apply a partial update to a reminder. Returns `None` for an unknown id.
    #[instrument(skip(self, patch))]
    pub fn update_reminder(
        &mut self,
        id: &str,
        patch: ReminderPatch,
    ) -> StoreResult<Option<CareReminder>> {
        let Some(index) = self.reminders.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let mut reminders = self.reminders.clone();
        reminders[index].apply_patch(patch);
        let updated = reminders[index].clone();

        self.write_one(REMINDERS_KEY, &reminders)?;
        self.reminders = reminders;
        tracing::debug!("Reminder updated");
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    pub fn delete_reminder(&mut self, id: &str) -> StoreResult<bool> {
        if self.reminder(id).is_none() {
            return Ok(false);
        }
        let reminders: Vec<_> = self.reminders.iter().filter(|r| r.id != id).cloned().collect();

        self.write_one(REMINDERS_KEY, &reminders)?;
        self.reminders = reminders;
        tracing::debug!("Reminder deleted");
        Ok(true)
    }

    /// Record care performed outside of any reminder.
    #[instrument(skip(self, notes))]
    pub fn record_care(
        &mut self,
        plant_id: &str,
        action: CareAction,
        at: DateTime<Utc>,
        notes: &str,
    ) -> StoreResult<Option<PlantProfile>> {
        let Some(index) = self.profiles.iter().position(|p| p.id == plant_id) else {
            return Ok(None);
        };
        let mut profiles = self.profiles.clone();
        let cadence = self.species.cadence_for(&profiles[index].species_id);
        profiles[index].apply_care(action, at, notes, &cadence);
        let updated = profiles[index].clone();

        self.write_one(PROFILES_KEY, &profiles)?;
        self.profiles = profiles;
        tracing::debug!("Recorded {}", action.label());
        Ok(Some(updated))
    }

    /// Append a pruning session to the log.
    #[instrument(skip(self, session), fields(id = %session.id))]
    pub fn add_pruning_session(&mut self, session: PruningSession) -> StoreResult<()> {
        let mut sessions = self.sessions.clone();
        sessions.push(session);

        self.write_one(SESSIONS_KEY, &sessions)?;
        self.sessions = sessions;
        tracing::debug!("Pruning session added");
        Ok(())
    }

    fn write_one<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        self.write_entries(&[(key, json.as_str())])
    }

    fn write_entries(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        self.backend.write_many(entries).map_err(|e| {
            tracing::warn!("Write failed, keeping previous state: {}", e);
            e
        })
    }
}

fn load_collection<T: DeserializeOwned>(
    backend: &impl DocumentBackend,
    key: &str,
) -> StoreResult<Vec<T>> {
    match backend.read(key)? {
        Some(json) => serde_json::from_str(&json).map_err(|source| {
            tracing::warn!("Document '{}' could not be decoded", key);
            StoreError::Corrupt {
                key: key.to_string(),
                source,
            }
        }),
        None => Ok(Vec::new()),
    }
}
