//! Plant profiles, care reminders and pruning sessions as persisted documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::period::CarePeriod;
use crate::species::CareCadence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantLocation {
    Indoor,
    Outdoor,
    Greenhouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Excellent | HealthStatus::Good)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoKind {
    Progress,
    BeforePruning,
    AfterPruning,
    Seasonal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub taken_at: DateTime<Utc>,
    pub kind: PhotoKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareHistoryEntry {
    pub at: DateTime<Utc>,
    pub action: String,
    #[serde(default)]
    pub notes: String,
}

/// A plant in the user's collection.
///
/// `next_care_due_at` is derived by the store on every save; values set by
/// callers are overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantProfile {
    pub id: String,
    pub name: String,
    pub species_id: String,
    pub age: u32,
    pub acquisition_date: DateTime<Utc>,
    pub location: PlantLocation,
    pub health_status: HealthStatus,
    #[serde(default)]
    pub pot_size: String,
    #[serde(default)]
    pub soil_last_changed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_watered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_fertilized_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_pruned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_care_due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub care_history: Vec<CareHistoryEntry>,
}

impl PlantProfile {
    /// Earliest of the per-kind due dates; kinds never performed don't contribute.
    pub fn compute_next_care(&self, cadence: &CareCadence) -> Option<DateTime<Utc>> {
        [
            self.last_watered_at.map(|at| cadence.watering.after(at)),
            self.last_fertilized_at.map(|at| cadence.fertilizing.after(at)),
            self.last_pruned_at.map(|at| cadence.pruning.after(at)),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Record a performed care action and refresh the derived due date.
    pub fn apply_care(
        &mut self,
        action: CareAction,
        at: DateTime<Utc>,
        notes: impl Into<String>,
        cadence: &CareCadence,
    ) {
        match action {
            CareAction::Watering => self.last_watered_at = Some(at),
            CareAction::Fertilizing => self.last_fertilized_at = Some(at),
            CareAction::Pruning => self.last_pruned_at = Some(at),
            CareAction::Repotting => self.soil_last_changed_at = Some(at),
            CareAction::Inspection => {}
        }
        self.care_history.push(CareHistoryEntry {
            at,
            action: action.label().to_string(),
            notes: notes.into(),
        });
        self.next_care_due_at = self.compute_next_care(cadence);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    Inspection,
}

/// Recurrence of a reminder. `None` reminders are one-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Seasonal,
    Yearly,
    None,
}

impl Frequency {
    pub fn period(&self) -> Option<CarePeriod> {
        match self {
            Frequency::Daily => Some(CarePeriod::Days(1)),
            Frequency::Weekly => Some(CarePeriod::Weeks(1)),
            Frequency::Monthly => Some(CarePeriod::Months(1)),
            Frequency::Seasonal => Some(CarePeriod::Months(3)),
            Frequency::Yearly => Some(CarePeriod::Months(12)),
            Frequency::None => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.period().is_some()
    }
}

/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareReminder {
    pub id: String,
    #[serde(default)]
    pub plant_id: Option<String>,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_at: DateTime<Utc>,
    pub frequency: Frequency,
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
    /// Due date of the first reminder in this recurrence chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_start: Option<DateTime<Utc>>,
    /// Position in the chain; 0 for the first reminder.
    #[serde(default)]
    pub occurrence: u32,
}

impl CareReminder {
    /// A one-off, medium-priority reminder with no plant attached.
    pub fn new(
        id: impl Into<String>,
        reminder_type: ReminderType,
        title: impl Into<String>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            plant_id: None,
            reminder_type,
            title: title.into(),
            description: String::new(),
            due_at,
            frequency: Frequency::None,
            priority: Priority::Medium,
            is_completed: false,
            series_start: None,
            occurrence: 0,
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn for_plant(mut self, plant_id: impl Into<String>) -> Self {
        self.plant_id = Some(plant_id.into());
        self
    }

    /// The next reminder in the chain, or `None` for one-off reminders.
    ///
    /// Due dates are computed from the chain's first due date, so the k-th
    /// successor is always `series_start + k * period` no matter when each
    /// link was completed.
    pub fn successor(&self, id: impl Into<String>) -> Option<CareReminder> {
        let period = self.frequency.period()?;
        let series_start = self.series_start.unwrap_or(self.due_at);
        let occurrence = self.occurrence.saturating_add(1);

        Some(CareReminder {
            id: id.into(),
            plant_id: self.plant_id.clone(),
            reminder_type: self.reminder_type,
            title: self.title.clone(),
            description: self.description.clone(),
            due_at: period.times(occurrence).after(series_start),
            frequency: self.frequency,
            priority: self.priority,
            is_completed: false,
            series_start: Some(series_start),
            occurrence,
        })
    }

    /// True if both reminders are the same position in the same recurrence chain.
    pub fn is_same_link(&self, other: &CareReminder) -> bool {
        self.series_start.is_some()
            && self.series_start == other.series_start
            && self.occurrence == other.occurrence
            && self.reminder_type == other.reminder_type
            && self.plant_id == other.plant_id
            && self.title == other.title
    }

    /// Apply a partial update. Changing the due date or frequency starts a new chain.
    pub fn apply_patch(&mut self, patch: ReminderPatch) {
        let reanchor = patch.due_at.is_some() || patch.frequency.is_some();

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = due_at;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(plant_id) = patch.plant_id {
            self.plant_id = plant_id;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }

        if reanchor {
            self.series_start = None;
            self.occurrence = 0;
        }
    }
}

/// Partial update for a reminder; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub frequency: Option<Frequency>,
    pub priority: Option<Priority>,
    /// `Some(None)` detaches the reminder from its plant.
    pub plant_id: Option<Option<String>>,
    pub is_completed: Option<bool>,
}

/// A care action performed on a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareAction {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    Inspection,
}

impl CareAction {
    pub fn label(&self) -> &'static str {
        match self {
            CareAction::Watering => "watering",
            CareAction::Fertilizing => "fertilizing",
            CareAction::Pruning => "pruning",
            CareAction::Repotting => "repotting",
            CareAction::Inspection => "inspection",
        }
    }
}

impl From<ReminderType> for CareAction {
    fn from(t: ReminderType) -> Self {
        match t {
            ReminderType::Watering => CareAction::Watering,
            ReminderType::Fertilizing => CareAction::Fertilizing,
            ReminderType::Pruning => CareAction::Pruning,
            ReminderType::Repotting => CareAction::Repotting,
            ReminderType::Inspection => CareAction::Inspection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruningSession {
    pub id: String,
    pub date: DateTime<Utc>,
    pub species: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub branches_cut: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_pruning_date: Option<DateTime<Utc>>,
}
