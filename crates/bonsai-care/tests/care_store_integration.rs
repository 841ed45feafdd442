//! Integration tests for CareStore over an on-disk SQLite document store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use bonsai_care::{
    advise, CarePeriod, CareReminder, CareStore, DocumentBackend, Frequency, HealthStatus,
    PlantLocation, PlantProfile, ReminderType, SpeciesTable, SqliteDocumentStore, StoreError,
    REMINDERS_KEY,
};
use bonsai_weather::Observation;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

fn open(path: &Path) -> CareStore<SqliteDocumentStore> {
    let backend = SqliteDocumentStore::open(path).unwrap();
    CareStore::open(backend, Arc::new(SpeciesTable::builtin())).unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Helper to create a test plant
fn juniper(id: &str) -> PlantProfile {
    PlantProfile {
        id: id.into(),
        name: "Garden juniper".into(),
        species_id: "juniperus-chinensis".into(),
        age: 15,
        acquisition_date: at(2019, 4, 10),
        location: PlantLocation::Outdoor,
        health_status: HealthStatus::Good,
        pot_size: "30cm".into(),
        soil_last_changed_at: None,
        last_watered_at: None,
        last_fertilized_at: None,
        last_pruned_at: None,
        next_care_due_at: None,
        photos: vec![],
        care_history: vec![],
    }
}

#[test]
fn test_weekly_completion_and_overdue() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir.path().join("bonsai.db"));

    store
        .add_reminder(
            CareReminder::new("w-1", ReminderType::Watering, "Water the juniper", at(2024, 3, 1))
                .with_frequency(Frequency::Weekly),
        )
        .unwrap();
    store.complete_reminder("w-1", at(2024, 3, 5)).unwrap();

    let scheduler = store.scheduler(utc());
    let overdue = scheduler.overdue(at(2024, 3, 10));
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].due_at, at(2024, 3, 8));
    assert_eq!(overdue[0].title, "Water the juniper");
}

#[test]
fn test_duplicate_reminder_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir.path().join("bonsai.db"));
    let reminder = CareReminder::new("dup", ReminderType::Inspection, "Look for pests", at(2024, 3, 1));

    store.add_reminder(reminder.clone()).unwrap();
    let result = store.add_reminder(reminder);

    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(store.reminders().len(), 1);
}

#[test]
fn test_chain_of_completions_does_not_drift() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir.path().join("bonsai.db"));
    let original = at(2024, 1, 31);
    store
        .add_reminder(
            CareReminder::new("f-0", ReminderType::Fertilizing, "Feed", original)
                .with_frequency(Frequency::Monthly),
        )
        .unwrap();

    let mut current = "f-0".to_string();
    for k in 1..=6u32 {
        // complete late, at a different time each round
        let late = store.reminder(&current).unwrap().due_at + chrono::Duration::days(i64::from(k));
        store.complete_reminder(&current, late).unwrap();

        let next = store.reminders().iter().find(|r| !r.is_completed).unwrap();
        assert_eq!(next.due_at, CarePeriod::Months(k).after(original));
        current = next.id.clone();
    }
    assert_eq!(store.reminders().len(), 7);
    // Jan 31 + 6 months
    assert_eq!(store.reminder(&current).unwrap().due_at, at(2024, 7, 31));
}

#[test]
fn test_one_off_reminder_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir.path().join("bonsai.db"));
    store
        .add_reminder(CareReminder::new("once", ReminderType::Repotting, "Repot", at(2024, 4, 1)))
        .unwrap();

    let done = store.complete_reminder("once", at(2024, 4, 1)).unwrap().unwrap();
    assert!(done.is_completed);
    assert_eq!(store.reminders().len(), 1);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bonsai.db");
    {
        let mut store = open(&path);
        store.save_profile(juniper("j-1")).unwrap();
        store
            .add_reminder(
                CareReminder::new("w-1", ReminderType::Watering, "Water", at(2024, 3, 1))
                    .with_frequency(Frequency::Daily)
                    .for_plant("j-1"),
            )
            .unwrap();
        store.complete_reminder("w-1", at(2024, 3, 1)).unwrap();
    }

    let store = open(&path);
    assert_eq!(store.reminders().len(), 2);
    let plant = store.profile("j-1").unwrap();
    assert_eq!(plant.last_watered_at, Some(at(2024, 3, 1)));
    // juniper waters every 4 days
    assert_eq!(plant.next_care_due_at, Some(at(2024, 3, 5)));

    let successor = store.reminders().iter().find(|r| !r.is_completed).unwrap();
    assert_eq!(successor.due_at, at(2024, 3, 2));
    assert_eq!(successor.plant_id.as_deref(), Some("j-1"));
}

#[test]
fn test_documents_are_json_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bonsai.db");
    {
        let mut store = open(&path);
        store
            .add_reminder(CareReminder::new("r-1", ReminderType::Pruning, "Trim", at(2024, 6, 1)))
            .unwrap();
    }

    let raw = SqliteDocumentStore::open(&path).unwrap().read(REMINDERS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], "r-1");
    assert_eq!(json[0]["type"], "pruning");
}

#[test]
fn test_heat_advisory_for_stored_plant() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(&dir.path().join("bonsai.db"));
    let mut maple = juniper("m-1");
    maple.species_id = "acer-palmatum".into();
    store.save_profile(maple).unwrap();

    let plant = store.profile("m-1").unwrap();
    let species = store.species().get(&plant.species_id);
    let text = advise(&Observation::new(35.0, "clear"), species);

    assert!(text.starts_with("clear"));
    assert!(text.ends_with("Shade and water your Japanese Maple more often: temperature is above 30°C."));
}
