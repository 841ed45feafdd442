//! Read-only schedule projections over the store's reminders.
//!
//! Calendar days are taken in a fixed UTC offset. Every list is ordered by
//! due date, then by priority (high first), then by insertion order.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::BTreeSet;

use crate::types::{CareReminder, PlantProfile};

#[derive(Debug, Clone, Copy)]
pub struct ReminderScheduler<'a> {
    reminders: &'a [CareReminder],
    offset: FixedOffset,
}

impl<'a> ReminderScheduler<'a> {
    /// Scheduler with calendar days in UTC.
    pub fn new(reminders: &'a [CareReminder]) -> Self {
        Self::with_offset(reminders, Utc.fix())
    }

    pub fn with_offset(reminders: &'a [CareReminder], offset: FixedOffset) -> Self {
        Self { reminders, offset }
    }

    /// The calendar day an instant falls on.
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Incomplete reminders due on `date`.
    pub fn for_date(&self, date: NaiveDate) -> Vec<&'a CareReminder> {
        self.select(|r| self.day_of(r.due_at) == date)
    }

    /// Incomplete reminders due strictly before `now`.
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<&'a CareReminder> {
        self.select(|r| r.due_at < now)
    }

    /// Incomplete reminders due on the same calendar day as `now`.
    pub fn due_today(&self, now: DateTime<Utc>) -> Vec<&'a CareReminder> {
        self.for_date(self.day_of(now))
    }

    /// Incomplete reminders due after `now` and no later than `days` calendar days ahead.
    pub fn upcoming(&self, now: DateTime<Utc>, days: u32) -> Vec<&'a CareReminder> {
        let today = self.day_of(now);
        let last = today
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        self.select(|r| r.due_at > now && self.day_of(r.due_at) <= last)
    }

    /// Distinct days in `[start, end]` with at least one reminder, ascending.
    ///
    /// Completed reminders count, so finished days stay marked on a calendar.
    pub fn dates_with_reminders(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        self.reminders
            .iter()
            .map(|r| self.day_of(r.due_at))
            .filter(|day| *day >= start && *day <= end)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.reminders.iter().filter(|r| !r.is_completed).count()
    }

    fn select(&self, keep: impl Fn(&CareReminder) -> bool) -> Vec<&'a CareReminder> {
        let mut selected: Vec<&'a CareReminder> = self
            .reminders
            .iter()
            .filter(|r| !r.is_completed && keep(*r))
            .collect();
        // stable: equal keys keep insertion order
        selected.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(b.priority.cmp(&a.priority)));
        selected
    }
}

/// Summary counts for the collection overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_plants: usize,
    pub pending_reminders: usize,
    pub due_today: usize,
    pub healthy_plants: usize,
}

impl DashboardStats {
    pub fn compute(
        profiles: &[PlantProfile],
        scheduler: &ReminderScheduler<'_>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            total_plants: profiles.len(),
            pending_reminders: scheduler.pending(),
            due_today: scheduler.due_today(now).len(),
            healthy_plants: profiles.iter().filter(|p| p.health_status.is_healthy()).count(),
        }
    }

    /// Share of healthy plants as a rounded percentage; 0 for an empty collection.
    pub fn healthy_percent(&self) -> u32 {
        if self.total_plants == 0 {
            return 0;
        }
        let pct = (self.healthy_plants as f64 / self.total_plants as f64) * 100.0;
        pct.round() as u32
    }
}
