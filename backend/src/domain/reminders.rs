//! Time-windowed reminders for upcoming confirmed appointments.
//!
//! Reminders are derived on demand from the appointment list and the current
//! time; nothing here is stored. Callers pass `now` explicitly so the window
//! can be evaluated on a schedule or per request.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;

use super::models::appointment::{Appointment, AppointmentStatus};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const WINDOW_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// Within the next hour
    Soon,
    /// Later today, within 24 hours
    Today,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub appointment_id: String,
    /// Doctor name without the `Dr. ` prefix
    pub doctor_name: String,
    pub specialty: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    /// Hours until start, clamped at zero and rounded to one decimal
    pub hours_until: f64,
    pub kind: ReminderKind,
    pub label: String,
}

/// How past-due appointments are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    /// A started appointment keeps its reminder this long after its start
    pub overdue_grace: Duration,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            overdue_grace: Duration::minutes(60),
        }
    }
}

pub fn classify(hours_until: f64) -> ReminderKind {
    if hours_until > 0.0 && hours_until <= 1.0 {
        ReminderKind::Soon
    } else if hours_until > 1.0 && hours_until <= WINDOW_HOURS {
        ReminderKind::Today
    } else {
        ReminderKind::Upcoming
    }
}

/// Display label for a non-negative time until start, in hours
pub fn label_for(hours: f64) -> String {
    let rounded = round_tenth(hours);
    if rounded <= 0.0 {
        "MAINTENANT".to_string()
    } else if rounded < 1.0 {
        format!("{} min", (hours * 60.0).round() as i64)
    } else if rounded == 1.0 {
        "1h".to_string()
    } else if rounded < WINDOW_HOURS {
        format!("{}h", rounded.round() as i64)
    } else {
        format!("{}j", (rounded / WINDOW_HOURS).ceil() as i64)
    }
}

fn round_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Reminders due at `now`, sorted by time until start.
pub fn compute_reminders(
    now: NaiveDateTime,
    appointments: &[Appointment],
    dismissed: &HashSet<String>,
    policy: &ReminderPolicy,
) -> Vec<Reminder> {
    let grace_hours = policy.overdue_grace.num_milliseconds() as f64 / MILLIS_PER_HOUR;

    let mut reminders: Vec<(f64, Reminder)> = appointments
        .iter()
        .filter(|apt| apt.status == AppointmentStatus::Confirmed)
        .filter(|apt| !dismissed.contains(&apt.id))
        .filter_map(|apt| {
            let exact = (apt.starts_at() - now).num_milliseconds() as f64 / MILLIS_PER_HOUR;
            if exact > WINDOW_HOURS || exact < -grace_hours {
                return None;
            }

            let hours_until = round_tenth(exact).max(0.0);
            let reminder = Reminder {
                appointment_id: apt.id.clone(),
                doctor_name: apt.doctor_name.trim_start_matches("Dr. ").to_string(),
                specialty: apt.specialty.clone(),
                date: apt.date,
                time: apt.time,
                location: apt.location.clone(),
                hours_until,
                kind: classify(exact),
                label: label_for(exact.max(0.0)),
            };
            Some((exact, reminder))
        })
        .collect();

    reminders.sort_by(|a, b| a.0.total_cmp(&b.0));
    reminders.into_iter().map(|(_, reminder)| reminder).collect()
}
