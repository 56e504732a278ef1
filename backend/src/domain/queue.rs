//! Queue position and wait estimate for a new booking.
//!
//! A booking's queue number is the count of non-cancelled appointments with
//! the same doctor on the same date, plus one. It is computed once when the
//! appointment is booked and never renumbered afterwards.

use chrono::NaiveDate;

use super::models::appointment::Appointment;

/// Minutes each patient ahead in the queue adds to the wait
pub const WAIT_MINUTES_PER_PATIENT: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePlacement {
    pub queue_number: u32,
    pub estimated_wait_minutes: u32,
}

pub fn next_queue_number(appointments: &[Appointment], doctor_name: &str, date: NaiveDate) -> u32 {
    let ahead = appointments
        .iter()
        .filter(|apt| apt.doctor_name == doctor_name && apt.date == date && !apt.is_cancelled())
        .count();
    u32::try_from(ahead).unwrap_or(u32::MAX - 1) + 1
}

pub fn estimate_wait_minutes(queue_number: u32) -> u32 {
    queue_number
        .saturating_sub(1)
        .saturating_mul(WAIT_MINUTES_PER_PATIENT)
}

pub fn place(appointments: &[Appointment], doctor_name: &str, date: NaiveDate) -> QueuePlacement {
    let queue_number = next_queue_number(appointments, doctor_name, date);
    QueuePlacement {
        queue_number,
        estimated_wait_minutes: estimate_wait_minutes(queue_number),
    }
}
