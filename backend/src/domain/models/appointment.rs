use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Lifecycle of a booking: `Confirmed | Pending -> Cancelled`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Cancelled,
}

/// A consultation booked with a doctor
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub specialty: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub location: String,
    /// Position among same doctor/date bookings, fixed at booking time
    pub queue_number: Option<u32>,
    pub estimated_wait_minutes: Option<u32>,
}

impl Appointment {
    /// Local wall-clock start of the appointment
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// Identifier formatted the way bookings are numbered: `APT-001`
    pub fn format_id(sequence: usize) -> String {
        format!("APT-{:03}", sequence)
    }
}
