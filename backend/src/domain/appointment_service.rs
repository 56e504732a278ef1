//! Appointment booking, cancellation and reminders.
//!
//! Appointments live in memory for the lifetime of the process. Queue
//! placement is computed once at booking (see [`super::queue`]); reminders are
//! derived on demand from the wall clock (see [`super::reminders`]).
//!
//! ## Business Rules
//!
//! - Only slots offered by the doctor can be booked
//! - New bookings are confirmed immediately
//! - Cancellation is one-way; a cancelled appointment is never deleted
//! - Dismissed reminders stay dismissed until the process restarts

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

use super::catalog::CatalogProvider;
use super::commands::appointment::{
    AppointmentListResult, BookAppointmentCommand, BookAppointmentResult,
    CancelAppointmentResult, QueuePreviewResult,
};
use super::date_format::{format_short_date, parse_time};
use super::lock_state;
use super::models::appointment::{Appointment, AppointmentStatus};
use super::models::catalog::Doctor;
use super::queue;
use super::reminders::{compute_reminders, Reminder, ReminderPolicy};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppointmentError {
    #[error("Médecin introuvable : {0}")]
    DoctorNotFound(String),
    #[error("Le créneau {slot} n'est pas disponible pour {doctor}")]
    SlotUnavailable { doctor: String, slot: String },
    #[error("Rendez-vous introuvable : {0}")]
    NotFound(String),
    #[error("Le rendez-vous {0} est déjà annulé")]
    AlreadyCancelled(String),
}

/// Service for booking and tracking appointments
#[derive(Clone)]
pub struct AppointmentService {
    catalog: Arc<dyn CatalogProvider>,
    appointments: Arc<Mutex<Vec<Appointment>>>,
    dismissed_reminders: Arc<Mutex<HashSet<String>>>,
    reminder_policy: ReminderPolicy,
}

impl AppointmentService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, reminder_policy: ReminderPolicy) -> Self {
        Self::with_appointments(catalog, reminder_policy, seed_appointments())
    }

    pub fn with_appointments(
        catalog: Arc<dyn CatalogProvider>,
        reminder_policy: ReminderPolicy,
        appointments: Vec<Appointment>,
    ) -> Self {
        Self {
            catalog,
            appointments: Arc::new(Mutex::new(appointments)),
            dismissed_reminders: Arc::new(Mutex::new(HashSet::new())),
            reminder_policy,
        }
    }

    /// Book a slot with a doctor
    pub fn book(&self, command: BookAppointmentCommand) -> Result<BookAppointmentResult, AppointmentError> {
        info!("Booking appointment: {:?}", command);

        let doctor = self.find_doctor(&command.doctor_id)?;
        let time = parse_time(&command.slot)
            .filter(|_| doctor.offers_slot(&command.slot))
            .ok_or_else(|| AppointmentError::SlotUnavailable {
                doctor: doctor.name.clone(),
                slot: command.slot.clone(),
            })?;
        let date = command.date.unwrap_or_else(|| Local::now().date_naive());

        let mut appointments = lock_state(&self.appointments);
        let placement = queue::place(&appointments, &doctor.name, date);
        let appointment = Appointment {
            id: Appointment::format_id(appointments.len() + 1),
            doctor_name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            date,
            time,
            status: AppointmentStatus::Confirmed,
            location: doctor.location.clone(),
            queue_number: Some(placement.queue_number),
            estimated_wait_minutes: Some(placement.estimated_wait_minutes),
        };
        appointments.push(appointment.clone());
        drop(appointments);

        info!(
            "Booked {} with {} on {} at {} (queue {}, ~{} min)",
            appointment.id,
            doctor.name,
            date,
            command.slot,
            placement.queue_number,
            placement.estimated_wait_minutes
        );

        Ok(BookAppointmentResult {
            success_message: format!(
                "Rendez-vous confirmé avec {} à {}. Numéro d'ordre : {}. Temps d'attente estimé : {} minutes",
                doctor.name, command.slot, placement.queue_number, placement.estimated_wait_minutes
            ),
            appointment,
        })
    }

    /// Queue position a booking would get right now, without booking
    pub fn queue_preview(
        &self,
        doctor_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<QueuePreviewResult, AppointmentError> {
        let doctor = self.find_doctor(doctor_id)?;
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        let appointments = lock_state(&self.appointments);

        Ok(QueuePreviewResult {
            placement: queue::place(&appointments, &doctor.name, date),
            doctor_name: doctor.name,
            date,
        })
    }

    /// Cancel a confirmed or pending appointment
    pub fn cancel(&self, appointment_id: &str) -> Result<CancelAppointmentResult, AppointmentError> {
        info!("Cancelling appointment {}", appointment_id);
        let mut appointments = lock_state(&self.appointments);
        let appointment = appointments
            .iter_mut()
            .find(|apt| apt.id == appointment_id)
            .ok_or_else(|| AppointmentError::NotFound(appointment_id.to_string()))?;

        if appointment.is_cancelled() {
            warn!("Appointment {} is already cancelled", appointment_id);
            return Err(AppointmentError::AlreadyCancelled(appointment_id.to_string()));
        }

        appointment.status = AppointmentStatus::Cancelled;
        let appointment = appointment.clone();

        Ok(CancelAppointmentResult {
            success_message: format!("Rendez-vous annulé avec {}", appointment.doctor_name),
            appointment,
        })
    }

    pub fn list(&self) -> AppointmentListResult {
        let appointments = lock_state(&self.appointments);
        let (cancelled, active): (Vec<Appointment>, Vec<Appointment>) =
            appointments.iter().cloned().partition(|apt| apt.is_cancelled());
        AppointmentListResult { active, cancelled }
    }

    /// Reminders due now, by local wall-clock time
    pub fn reminders(&self) -> Vec<Reminder> {
        self.reminders_at(Local::now().naive_local())
    }

    pub fn reminders_at(&self, now: NaiveDateTime) -> Vec<Reminder> {
        let appointments = lock_state(&self.appointments);
        let dismissed = lock_state(&self.dismissed_reminders);
        compute_reminders(now, &appointments, &dismissed, &self.reminder_policy)
    }

    /// Hide the reminder of an appointment for the rest of the session
    pub fn dismiss_reminder(&self, appointment_id: &str) -> Result<(), AppointmentError> {
        let exists = lock_state(&self.appointments)
            .iter()
            .any(|apt| apt.id == appointment_id);
        if !exists {
            return Err(AppointmentError::NotFound(appointment_id.to_string()));
        }

        lock_state(&self.dismissed_reminders).insert(appointment_id.to_string());
        info!("Dismissed reminder for {}", appointment_id);
        Ok(())
    }

    fn find_doctor(&self, doctor_id: &str) -> Result<Doctor, AppointmentError> {
        self.catalog
            .find_doctor(doctor_id)
            .ok_or_else(|| AppointmentError::DoctorNotFound(doctor_id.to_string()))
    }
}

fn seed_appointments() -> Vec<Appointment> {
    let seed = |id: &str,
                doctor: &str,
                specialty: &str,
                (y, m, d): (i32, u32, u32),
                (hour, minute): (u32, u32),
                status: AppointmentStatus,
                location: &str,
                queue_number: u32,
                wait: u32| {
        NaiveDate::from_ymd_opt(y, m, d)
            .zip(NaiveTime::from_hms_opt(hour, minute, 0))
            .map(|(date, time)| Appointment {
                id: id.to_string(),
                doctor_name: doctor.to_string(),
                specialty: specialty.to_string(),
                date,
                time,
                status,
                location: location.to_string(),
                queue_number: Some(queue_number),
                estimated_wait_minutes: Some(wait),
            })
    };

    let seeds = [
        seed(
            "APT-001",
            "Dr. Marie Martin",
            "Médecin Généraliste",
            (2024, 2, 15),
            (14, 30),
            AppointmentStatus::Confirmed,
            "Clinique Médicale Paris",
            5,
            15,
        ),
        seed(
            "APT-002",
            "Dr. Pierre Lambert",
            "Dermatologue",
            (2024, 2, 20),
            (10, 0),
            AppointmentStatus::Pending,
            "Centre Dermatologique",
            2,
            5,
        ),
    ];

    let appointments: Vec<Appointment> = seeds.into_iter().flatten().collect();
    for apt in &appointments {
        info!("Seeded appointment {} on {}", apt.id, format_short_date(apt.date));
    }
    appointments
}
