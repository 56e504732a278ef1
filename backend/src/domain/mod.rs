//! # Domain Module
//!
//! Business logic of the MediPass patient services, independent of HTTP and
//! of the storage backend.
//!
//! ## Module Organization
//!
//! - **purchase_wizard**: the five-step carnet purchase state machine
//! - **queue**: queue number and wait estimate for new bookings
//! - **reminders**: time-windowed reminders for upcoming appointments
//! - **date_format**: French date, time and amount formatting
//! - **catalog** / **doctor_directory**: read-only reference data and search
//! - **\*_service**: stateful services shared through `AppState`
//!
//! ## Core Concepts
//!
//! - **Appointment**: a booking with a doctor; its queue number is fixed at booking
//! - **Carnet**: a purchased consultation pass tied to a hospital and a validity window
//! - **Reminder**: derived notice for a confirmed appointment starting within 24 hours
//!
//! ## Concurrency
//!
//! Services keep their state behind `Arc<Mutex<_>>` and never hold a lock
//! across an `.await`. Lock poisoning is not treated as fatal: the state is
//! plain data and stays usable.

pub mod models;
pub mod commands;
pub mod date_format;
pub mod queue;
pub mod reminders;
pub mod purchase_wizard;
pub mod catalog;
pub mod doctor_directory;
pub mod auth_service;
pub mod profile_service;
pub mod appointment_service;
pub mod carnet_document;
pub mod carnet_service;
pub mod notification_service;
pub mod chat_service;

pub use appointment_service::{AppointmentError, AppointmentService};
pub use auth_service::{AuthError, AuthProvider, AuthService, DemoAuthProvider};
pub use carnet_service::{CarnetError, CarnetService};
pub use catalog::{CatalogProvider, StaticCatalog};
pub use chat_service::{ChatAssistClient, ChatError, ChatService};
pub use doctor_directory::DoctorDirectory;
pub use notification_service::{NotificationError, NotificationService};
pub use profile_service::{ProfileError, ProfileService};
pub use purchase_wizard::{PurchaseWizard, WizardError, WizardStep};
pub use reminders::ReminderPolicy;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) fn lock_state<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
