//! Domain-level command and result types.
//!
//! Services take and return these; the REST layer maps the DTOs of the
//! `shared` crate to and from them.

pub mod auth {
    /// Credentials submitted on the login form.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }

    /// Fields of the registration form.
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub name: String,
        pub email: String,
        pub phone: Option<String>,
        pub password: String,
        pub confirm_password: String,
    }
}

pub mod profile {
    /// Partial profile update; `None` leaves the field unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub location: Option<String>,
        pub date_of_birth: Option<String>,
        pub bio: Option<String>,
    }
}

pub mod appointment {
    use chrono::NaiveDate;

    use crate::domain::models::appointment::Appointment;
    use crate::domain::queue::QueuePlacement;

    /// Book `slot` with a doctor, today unless `date` is given.
    #[derive(Debug, Clone)]
    pub struct BookAppointmentCommand {
        pub doctor_id: String,
        pub slot: String,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone)]
    pub struct BookAppointmentResult {
        pub appointment: Appointment,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct CancelAppointmentResult {
        pub appointment: Appointment,
        pub success_message: String,
    }

    /// Appointments split by status, each in booking order.
    #[derive(Debug, Clone)]
    pub struct AppointmentListResult {
        pub active: Vec<Appointment>,
        pub cancelled: Vec<Appointment>,
    }

    #[derive(Debug, Clone)]
    pub struct QueuePreviewResult {
        pub doctor_name: String,
        pub date: NaiveDate,
        pub placement: QueuePlacement,
    }
}

pub mod carnet {
    use crate::domain::models::carnet::{Carnet, CarnetStatus};
    use crate::domain::models::catalog::{CarnetType, Hospital, PaymentMethod};
    use crate::domain::models::user::User;
    use crate::domain::purchase_wizard::PurchaseWizard;

    /// The session wizard with its selections resolved against the catalog.
    #[derive(Debug, Clone)]
    pub struct WizardState {
        pub wizard: PurchaseWizard,
        pub hospital: Option<Hospital>,
        pub carnet_type: Option<CarnetType>,
        pub payment_method: Option<PaymentMethod>,
        /// Hospitals of the selected city, empty before a city is chosen
        pub available_hospitals: Vec<Hospital>,
        /// Remembered city offered at the city step
        pub default_city: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct CarnetListQuery {
        pub search: Option<String>,
        /// `None` means every status
        pub status: Option<CarnetStatus>,
    }

    /// Complete the current wizard run on behalf of `patient`.
    #[derive(Debug, Clone)]
    pub struct CompletePurchaseCommand {
        pub patient: User,
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CompletePurchaseResult {
        pub carnet: Carnet,
        pub success_message: String,
        /// The key was already fulfilled; `carnet` is the earlier one
        pub duplicate: bool,
    }

    /// Downloadable plain-text rendition of a carnet.
    #[derive(Debug, Clone)]
    pub struct CarnetDocument {
        pub file_name: String,
        pub content: String,
    }
}

pub mod notification {
    use crate::domain::models::notification::Notification;

    #[derive(Debug, Clone)]
    pub struct NotificationListResult {
        pub notifications: Vec<Notification>,
        pub unread_count: usize,
    }

    #[derive(Debug, Clone)]
    pub struct MarkAllReadResult {
        pub updated_count: usize,
        pub unread_count: usize,
    }
}

pub mod chat {
    use crate::domain::models::chat::ChatMessage;

    #[derive(Debug, Clone)]
    pub struct SendMessageResult {
        pub user_message: ChatMessage,
        pub reply: ChatMessage,
    }
}
