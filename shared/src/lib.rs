use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Authentication & profile
// ---------------------------------------------------------------------------

/// Authenticated patient as seen by the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// ISO date (YYYY-MM-DD)
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Outcome of a login or registration attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: Option<String>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

/// Profile with every field resolved (defaults applied for missing values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub date_of_birth: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub date_of_birth: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub success_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub specialties: Vec<String>,
}

/// Channel through which a payment method is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Mobile,
    Card,
    Bank,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub kind: PaymentKind,
    pub logo: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarnetType {
    pub id: String,
    pub name: String,
    /// Price in FCFA
    pub price: u32,
    pub validity_months: u32,
    /// Human readable validity, e.g. "3 mois"
    pub validity_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityListResponse {
    pub cities: Vec<String>,
    pub default_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalListResponse {
    pub hospitals: Vec<Hospital>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodListResponse {
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarnetTypeListResponse {
    pub carnet_types: Vec<CarnetType>,
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    /// Bookable slots in HH:MM format
    pub available_slots: Vec<String>,
    pub location: String,
    pub address: String,
    pub experience_years: u32,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyListResponse {
    pub specialties: Vec<String>,
}

// ---------------------------------------------------------------------------
// Appointments & reminders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub doctor: String,
    pub specialty: String,
    /// French short date, e.g. "15 Fév 2024"
    pub date: String,
    /// HH:MM
    pub time: String,
    pub status: AppointmentStatus,
    pub location: String,
    pub queue_number: Option<u32>,
    pub estimated_wait_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub slot: String,
    /// Defaults to today; accepts "15 Fév 2024" or "2024-02-15"
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAppointmentResponse {
    pub appointment: Appointment,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub active: Vec<Appointment>,
    pub cancelled: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelAppointmentResponse {
    pub appointment: Appointment,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePreviewResponse {
    pub doctor: String,
    pub date: String,
    pub queue_number: u32,
    pub estimated_wait_minutes: u32,
}

/// Urgency bucket of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Soon,
    Today,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Identifier of the appointment the reminder is derived from
    pub id: String,
    /// Doctor name without the "Dr. " prefix
    pub doctor_name: String,
    pub specialty: String,
    pub date: String,
    pub time: String,
    pub location: String,
    /// Hours until the appointment, clamped at zero and rounded to one decimal
    pub hours_until: f64,
    pub kind: ReminderKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderListResponse {
    pub reminders: Vec<Reminder>,
}

// ---------------------------------------------------------------------------
// Carnets & purchase wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarnetStatus {
    Active,
    Used,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub last_name: String,
    pub first_name: String,
    /// DD/MM/YYYY
    pub date_of_birth: String,
    pub card_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carnet {
    pub id: String,
    pub carnet_type: String,
    pub purchase_date: String,
    pub expiry_date: String,
    /// Price in FCFA
    pub price: u32,
    pub hospital: String,
    pub city: String,
    pub serial_number: String,
    pub qr_code: String,
    pub status: CarnetStatus,
    pub patient: PatientSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarnetListResponse {
    pub carnets: Vec<Carnet>,
}

/// Steps of the carnet purchase flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    City,
    Hospital,
    CarnetType,
    Review,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub city: Option<String>,
    pub hospital: Option<Hospital>,
    pub carnet_type: Option<CarnetType>,
    pub payment_method: Option<PaymentMethod>,
    pub save_default_city: bool,
    /// Persisted default city, offered as a hint at the city step
    pub default_city: Option<String>,
    /// Hospitals of the selected city
    pub available_hospitals: Vec<Hospital>,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCityRequest {
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectHospitalRequest {
    pub hospital_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCarnetTypeRequest {
    pub carnet_type_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectPaymentMethodRequest {
    pub payment_method_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDefaultCityRequest {
    pub save_default_city: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardBackRequest {
    pub step: WizardStep,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletePurchaseRequest {
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletePurchaseResponse {
    pub carnet: Carnet,
    pub success_message: String,
    /// True when the submission repeated an already fulfilled purchase
    pub duplicate: bool,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alert,
    Reminder,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Alerts,
    Reminders,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// RFC 3339
    pub timestamp: String,
    /// Relative label such as "il y a 15 min"
    pub time_label: String,
    pub read: bool,
    pub action_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated_count: usize,
    pub unread_count: usize,
}

// ---------------------------------------------------------------------------
// Chat assist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub from: ChatSender,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatMessageResponse {
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessage>,
}

/// Body sent to the optional remote chat assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAssistRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
}

/// Reply of the remote chat assistant: either plain text or `{ "text": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatAssistReply {
    Text(String),
    Structured { text: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAssistResponse {
    #[serde(default)]
    pub reply: Option<ChatAssistReply>,
}

// ---------------------------------------------------------------------------
// Front-end log forwarding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
}
