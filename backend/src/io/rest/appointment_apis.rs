//! # REST API for Appointments
//!
//! Booking, cancellation, queue preview and the reminders derived from
//! upcoming confirmed appointments.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{
    BookAppointmentRequest, BookAppointmentResponse, CancelAppointmentResponse,
    ReminderListResponse,
};
use tracing::{error, info};

use super::error_response;
use super::mappers::appointment_mapper::AppointmentMapper;
use crate::domain::appointment_service::AppointmentError;
use crate::domain::commands::appointment::BookAppointmentCommand;
use crate::domain::date_format::parse_date;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QueuePreviewQuery {
    pub doctor_id: String,
    pub date: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(book_appointment))
        .route("/queue-preview", get(queue_preview))
        .route("/reminders", get(list_reminders))
        .route("/reminders/:appointment_id/dismiss", post(dismiss_reminder))
        .route("/:appointment_id/cancel", post(cancel_appointment))
}

fn status_for(error: &AppointmentError) -> StatusCode {
    match error {
        AppointmentError::DoctorNotFound(_) | AppointmentError::NotFound(_) => StatusCode::NOT_FOUND,
        AppointmentError::SlotUnavailable { .. } => StatusCode::BAD_REQUEST,
        AppointmentError::AlreadyCancelled(_) => StatusCode::CONFLICT,
    }
}

/// Optional date in ISO or French short form; blank means today
fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| format!("Date invalide : {}", value)),
        None => Ok(None),
    }
}

pub async fn list_appointments(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/appointments");
    Json(AppointmentMapper::to_list_response(state.appointment_service.list()))
}

pub async fn book_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookAppointmentRequest>,
) -> impl IntoResponse {
    info!("POST /api/appointments - request: {:?}", request);

    let date = match parse_optional_date(request.date.as_deref()) {
        Ok(date) => date,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let command = BookAppointmentCommand {
        doctor_id: request.doctor_id,
        slot: request.slot.trim().to_string(),
        date,
    };

    match state.appointment_service.book(command) {
        Ok(result) => {
            let response = BookAppointmentResponse {
                appointment: AppointmentMapper::to_dto(result.appointment),
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to book appointment: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/appointments/{}/cancel", appointment_id);

    match state.appointment_service.cancel(&appointment_id) {
        Ok(result) => {
            let response = CancelAppointmentResponse {
                appointment: AppointmentMapper::to_dto(result.appointment),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to cancel appointment {}: {}", appointment_id, e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

pub async fn queue_preview(
    State(state): State<AppState>,
    Query(query): Query<QueuePreviewQuery>,
) -> impl IntoResponse {
    info!("GET /api/appointments/queue-preview - query: {:?}", query);

    let date = match parse_optional_date(query.date.as_deref()) {
        Ok(date) => date,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state.appointment_service.queue_preview(&query.doctor_id, date) {
        Ok(result) => (
            StatusCode::OK,
            Json(AppointmentMapper::to_queue_preview_response(result)),
        )
            .into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

pub async fn list_reminders(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/appointments/reminders");
    Json(ReminderListResponse {
        reminders: state
            .appointment_service
            .reminders()
            .into_iter()
            .map(AppointmentMapper::reminder_to_dto)
            .collect(),
    })
}

pub async fn dismiss_reminder(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/appointments/reminders/{}/dismiss", appointment_id);

    match state.appointment_service.dismiss_reminder(&appointment_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use super::*;
    use axum::http::Method;
    use chrono::{Duration, Local};
    use serde_json::json;

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None), Ok(None));
        assert_eq!(parse_optional_date(Some("  ")), Ok(None));
        assert_eq!(
            parse_optional_date(Some("15 Fév 2024")),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 15))
        );
        assert_eq!(
            parse_optional_date(Some("2024-02-15")),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 15))
        );
        assert!(parse_optional_date(Some("demain")).is_err());
    }

    #[tokio::test]
    async fn test_list_book_and_cancel() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::GET, "/api/appointments", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["active"][0]["date"], "15 Fév 2024");

        let (status, body) = app
            .send(
                Method::POST,
                "/api/appointments",
                Some(json!({ "doctor_id": "1", "slot": "15:00", "date": "2024-02-15" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["appointment"]["id"], "APT-003");
        assert_eq!(body["appointment"]["queue_number"], 2);
        assert_eq!(body["appointment"]["estimated_wait_minutes"], 15);
        assert_eq!(body["appointment"]["status"], "confirmed");

        let (status, body) = app
            .send(Method::POST, "/api/appointments/APT-003/cancel", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appointment"]["status"], "cancelled");

        let (status, _) = app
            .send(Method::POST, "/api/appointments/APT-003/cancel", None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .send(Method::POST, "/api/appointments/APT-404/cancel", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app.send(Method::GET, "/api/appointments", None).await;
        assert_eq!(body["cancelled"][0]["id"], "APT-003");
    }

    #[tokio::test]
    async fn test_booking_rejections() {
        let app = TestApp::signed_in().await;

        let (status, _) = app
            .send(Method::POST, "/api/appointments", Some(json!({ "doctor_id": "1", "slot": "07:00" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(Method::POST, "/api/appointments", Some(json!({ "doctor_id": "42", "slot": "14:30" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .send(
                Method::POST,
                "/api/appointments",
                Some(json!({ "doctor_id": "1", "slot": "14:30", "date": "bientôt" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!("Date invalide : bientôt"));
    }

    #[tokio::test]
    async fn test_queue_preview() {
        let app = TestApp::signed_in().await;
        let (status, body) = app
            .send(
                Method::GET,
                "/api/appointments/queue-preview?doctor_id=1&date=2024-02-15",
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctor"], "Dr. Marie Martin");
        assert_eq!(body["date"], "15 Fév 2024");
        assert_eq!(body["queue_number"], 2);
        assert_eq!(body["estimated_wait_minutes"], 15);
    }

    #[tokio::test]
    async fn test_reminders_and_dismiss() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::GET, "/api/appointments/reminders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reminders"].as_array().map(Vec::len), Some(0));

        let tomorrow = (Local::now() + Duration::hours(20)).date_naive();
        let (status, body) = app
            .send(
                Method::POST,
                "/api/appointments",
                Some(json!({ "doctor_id": "3", "slot": "09:00", "date": tomorrow.format("%Y-%m-%d").to_string() })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["appointment"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send(Method::POST, &format!("/api/appointments/reminders/{}/dismiss", id), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.send(Method::GET, "/api/appointments/reminders", None).await;
        let reminders = body["reminders"].as_array().unwrap();
        assert!(reminders.iter().all(|r| r["id"] != id.as_str()));

        let (status, _) = app
            .send(Method::POST, "/api/appointments/reminders/APT-999/dismiss", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
