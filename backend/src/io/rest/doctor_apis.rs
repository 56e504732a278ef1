//! # REST API for the Doctor Directory

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{DoctorListResponse, SpecialtyListResponse};
use tracing::{info, warn};

use super::error_response;
use super::mappers::catalog_mapper::CatalogMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub search: Option<String>,
    /// Exact specialty, or `all`
    pub specialty: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_doctors))
        .route("/specialties", get(list_specialties))
        .route("/:doctor_id", get(get_doctor))
}

pub async fn search_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorSearchQuery>,
) -> impl IntoResponse {
    info!("GET /api/doctors - query: {:?}", query);
    let doctors = state
        .doctor_directory
        .search(query.search.as_deref(), query.specialty.as_deref());
    Json(DoctorListResponse {
        doctors: CatalogMapper::doctors_to_dto(doctors),
    })
}

pub async fn list_specialties(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/doctors/specialties");
    Json(SpecialtyListResponse {
        specialties: state.doctor_directory.specialties(),
    })
}

pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/doctors/{}", doctor_id);
    match state.doctor_directory.find(&doctor_id) {
        Some(doctor) => (StatusCode::OK, Json(CatalogMapper::doctor_to_dto(doctor))).into_response(),
        None => {
            warn!("Doctor {} not found", doctor_id);
            error_response(StatusCode::NOT_FOUND, format!("Médecin introuvable : {}", doctor_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_search_and_specialties() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::GET, "/api/doctors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctors"].as_array().map(Vec::len), Some(4));

        let (_, body) = app.send(Method::GET, "/api/doctors?search=MARIE", None).await;
        let doctors = body["doctors"].as_array().unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0]["name"], "Dr. Marie Martin");

        let (_, body) = app.send(Method::GET, "/api/doctors?specialty=all", None).await;
        assert_eq!(body["doctors"].as_array().map(Vec::len), Some(4));

        let (_, body) = app.send(Method::GET, "/api/doctors/specialties", None).await;
        assert_eq!(body["specialties"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_get_doctor() {
        let app = TestApp::signed_in().await;
        let (status, body) = app.send(Method::GET, "/api/doctors/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available_slots"][0], "14:30");

        let (status, _) = app.send(Method::GET, "/api/doctors/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
