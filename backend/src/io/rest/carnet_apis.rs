//! # REST API for Carnets
//!
//! Listing and download of the patient's carnets, plus the purchase wizard.
//! The wizard is session state on the server: every transition answers with
//! the full `WizardView` so the front end never tracks steps itself.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use shared::{
    CarnetListResponse, CompletePurchaseRequest, SelectCarnetTypeRequest, SelectCityRequest,
    SelectHospitalRequest, SelectPaymentMethodRequest, SetDefaultCityRequest, WizardBackRequest,
};
use tracing::{error, info};

use super::error_response;
use super::mappers::carnet_mapper::CarnetMapper;
use crate::domain::carnet_service::CarnetError;
use crate::domain::commands::carnet::{CarnetListQuery, CompletePurchaseCommand, WizardState};
use crate::domain::models::carnet::CarnetStatus;
use crate::domain::purchase_wizard::WizardError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CarnetSearchQuery {
    pub search: Option<String>,
    /// `all`, `active`, `used` or `expired`
    pub status: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_carnets))
        .route("/wizard", get(get_wizard))
        .route("/wizard/city", post(select_city))
        .route("/wizard/hospital", post(select_hospital))
        .route("/wizard/carnet-type", post(select_carnet_type))
        .route("/wizard/review", post(confirm_review))
        .route("/wizard/payment-method", post(select_payment_method))
        .route("/wizard/default-city", post(set_default_city))
        .route("/wizard/back", post(go_back))
        .route("/wizard/reset", post(reset_wizard))
        .route("/wizard/complete", post(complete_purchase))
        .route("/:carnet_id", get(get_carnet))
        .route("/:carnet_id/document", get(download_document))
}

fn status_for(error: &CarnetError) -> StatusCode {
    match error {
        CarnetError::NotFound(_) => StatusCode::NOT_FOUND,
        CarnetError::Wizard(wizard_error) => match wizard_error {
            WizardError::UnknownCity(_)
            | WizardError::UnknownHospital(_)
            | WizardError::HospitalOutsideCity { .. }
            | WizardError::UnknownCarnetType(_)
            | WizardError::UnknownPaymentMethod(_) => StatusCode::BAD_REQUEST,
            WizardError::CityRequired
            | WizardError::HospitalRequired
            | WizardError::CarnetTypeRequired
            | WizardError::StepUnavailable { .. }
            | WizardError::CannotSkipAhead { .. }
            | WizardError::NotReady
            | WizardError::StaleRequest => StatusCode::CONFLICT,
        },
    }
}

fn wizard_response(action: &str, result: Result<WizardState, CarnetError>) -> Response {
    match result {
        Ok(state) => (StatusCode::OK, Json(CarnetMapper::to_wizard_view(state))).into_response(),
        Err(e) => {
            error!("Wizard {} failed: {}", action, e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<CarnetStatus>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => CarnetStatus::parse(value)
            .map(Some)
            .ok_or_else(|| format!("Statut de carnet inconnu : {}", value)),
    }
}

pub async fn list_carnets(
    State(state): State<AppState>,
    Query(query): Query<CarnetSearchQuery>,
) -> impl IntoResponse {
    info!("GET /api/carnets - query: {:?}", query);

    let status = match parse_status_filter(query.status.as_deref()) {
        Ok(status) => status,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let carnets = state.carnet_service.list(&CarnetListQuery {
        search: query.search,
        status,
    });

    let response = CarnetListResponse {
        carnets: CarnetMapper::to_dto_list(carnets),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn get_carnet(
    State(state): State<AppState>,
    Path(carnet_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/carnets/{}", carnet_id);
    match state.carnet_service.get(&carnet_id) {
        Ok(carnet) => (StatusCode::OK, Json(CarnetMapper::to_dto(carnet))).into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

pub async fn download_document(
    State(state): State<AppState>,
    Path(carnet_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/carnets/{}/document", carnet_id);
    match state.carnet_service.document(&carnet_id) {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.file_name),
                ),
            ],
            document.content,
        )
            .into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

pub async fn get_wizard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/carnets/wizard");
    Json(CarnetMapper::to_wizard_view(state.carnet_service.wizard()))
}

pub async fn select_city(
    State(state): State<AppState>,
    Json(request): Json<SelectCityRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/city - request: {:?}", request);
    wizard_response("select city", state.carnet_service.select_city(request.city.trim()))
}

pub async fn select_hospital(
    State(state): State<AppState>,
    Json(request): Json<SelectHospitalRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/hospital - request: {:?}", request);
    wizard_response(
        "select hospital",
        state.carnet_service.select_hospital(&request.hospital_id),
    )
}

pub async fn select_carnet_type(
    State(state): State<AppState>,
    Json(request): Json<SelectCarnetTypeRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/carnet-type - request: {:?}", request);
    wizard_response(
        "select carnet type",
        state.carnet_service.select_carnet_type(&request.carnet_type_id),
    )
}

/// Accept the review and move on to payment
pub async fn confirm_review(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/review");
    wizard_response("confirm review", state.carnet_service.proceed_to_payment())
}

pub async fn select_payment_method(
    State(state): State<AppState>,
    Json(request): Json<SelectPaymentMethodRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/payment-method - request: {:?}", request);
    wizard_response(
        "select payment method",
        state
            .carnet_service
            .select_payment_method(&request.payment_method_id),
    )
}

pub async fn set_default_city(
    State(state): State<AppState>,
    Json(request): Json<SetDefaultCityRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/default-city - request: {:?}", request);
    wizard_response(
        "save default city",
        state
            .carnet_service
            .set_save_default_city(request.save_default_city),
    )
}

pub async fn go_back(
    State(state): State<AppState>,
    Json(request): Json<WizardBackRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/back - request: {:?}", request);
    wizard_response(
        "go back",
        state
            .carnet_service
            .go_back(CarnetMapper::step_to_domain(request.step)),
    )
}

pub async fn reset_wizard(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/reset");
    Json(CarnetMapper::to_wizard_view(state.carnet_service.reset_wizard()))
}

pub async fn complete_purchase(
    State(state): State<AppState>,
    Json(request): Json<CompletePurchaseRequest>,
) -> impl IntoResponse {
    info!("POST /api/carnets/wizard/complete - request: {:?}", request);

    let patient = match state.auth_service.require_user() {
        Ok(user) => user,
        Err(e) => return error_response(StatusCode::UNAUTHORIZED, e.to_string()),
    };
    let command = CompletePurchaseCommand {
        patient,
        idempotency_key: request.idempotency_key,
    };

    match state.carnet_service.complete(command) {
        Ok(result) => {
            let status = if result.duplicate {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(CarnetMapper::to_complete_response(result))).into_response()
        }
        Err(e) => {
            error!("Failed to complete purchase: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use super::*;
    use axum::http::Method;
    use serde_json::{json, Value};

    async fn post(app: &TestApp, path: &str, body: Value) -> (StatusCode, Value) {
        app.send(Method::POST, &format!("/api/carnets/wizard/{}", path), Some(body))
            .await
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None), Ok(None));
        assert_eq!(parse_status_filter(Some("all")), Ok(None));
        assert_eq!(parse_status_filter(Some("expired")), Ok(Some(CarnetStatus::Expired)));
        assert!(parse_status_filter(Some("perdu")).is_err());
    }

    #[tokio::test]
    async fn test_list_and_filters() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::GET, "/api/carnets", None).await;
        assert_eq!(status, StatusCode::OK);
        let carnets = body["carnets"].as_array().unwrap();
        assert_eq!(carnets.len(), 2);
        assert_eq!(carnets[0]["purchase_date"], "15 Jan 2024");
        assert_eq!(carnets[0]["status"], "active");

        let (_, body) = app.send(Method::GET, "/api/carnets?search=principal&status=all", None).await;
        assert_eq!(body["carnets"].as_array().map(Vec::len), Some(1));

        let (status, _) = app.send(Method::GET, "/api/carnets?status=perdu", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_detail_and_document() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::GET, "/api/carnets/SN-2024-002", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hospital"], "Hôpital Principal de Dakar");

        let (status, headers, text) = app
            .send_raw(Method::GET, "/api/carnets/SN-2024-001/document", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"carnet-medical-SN-2024-001.txt\""
        );
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert!(text.contains("SN-CARN-2024-001-ABC123"));

        let (status, _) = app.send(Method::GET, "/api/carnets/SN-0000-000", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_purchase_flow() {
        let app = TestApp::signed_in().await;

        let (_, body) = app.send(Method::GET, "/api/carnets/wizard", None).await;
        assert_eq!(body["step"], "city");

        let (status, body) = post(&app, "city", json!({ "city": "Dakar" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], "hospital");
        assert_eq!(body["available_hospitals"].as_array().map(Vec::len), Some(3));

        let (status, _) = post(&app, "hospital", json!({ "hospital_id": "5" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = post(&app, "hospital", json!({ "hospital_id": "1" })).await;
        assert_eq!(body["step"], "carnet_type");

        let (_, body) = post(&app, "carnet-type", json!({ "carnet_type_id": "specialiste" })).await;
        assert_eq!(body["step"], "review");
        assert_eq!(body["carnet_type"]["validity_label"], "6 mois");

        let (_, body) = post(&app, "default-city", json!({ "save_default_city": true })).await;
        assert_eq!(body["save_default_city"], true);

        let (_, body) = app
            .send(Method::POST, "/api/carnets/wizard/review", None)
            .await;
        assert_eq!(body["step"], "payment");

        let (_, body) = post(&app, "payment-method", json!({ "payment_method_id": "wave" })).await;
        assert_eq!(body["payment_method"]["name"], "Wave");
        let key = body["idempotency_key"].clone();

        let (status, body) = post(&app, "complete", json!({ "idempotency_key": key.clone() })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["duplicate"], false);
        assert_eq!(body["carnet"]["price"], 10000);
        assert_eq!(body["carnet"]["city"], "Dakar");
        let carnet_id = body["carnet"]["id"].clone();

        let (status, body) = post(&app, "complete", json!({ "idempotency_key": key })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["duplicate"], true);
        assert_eq!(body["carnet"]["id"], carnet_id);

        let (status, _) = post(&app, "complete", json!({})).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = app.send(Method::GET, "/api/carnets", None).await;
        assert_eq!(body["carnets"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["carnets"][0]["id"], carnet_id);

        let (_, body) = app.send(Method::GET, "/api/catalog/cities", None).await;
        assert_eq!(body["default_city"], "Dakar");
    }

    #[tokio::test]
    async fn test_back_and_reset() {
        let app = TestApp::signed_in().await;
        post(&app, "city", json!({ "city": "Thiès" })).await;
        post(&app, "hospital", json!({ "hospital_id": "4" })).await;

        let (status, _) = post(&app, "back", json!({ "step": "payment" })).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = post(&app, "back", json!({ "step": "city" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], "city");
        assert!(body["hospital"].is_null());
        assert_eq!(body["city"], "Thiès");

        let (_, body) = app.send(Method::POST, "/api/carnets/wizard/reset", None).await;
        assert_eq!(body["step"], "city");
        assert!(body["city"].is_null());
    }
}
