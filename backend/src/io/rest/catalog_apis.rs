//! # REST API for Reference Data
//!
//! Cities, hospitals, payment methods and carnet types. Public: the purchase
//! screens read them before the patient commits to anything.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{
    CarnetTypeListResponse, CityListResponse, HospitalListResponse, PaymentMethodListResponse,
};
use tracing::info;

use super::mappers::catalog_mapper::CatalogMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HospitalQuery {
    pub city: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/hospitals", get(list_hospitals))
        .route("/payment-methods", get(list_payment_methods))
        .route("/carnet-types", get(list_carnet_types))
}

pub async fn list_cities(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/cities");
    Json(CityListResponse {
        cities: state.catalog.cities().to_vec(),
        default_city: state.carnet_service.default_city(),
    })
}

pub async fn list_hospitals(
    State(state): State<AppState>,
    Query(query): Query<HospitalQuery>,
) -> impl IntoResponse {
    info!("GET /api/catalog/hospitals - query: {:?}", query);

    let hospitals = match query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(city) => state.catalog.hospitals_in_city(city),
        None => state.catalog.hospitals().to_vec(),
    };
    Json(HospitalListResponse {
        hospitals: CatalogMapper::hospitals_to_dto(hospitals),
    })
}

pub async fn list_payment_methods(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/payment-methods");
    Json(PaymentMethodListResponse {
        payment_methods: state
            .catalog
            .payment_methods()
            .iter()
            .cloned()
            .map(CatalogMapper::payment_method_to_dto)
            .collect(),
    })
}

pub async fn list_carnet_types(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/carnet-types");
    Json(CarnetTypeListResponse {
        carnet_types: state
            .catalog
            .carnet_types()
            .iter()
            .cloned()
            .map(CatalogMapper::carnet_type_to_dto)
            .collect(),
    })
}
