//! # REST API for the Patient Profile

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{ProfileResponse, UpdateProfileRequest};
use tracing::{error, info};

use super::error_response;
use super::mappers::user_mapper::UserMapper;
use crate::domain::profile_service::ProfileError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

fn status_for(error: &ProfileError) -> StatusCode {
    match error {
        ProfileError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ProfileError::EmptyName | ProfileError::InvalidEmail | ProfileError::InvalidDateOfBirth => {
            StatusCode::BAD_REQUEST
        }
    }
}

pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/profile");

    match state.profile_service.get_profile() {
        Ok(profile) => {
            let response = ProfileResponse {
                profile: UserMapper::to_profile_dto(profile),
                success_message: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to get profile: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profile - request: {:?}", request);

    match state
        .profile_service
        .update_profile(UserMapper::to_update_command(request))
    {
        Ok(profile) => {
            let response = ProfileResponse {
                profile: UserMapper::to_profile_dto(profile),
                success_message: Some("Profil mis à jour avec succès".to_string()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update profile: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}
