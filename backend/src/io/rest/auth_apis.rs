//! # REST API for Authentication
//!
//! Login, registration, logout and session lookup. Failures still answer
//! with an `AuthResponse` body so the front end can show the message.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{AuthResponse, LoginRequest, RegisterRequest, SessionResponse};
use tracing::{info, warn};

use super::mappers::user_mapper::UserMapper;
use crate::domain::auth_service::AuthError;
use crate::domain::models::user::User;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCredentials | AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AuthError::PasswordMismatch | AuthError::MissingFields => StatusCode::BAD_REQUEST,
    }
}

fn auth_result(result: Result<User, AuthError>, success_status: StatusCode) -> axum::response::Response {
    match result {
        Ok(user) => {
            let response = AuthResponse {
                success: true,
                message: None,
                user: Some(UserMapper::to_dto(user)),
            };
            (success_status, Json(response)).into_response()
        }
        Err(e) => {
            let response = AuthResponse {
                success: false,
                message: Some(e.to_string()),
                user: None,
            };
            (status_for(&e), Json(response)).into_response()
        }
    }
}

pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);
    let result = state.auth_service.login(UserMapper::to_login_command(request)).await;
    auth_result(result, StatusCode::OK)
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - email: {}", request.email);
    let result = state
        .auth_service
        .register(UserMapper::to_register_command(request))
        .await;
    if let Err(e) = &result {
        warn!("Registration rejected: {}", e);
    }
    auth_result(result, StatusCode::CREATED)
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/auth/logout");
    state.auth_service.logout();
    Json(SessionResponse {
        is_authenticated: false,
        user: None,
    })
}

pub async fn session(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/auth/session");
    let user = state.auth_service.current_user();
    Json(SessionResponse {
        is_authenticated: user.is_some(),
        user: user.map(UserMapper::to_dto),
    })
}
