//! Middleware rejecting requests to patient resources without a session.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::error_response;
use crate::domain::auth_service::AuthError;
use crate::AppState;

pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.auth_service.current_user().is_none() {
        warn!("Rejected {} {}: no session", request.method(), request.uri().path());
        return error_response(StatusCode::UNAUTHORIZED, AuthError::NotAuthenticated.to_string());
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::Value;

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let app = TestApp::new();
        for uri in [
            "/api/profile",
            "/api/doctors",
            "/api/appointments",
            "/api/carnets",
            "/api/notifications",
        ] {
            let (status, body) = app.send(Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body, Value::String("Veuillez vous connecter".to_string()));
        }
    }

    #[tokio::test]
    async fn test_public_routes_do_not_require_session() {
        let app = TestApp::new();
        let (status, _) = app.send(Method::GET, "/api/catalog/cities", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send(Method::GET, "/api/auth/session", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
