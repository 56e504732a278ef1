//! # REST API Interface Layer
//!
//! HTTP endpoints of the MediPass backend, nested under `/api`.
//!
//! | Prefix           | Module             | Session |
//! |------------------|--------------------|---------|
//! | `/auth`          | `auth_apis`        | no      |
//! | `/catalog`       | `catalog_apis`     | no      |
//! | `/chat`          | `chat_apis`        | no      |
//! | `/logs`          | `logging_apis`     | no      |
//! | `/profile`       | `profile_apis`     | yes     |
//! | `/doctors`       | `doctor_apis`      | yes     |
//! | `/appointments`  | `appointment_apis` | yes     |
//! | `/carnets`       | `carnet_apis`      | yes     |
//! | `/notifications` | `notification_apis`| yes     |
//!
//! Handlers log `METHOD /path` at info, translate the request into a domain
//! command, and map each domain error variant to a status code with the
//! French error message as the body.

pub mod appointment_apis;
pub mod auth_apis;
pub mod carnet_apis;
pub mod catalog_apis;
pub mod chat_apis;
pub mod doctor_apis;
pub mod logging_apis;
pub mod mappers;
pub mod notification_apis;
pub mod profile_apis;
pub mod session_guard;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Plain-text error body with the given status
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::domain::auth_service::{DEMO_EMAIL, DEMO_PASSWORD};
    use crate::storage::MemoryPreferenceStore;
    use crate::{create_router, initialize_backend_with_storage, AppState};

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
    }

    impl TestApp {
        pub fn new() -> Self {
            let config = AppConfig::for_tests(std::env::temp_dir());
            let state =
                initialize_backend_with_storage(&config, Arc::new(MemoryPreferenceStore::new()))
                    .unwrap();
            let router = create_router(state.clone(), &config).unwrap();
            Self { router, state }
        }

        /// Fresh app with the demo patient signed in
        pub async fn signed_in() -> Self {
            let app = Self::new();
            let (status, _) = app
                .send(
                    Method::POST,
                    "/api/auth/login",
                    Some(serde_json::json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            app
        }

        pub async fn send_raw(
            &self,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, axum::http::HeaderMap, String) {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
        }

        /// Send a request; the body is parsed as JSON when possible, else kept as a string
        pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let (status, _, text) = self.send_raw(method, uri, body).await;
            let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
            (status, value)
        }
    }
}
