//! # MediPass Backend
//!
//! Patient services for MediPass: authentication, doctor directory,
//! appointments with queue placement and reminders, carnet purchase and
//! download, notifications and a chat assistant.
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients (web front end)
//!     ↓
//! IO Layer (axum REST handlers, mappers, session guard)
//!     ↓
//! Domain Layer (services, purchase wizard, queue, reminders)
//!     ↓
//! Storage Layer (key/value preferences: memory or JSON file)
//! ```
//!
//! The backend owns the session: a single signed-in patient per process,
//! persisted in preference storage and restored at startup.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AppointmentService, AuthService, CarnetService, CatalogProvider, ChatAssistClient,
    ChatService, DemoAuthProvider, DoctorDirectory, NotificationService, ProfileService,
    ReminderPolicy, StaticCatalog,
};
use crate::io::rest::{
    appointment_apis, auth_apis, carnet_apis, catalog_apis, chat_apis, doctor_apis,
    logging_apis, notification_apis, profile_apis, session_guard,
};
use crate::io::HttpChatAssistClient;
use crate::storage::{JsonFilePreferenceStore, PreferenceStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub catalog: Arc<dyn CatalogProvider>,
    pub doctor_directory: DoctorDirectory,
    pub appointment_service: AppointmentService,
    pub carnet_service: CarnetService,
    pub notification_service: NotificationService,
    pub chat_service: ChatService,
}

/// Initialize the backend with preferences stored under the configured data directory
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up preference storage in {}", config.data_dir.display());
    let storage = JsonFilePreferenceStore::new(&config.data_dir)
        .with_context(|| format!("Cannot open data directory {}", config.data_dir.display()))?;
    initialize_backend_with_storage(config, Arc::new(storage))
}

/// Initialize the backend on top of an existing preference store
pub fn initialize_backend_with_storage(
    config: &AppConfig,
    storage: Arc<dyn PreferenceStorage>,
) -> Result<AppState> {
    info!("Setting up domain model");
    let catalog: Arc<dyn CatalogProvider> = Arc::new(StaticCatalog::new());

    let auth_service = AuthService::new(
        Arc::new(DemoAuthProvider::new(config.simulated_latency)),
        storage.clone(),
    );
    let profile_service = ProfileService::new(auth_service.clone());
    let doctor_directory = DoctorDirectory::new(catalog.clone());
    let appointment_service = AppointmentService::new(
        catalog.clone(),
        ReminderPolicy {
            overdue_grace: config.overdue_reminder_grace,
        },
    );
    let carnet_service = CarnetService::new(catalog.clone(), storage.clone());
    let notification_service = NotificationService::new();

    let chat_client: Option<Arc<dyn ChatAssistClient>> = match &config.chat_api_url {
        Some(url) => {
            info!("Chat assistant forwarding to {}", url);
            let client: Arc<dyn ChatAssistClient> =
                Arc::new(HttpChatAssistClient::new(url, config.chat_timeout)?);
            Some(client)
        }
        None => {
            info!("No chat assistant configured, using local replies");
            None
        }
    };
    let chat_service = ChatService::new(chat_client, storage);

    info!("Setting up application state");
    Ok(AppState {
        auth_service,
        profile_service,
        catalog,
        doctor_directory,
        appointment_service,
        carnet_service,
        notification_service,
        chat_service,
    })
}

/// Build the HTTP router: `/api` routes, CORS, and the optional static front end
pub fn create_router(state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let patient_routes = Router::new()
        .nest("/profile", profile_apis::router())
        .nest("/doctors", doctor_apis::router())
        .nest("/appointments", appointment_apis::router())
        .nest("/carnets", carnet_apis::router())
        .nest("/notifications", notification_apis::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_guard::require_session,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/catalog", catalog_apis::router())
        .nest("/chat", chat_apis::router())
        .route("/logs", post(logging_apis::log_message))
        .merge(patient_routes);

    let mut app = Router::new().nest("/api", api_routes);
    if let Some(static_dir) = &config.static_dir {
        info!("Serving front end from {}", static_dir.display());
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    Ok(app.layer(cors).with_state(state))
}
