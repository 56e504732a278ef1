//! Front-end log forwarding into the backend's tracing output.

use axum::{extract::State, response::Json};
use shared::{LogEntry, LogResponse};
use tracing::{debug, error, info, warn};

use crate::AppState;

pub async fn log_message(
    State(_state): State<AppState>,
    Json(request): Json<LogEntry>,
) -> Json<LogResponse> {
    let component = request.component.as_deref().unwrap_or("frontend");
    let message = format!("[{}] {}", component, request.message);

    match request.level.to_lowercase().as_str() {
        "debug" => debug!("{}", message),
        "info" => info!("{}", message),
        "warn" | "warning" => warn!("{}", message),
        "error" => error!("{}", message),
        _ => info!("{}", message),
    }

    Json(LogResponse { success: true })
}
