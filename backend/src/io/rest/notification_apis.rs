//! # REST API for Notifications

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{MarkAllReadResponse, NotificationFilter};
use tracing::{info, warn};

use super::error_response;
use super::mappers::notification_mapper::NotificationMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub filter: NotificationFilter,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", post(mark_all_as_read))
        .route("/:notification_id/read", post(mark_as_read))
        .route("/:notification_id", delete(delete_notification))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> impl IntoResponse {
    info!("GET /api/notifications - query: {:?}", query);
    let result = state
        .notification_service
        .list(NotificationMapper::filter_to_domain(query.filter));
    Json(NotificationMapper::to_list_response(result, Utc::now()))
}

pub async fn mark_as_read(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/notifications/{}/read", notification_id);
    match state.notification_service.mark_as_read(&notification_id) {
        Ok(notification) => (
            StatusCode::OK,
            Json(NotificationMapper::to_dto(notification, Utc::now())),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to mark notification as read: {}", e);
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

pub async fn mark_all_as_read(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/notifications/read-all");
    let result = state.notification_service.mark_all_as_read();
    Json(MarkAllReadResponse {
        updated_count: result.updated_count,
        unread_count: result.unread_count,
    })
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/notifications/{}", notification_id);
    match state.notification_service.delete(&notification_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!("Failed to delete notification: {}", e);
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_list_with_filters() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::GET, "/api/notifications", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notifications"].as_array().map(Vec::len), Some(5));
        assert_eq!(body["unread_count"], 2);
        assert_eq!(body["notifications"][0]["kind"], "alert");
        assert_eq!(body["notifications"][0]["time_label"], "il y a 15 min");

        let (_, body) = app.send(Method::GET, "/api/notifications?filter=reminders", None).await;
        assert_eq!(body["notifications"].as_array().map(Vec::len), Some(2));

        let (status, _) = app.send(Method::GET, "/api/notifications?filter=bogus", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_read_and_delete() {
        let app = TestApp::signed_in().await;

        let (status, body) = app.send(Method::POST, "/api/notifications/1/read", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["read"], true);

        let (_, body) = app.send(Method::POST, "/api/notifications/read-all", None).await;
        assert_eq!(body["updated_count"], 1);
        assert_eq!(body["unread_count"], 0);

        let (status, _) = app.send(Method::DELETE, "/api/notifications/3", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::DELETE, "/api/notifications/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app.send(Method::GET, "/api/notifications?filter=unread", None).await;
        assert_eq!(body["notifications"].as_array().map(Vec::len), Some(0));
    }
}
