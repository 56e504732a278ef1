//! # REST API for the Chat Assistant

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{ChatHistoryResponse, SendChatMessageRequest, SendChatMessageResponse};
use tracing::{info, warn};

use super::error_response;
use super::mappers::chat_mapper::ChatMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history).delete(clear_history))
        .route("/open", post(open_chat))
        .route("/messages", post(send_message))
}

pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/chat/history");
    Json(ChatHistoryResponse {
        messages: ChatMapper::to_dto_list(&state.chat_service.history()),
    })
}

pub async fn open_chat(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/chat/open");
    Json(ChatHistoryResponse {
        messages: ChatMapper::to_dto_list(&state.chat_service.open()),
    })
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendChatMessageRequest>,
) -> impl IntoResponse {
    info!("POST /api/chat/messages");

    match state.chat_service.send(&request.message).await {
        Ok(result) => {
            let response = SendChatMessageResponse {
                user_message: ChatMapper::to_dto(&result.user_message),
                reply: ChatMapper::to_dto(&result.reply),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Chat message rejected: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/chat/history");
    state.chat_service.clear();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::super::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_open_send_and_clear() {
        let app = TestApp::new();

        let (status, body) = app.send(Method::POST, "/api/chat/open", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["from"], "bot");

        let (status, body) = app
            .send(Method::POST, "/api/chat/messages", Some(json!({ "message": "Mon RDV ?" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_message"]["from"], "user");
        assert!(body["reply"]["text"].as_str().unwrap().contains("Rendez-vous"));

        let (status, _) = app
            .send(Method::POST, "/api/chat/messages", Some(json!({ "message": "  " })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = app.send(Method::GET, "/api/chat/history", None).await;
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(3));

        let (status, _) = app.send(Method::DELETE, "/api/chat/history", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = app.send(Method::GET, "/api/chat/history", None).await;
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(0));
    }
}
