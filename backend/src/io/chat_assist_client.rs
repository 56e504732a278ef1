//! HTTP client for the optional remote chat assistant.
//!
//! POSTs `{message, history}` as JSON and accepts `{reply}` where the reply is
//! either a string or an object with a `text` field.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::domain::chat_service::{ChatAssistClient, ChatError, NO_ANSWER_MESSAGE};
use crate::domain::models::chat::ChatMessage;
use crate::io::rest::mappers::chat_mapper::ChatMapper;
use shared::{ChatAssistReply, ChatAssistRequest, ChatAssistResponse};

pub struct HttpChatAssistClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChatAssistClient {
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.trim().to_string(),
            client,
            timeout,
        })
    }
}

#[async_trait]
impl ChatAssistClient for HttpChatAssistClient {
    async fn ask(&self, message: &str, history: &[ChatMessage]) -> Result<String, ChatError> {
        let body = ChatAssistRequest {
            message: message.to_string(),
            history: ChatMapper::to_dto_list(history),
        };
        debug!("Forwarding chat message to {} ({} prior messages)", self.url, history.len());

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ChatError::Unreachable(self.url.clone())
                } else if e.is_timeout() {
                    ChatError::Unreachable(format!(
                        "{} (délai de {}s dépassé)",
                        self.url,
                        self.timeout.as_secs()
                    ))
                } else {
                    ChatError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::BadStatus(status.as_u16()));
        }

        let parsed: ChatAssistResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        Ok(reply_text(parsed))
    }
}

/// Text of an assistant response, or the no-answer message when it has none
pub fn reply_text(response: ChatAssistResponse) -> String {
    match response.reply {
        Some(ChatAssistReply::Text(text)) => text,
        Some(ChatAssistReply::Structured { text: Some(text) }) => text,
        Some(ChatAssistReply::Structured { text: None }) | None => NO_ANSWER_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChatAssistResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_reply_text_variants() {
        assert_eq!(reply_text(parse(r#"{"reply":"Bonjour"}"#)), "Bonjour");
        assert_eq!(reply_text(parse(r#"{"reply":{"text":"Salut"}}"#)), "Salut");
        assert_eq!(reply_text(parse(r#"{"reply":{}}"#)), NO_ANSWER_MESSAGE);
        assert_eq!(reply_text(parse("{}")), NO_ANSWER_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_reported() {
        let client =
            HttpChatAssistClient::new("http://127.0.0.1:1/chat", Duration::from_secs(2)).unwrap();
        let result = client.ask("Bonjour", &[]).await;
        assert!(matches!(result, Err(ChatError::Unreachable(_))));
    }
}
