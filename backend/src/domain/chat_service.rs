//! Chat assistant conversation.
//!
//! The conversation is kept in memory and mirrored as a JSON array into
//! preference storage. When a remote assistant is configured each message is
//! forwarded to it; any failure there falls back to canned local replies so
//! the patient always gets an answer.

use async_trait::async_trait;
use chrono::{Local, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::commands::chat::SendMessageResult;
use super::lock_state;
use super::models::chat::{ChatMessage, ChatSender};
use crate::storage::{load_json, save_json, PreferenceStorage, CHAT_HISTORY_KEY};

pub const WELCOME_MESSAGE: &str =
    "Bonjour ! Je suis l'assistant MediPass. En quoi puis-je vous aider ?";
pub const NO_ANSWER_MESSAGE: &str = "Désolé, je n'ai pas de réponse.";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
    #[error("Le message ne peut pas être vide")]
    EmptyMessage,
    #[error("Assistant injoignable : {0}")]
    Unreachable(String),
    #[error("L'assistant a répondu avec le statut {0}")]
    BadStatus(u16),
    #[error("Réponse de l'assistant illisible : {0}")]
    InvalidResponse(String),
}

/// Remote assistant answering a message given the prior conversation
#[async_trait]
pub trait ChatAssistClient: Send + Sync {
    async fn ask(&self, message: &str, history: &[ChatMessage]) -> Result<String, ChatError>;
}

/// Local keyword-based reply used when no remote assistant answers
pub fn canned_reply(text: &str) -> &'static str {
    let text = text.to_lowercase();
    if text.contains("rendez") || text.contains("rdv") {
        "Pour gérer vos rendez-vous, allez dans l'onglet 'Rendez-vous'. Voulez-vous que je vous y conduise ?"
    } else if text.contains("carnet") {
        "Vous pouvez acheter ou renouveler un carnet via l'onglet 'Carnets'. Voulez-vous voir les types disponibles ?"
    } else if text.contains("contact") || text.contains("expert") {
        "Pour contacter un expert, utilisez notre formulaire de contact ou appelez +221 700 000 000."
    } else if text.contains("merci") || text.contains("thank") {
        "Avec plaisir, n'hésitez pas si vous avez d'autres questions !"
    } else {
        "Je peux vous aider à gérer vos rendez-vous, carnets ou à contacter un expert. Que souhaitez-vous faire ?"
    }
}

#[derive(Clone)]
pub struct ChatService {
    client: Option<Arc<dyn ChatAssistClient>>,
    storage: Arc<dyn PreferenceStorage>,
    history: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ChatService {
    pub fn new(client: Option<Arc<dyn ChatAssistClient>>, storage: Arc<dyn PreferenceStorage>) -> Self {
        let history: Vec<ChatMessage> =
            load_json(storage.as_ref(), CHAT_HISTORY_KEY).unwrap_or_default();
        debug!("Loaded {} chat messages", history.len());

        Self {
            client,
            storage,
            history: Arc::new(Mutex::new(history)),
        }
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        lock_state(&self.history).clone()
    }

    /// Open the chat window; greets the patient on an empty conversation
    pub fn open(&self) -> Vec<ChatMessage> {
        let mut history = lock_state(&self.history);
        if history.is_empty() {
            history.push(ChatMessage {
                id: "welcome".to_string(),
                from: ChatSender::Bot,
                text: WELCOME_MESSAGE.to_string(),
                time: clock(),
            });
            self.persist(&history);
        }
        history.clone()
    }

    pub async fn send(&self, text: &str) -> Result<SendMessageResult, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let stamp = Utc::now().timestamp_millis();
        let user_message = ChatMessage {
            id: stamp.to_string(),
            from: ChatSender::User,
            text: text.to_string(),
            time: clock(),
        };

        let prior = {
            let mut history = lock_state(&self.history);
            let prior = history.clone();
            history.push(user_message.clone());
            self.persist(&history);
            prior
        };

        let reply_text = match &self.client {
            Some(client) => match client.ask(text, &prior).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Chat assistant failed, using local reply: {}", e);
                    canned_reply(text).to_string()
                }
            },
            None => canned_reply(text).to_string(),
        };

        let reply = ChatMessage {
            id: (stamp + 1).to_string(),
            from: ChatSender::Bot,
            text: reply_text,
            time: clock(),
        };

        {
            let mut history = lock_state(&self.history);
            history.push(reply.clone());
            self.persist(&history);
        }

        Ok(SendMessageResult {
            user_message,
            reply,
        })
    }

    pub fn clear(&self) {
        lock_state(&self.history).clear();
        if let Err(e) = self.storage.remove(CHAT_HISTORY_KEY) {
            warn!("Failed to remove chat history: {}", e);
        }
        info!("Chat history cleared");
    }

    fn persist(&self, history: &[ChatMessage]) {
        if let Err(e) = save_json(self.storage.as_ref(), CHAT_HISTORY_KEY, &history) {
            warn!("Failed to save chat history: {}", e);
        }
    }
}

fn clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferenceStore;

    struct ScriptedAssistant {
        reply: Result<String, ChatError>,
        seen_history: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl ChatAssistClient for ScriptedAssistant {
        async fn ask(&self, _message: &str, history: &[ChatMessage]) -> Result<String, ChatError> {
            self.seen_history.lock().unwrap().push(history.len());
            self.reply.clone()
        }
    }

    fn storage() -> Arc<dyn PreferenceStorage> {
        Arc::new(MemoryPreferenceStore::new())
    }

    #[test]
    fn test_canned_replies() {
        assert!(canned_reply("Je veux un RDV").contains("onglet 'Rendez-vous'"));
        assert!(canned_reply("Prendre rendez-vous").contains("onglet 'Rendez-vous'"));
        assert!(canned_reply("Acheter un carnet").contains("onglet 'Carnets'"));
        assert!(canned_reply("parler à un expert").contains("+221 700 000 000"));
        assert!(canned_reply("Merci !").starts_with("Avec plaisir"));
        assert!(canned_reply("bonjour").starts_with("Je peux vous aider"));
    }

    #[test]
    fn test_open_greets_only_once() {
        let service = ChatService::new(None, storage());
        let opened = service.open();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].id, "welcome");
        assert_eq!(opened[0].text, WELCOME_MESSAGE);
        assert_eq!(service.open().len(), 1);
    }

    #[tokio::test]
    async fn test_send_without_remote_uses_local_reply() {
        let service = ChatService::new(None, storage());
        let result = service.send("  un carnet svp ").await.unwrap();
        assert_eq!(result.user_message.text, "un carnet svp");
        assert_eq!(result.user_message.from, ChatSender::User);
        assert_eq!(result.reply.from, ChatSender::Bot);
        assert!(result.reply.text.contains("Carnets"));
        assert_eq!(service.history().len(), 2);

        assert_eq!(service.send("   ").await.unwrap_err(), ChatError::EmptyMessage);
    }

    #[tokio::test]
    async fn test_remote_reply_and_history_excludes_current_message() {
        let assistant = Arc::new(ScriptedAssistant {
            reply: Ok("Réponse distante".to_string()),
            seen_history: Mutex::new(Vec::new()),
        });
        let client: Arc<dyn ChatAssistClient> = assistant.clone();
        let service = ChatService::new(Some(client), storage());
        service.open();

        let result = service.send("Bonjour").await.unwrap();
        assert_eq!(result.reply.text, "Réponse distante");
        assert_eq!(*assistant.seen_history.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back() {
        let assistant = Arc::new(ScriptedAssistant {
            reply: Err(ChatError::BadStatus(503)),
            seen_history: Mutex::new(Vec::new()),
        });
        let client: Arc<dyn ChatAssistClient> = assistant;
        let service = ChatService::new(Some(client), storage());

        let result = service.send("merci beaucoup").await.unwrap();
        assert!(result.reply.text.starts_with("Avec plaisir"));
    }

    #[tokio::test]
    async fn test_history_persists_and_clears() {
        let storage = storage();
        let service = ChatService::new(None, storage.clone());
        service.open();
        service.send("rdv").await.unwrap();

        let reloaded = ChatService::new(None, storage.clone());
        assert_eq!(reloaded.history().len(), 3);

        reloaded.clear();
        assert!(reloaded.history().is_empty());
        assert_eq!(storage.get(CHAT_HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_history_starts_empty() {
        let storage = storage();
        storage.set(CHAT_HISTORY_KEY, "[{\"id\":").unwrap();
        let service = ChatService::new(None, storage);
        assert!(service.history().is_empty());
    }
}
