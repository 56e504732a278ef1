use shared::{ChatMessage, ChatSender};

use crate::domain::models::chat::{ChatMessage as DomainChatMessage, ChatSender as DomainChatSender};

pub struct ChatMapper;

impl ChatMapper {
    pub fn sender_to_dto(domain: DomainChatSender) -> ChatSender {
        match domain {
            DomainChatSender::User => ChatSender::User,
            DomainChatSender::Bot => ChatSender::Bot,
        }
    }

    pub fn to_dto(domain: &DomainChatMessage) -> ChatMessage {
        ChatMessage {
            id: domain.id.clone(),
            from: Self::sender_to_dto(domain.from),
            text: domain.text.clone(),
            time: domain.time.clone(),
        }
    }

    pub fn to_dto_list(domain: &[DomainChatMessage]) -> Vec<ChatMessage> {
        domain.iter().map(Self::to_dto).collect()
    }
}
