//! Chat session snapshot handed over by the chat-capture service.
//!
//! Read-only input to the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

/// Channel the conversation took place on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Web,
    Whatsapp,
    Facebook,
    Instagram,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Whatsapp => write!(f, "whatsapp"),
            Self::Facebook => write!(f, "facebook"),
            Self::Instagram => write!(f, "instagram"),
        }
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    Bot,
    User,
    Agent,
}

/// Coarse satisfaction label captured at the end of the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Satisfaction {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: MessageSender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Bot answer confidence, when the bot produced the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ChatMessage {
    pub fn new(sender: MessageSender, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", uuid::Uuid::new_v4()),
            sender,
            content: content.into(),
            timestamp: Utc::now(),
            confidence: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageSender::User, content)
    }

    pub fn bot(content: impl Into<String>, confidence: f64) -> Self {
        let mut message = Self::new(MessageSender::Bot, content);
        message.confidence = Some(confidence);
        message
    }
}

/// A finished chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    pub platform: Platform,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Whether the bot handed the conversation to a human
    #[serde(default)]
    pub handoff_occurred: bool,
    #[serde(default)]
    pub satisfaction: Option<Satisfaction>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ChatSession {
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        customer_name: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            platform,
            messages: Vec::new(),
            handoff_occurred: false,
            satisfaction: None,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_handoff(mut self, handoff: bool) -> Self {
        self.handoff_occurred = handoff;
        self
    }

    pub fn with_satisfaction(mut self, satisfaction: Satisfaction) -> Self {
        self.satisfaction = Some(satisfaction);
        self
    }

    /// Reject sessions missing the fields a ticket cannot be built without
    pub fn validate(&self) -> TriageResult<()> {
        if self.id.trim().is_empty() {
            return Err(TriageError::InvalidSession { field: "id" });
        }
        if self.customer_id.trim().is_empty() {
            return Err(TriageError::InvalidSession {
                field: "customer_id",
            });
        }
        Ok(())
    }

    pub fn is_negative(&self) -> bool {
        self.satisfaction == Some(Satisfaction::Negative)
    }

    /// Messages written by the customer, in order
    pub fn customer_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.sender == MessageSender::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_customer() {
        let session = ChatSession::new("chat-1", "  ", "Ana", Platform::Web);
        match session.validate() {
            Err(TriageError::InvalidSession { field }) => assert_eq!(field, "customer_id"),
            other => panic!("expected InvalidSession, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_minimal_session() {
        let session = ChatSession::new("chat-1", "cust-1", "", Platform::Whatsapp);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_customer_messages_skip_bot_and_agent() {
        let session = ChatSession::new("chat-1", "cust-1", "Ana", Platform::Web)
            .with_message(ChatMessage::bot("Hi! How can I help?", 0.9))
            .with_message(ChatMessage::user("My card was declined"))
            .with_message(ChatMessage::new(MessageSender::Agent, "Looking into it"))
            .with_message(ChatMessage::user("Thanks"));
        let texts: Vec<_> = session
            .customer_messages()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(texts, vec!["My card was declined", "Thanks"]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"c1","customer_id":"u1","platform":"instagram"}"#;
        let session: ChatSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.platform, Platform::Instagram);
        assert!(session.tags.is_empty());
        assert!(!session.handoff_occurred);
        assert_eq!(session.satisfaction, None);
    }
}
