//! Discussion message types.

use crate::persona::PersonaId;
use serde::{Deserialize, Serialize};

/// Kind of a message sender: the human operator or a crew persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message from the human operator.
    User,
    /// Message authored by a crew persona.
    Crew,
}

/// A single entry in a project's discussion history.
///
/// History is append-only: messages are never reordered or deleted
/// individually, only cleared wholesale when a brief is resubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Sender kind
    pub role: MessageRole,
    /// Authoring persona; present iff `role` is [`MessageRole::Crew`]
    #[serde(default)]
    pub persona: Option<PersonaId>,
    /// Text content
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format)
    pub timestamp: String,
}

impl Message {
    /// Builds a message from the human operator, stamped with a fresh id
    /// and the current time.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::User,
            persona: None,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Builds a message attributed to a crew persona.
    pub fn from_persona(persona: PersonaId, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::Crew,
            persona: Some(persona),
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
