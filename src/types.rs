use serde::{Deserialize, Serialize};

/// Opaque ID types, as handed to us by the transport
pub type ChatId = i64;
pub type UserId = i64;
/// Reference to a message the transport has sent or received
pub type MessageRef = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Idle,
    AwaitingGuess,
}

/// Read-only view of a chat's session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub chat_id: ChatId,
    pub phase: Phase,
    pub leader_id: Option<UserId>,
    pub secret_word: Option<String>,
    pub prompt_ref: Option<MessageRef>,
}
