//! Message kinds exchanged on the topic.
//!
//! The set is closed: a dispatcher must carry exactly one handler per [`MessageKind`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inbound chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageReceived {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Emitted when a conversation ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationClosed {
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(rename = "UserMessage")]
    pub user_message: String,
}

/// Signals process termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shutdown {}

/// Type tag for a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    NewMessageReceived,
    ConversationClosed,
    Shutdown,
}

impl MessageKind {
    pub const ALL: [MessageKind; 3] = [
        MessageKind::NewMessageReceived,
        MessageKind::ConversationClosed,
        MessageKind::Shutdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::NewMessageReceived => "NewMessageReceived",
            MessageKind::ConversationClosed => "ConversationClosed",
            MessageKind::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delivered message value. Wire form: `{ "type": "<kind>", "payload": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Message {
    NewMessageReceived(NewMessageReceived),
    ConversationClosed(ConversationClosed),
    Shutdown(Shutdown),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::NewMessageReceived(_) => MessageKind::NewMessageReceived,
            Message::ConversationClosed(_) => MessageKind::ConversationClosed,
            Message::Shutdown(_) => MessageKind::Shutdown,
        }
    }
}

impl From<NewMessageReceived> for Message {
    fn from(m: NewMessageReceived) -> Self {
        Message::NewMessageReceived(m)
    }
}

impl From<ConversationClosed> for Message {
    fn from(m: ConversationClosed) -> Self {
        Message::ConversationClosed(m)
    }
}

impl From<Shutdown> for Message {
    fn from(m: Shutdown) -> Self {
        Message::Shutdown(m)
    }
}
