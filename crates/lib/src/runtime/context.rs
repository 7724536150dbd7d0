//! Agent and topic identities plus per-delivery metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known topic the hello agent publishes to.
pub const HELLO_TOPIC: &str = "HelloTopic";

/// Key used when an agent or topic is not scoped further.
pub const DEFAULT_KEY: &str = "default";

/// Runtime-assigned identity of an agent: its type plus an instance key.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentId {
    pub agent_type: String,
    pub key: String,
}

impl AgentId {
    pub fn new(agent_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            key: key.into(),
        }
    }

    /// Identity with the default instance key.
    pub fn of_type(agent_type: impl Into<String>) -> Self {
        Self::new(agent_type, DEFAULT_KEY)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.agent_type, self.key)
    }
}

/// Named pub/sub channel. Subscriptions match on `topic_type`.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicId {
    pub topic_type: String,
    pub source: String,
}

impl TopicId {
    pub fn new(topic_type: impl Into<String>) -> Self {
        Self {
            topic_type: topic_type.into(),
            source: DEFAULT_KEY.to_string(),
        }
    }

    pub fn hello() -> Self {
        Self::new(HELLO_TOPIC)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.topic_type, self.source)
    }
}

/// Delivery metadata handed to a handler alongside the message. Handlers treat it as opaque.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub sender: Option<AgentId>,
    pub topic_id: Option<TopicId>,
    pub message_id: String,
}

impl MessageContext {
    pub fn new(sender: Option<AgentId>, topic_id: Option<TopicId>) -> Self {
        Self {
            sender,
            topic_id,
            message_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Context for a direct, runtime-less invocation (tests, embedding hosts).
    pub fn direct() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_topic_uses_default_source() {
        let t = TopicId::hello();
        assert_eq!(t.topic_type, "HelloTopic");
        assert_eq!(t.to_string(), "HelloTopic/default");
    }

    #[test]
    fn contexts_get_distinct_message_ids() {
        let a = MessageContext::direct();
        let b = MessageContext::direct();
        assert_ne!(a.message_id, b.message_id);
        assert!(a.sender.is_none());
    }

    #[test]
    fn agent_id_display() {
        assert_eq!(
            AgentId::of_type("HelloAgent").to_string(),
            "HelloAgent/default"
        );
    }
}
