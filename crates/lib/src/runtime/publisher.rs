//! Publish contract: hand a message to the runtime for delivery on a topic.

use crate::messages::Message;
use crate::runtime::TopicId;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("runtime stopped; cannot publish to {0}")]
    RuntimeStopped(TopicId),
    #[error("publish rejected: {0}")]
    Rejected(String),
}

/// Publishes messages on behalf of one agent.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Completes once the runtime has accepted the message, not when it is handled.
    async fn publish(&self, message: Message, topic: &TopicId) -> Result<(), PublishError>;
}

#[async_trait]
impl<T: Publisher + ?Sized> Publisher for Arc<T> {
    async fn publish(&self, message: Message, topic: &TopicId) -> Result<(), PublishError> {
        (**self).publish(message, topic).await
    }
}
