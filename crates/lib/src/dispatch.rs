//! Message dispatcher: one handler per message kind, checked when the table is built.

use crate::messages::{Message, MessageKind};
use crate::runtime::{MessageContext, PublishError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Failure of a single handler invocation. Surfaces to the runtime unmodified.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Configuration defect found while building a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("no handler registered for {0}")]
    Missing(MessageKind),
    #[error("handler already registered for {0}")]
    Duplicate(MessageKind),
}

/// Handler bound to one message kind.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: Message, ctx: MessageContext) -> Result<(), HandlerError>;
}

/// Collects handlers before the exhaustiveness check in [`DispatcherBuilder::build`].
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<MessageKind, Arc<dyn Handler>>,
    duplicate: Option<MessageKind>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, kind: MessageKind, handler: Arc<dyn Handler>) -> Self {
        if self.handlers.insert(kind, handler).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(kind);
        }
        self
    }

    /// Fails unless every kind in [`MessageKind::ALL`] has exactly one handler.
    pub fn build(self) -> Result<Dispatcher, RegistrationError> {
        if let Some(kind) = self.duplicate {
            return Err(RegistrationError::Duplicate(kind));
        }
        if let Some(kind) = MessageKind::ALL
            .iter()
            .find(|k| !self.handlers.contains_key(*k))
        {
            return Err(RegistrationError::Missing(*kind));
        }
        Ok(Dispatcher {
            handlers: self.handlers,
        })
    }
}

/// Routes a message to the handler registered for its kind.
pub struct Dispatcher {
    handlers: HashMap<MessageKind, Arc<dyn Handler>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Awaits the handler to completion. Concurrent calls are neither serialized nor reordered.
    pub async fn dispatch(
        &self,
        message: Message,
        ctx: MessageContext,
    ) -> Result<(), HandlerError> {
        let kind = message.kind();
        let handler = match self.handlers.get(&kind) {
            Some(h) => Arc::clone(h),
            // build() guarantees every kind is present
            None => unreachable!("dispatcher missing handler for {}", kind),
        };
        log::debug!("dispatch: {} (message id {})", kind, ctx.message_id);
        handler.handle(message, ctx).await
    }
}
