//! Hello agent: answers a new message with a goodbye, and stops the process once the
//! conversation closes unless the stay-alive flag is set.
//!
//! Conversation as seen on the topic:
//! `NewMessageReceived` -> `ConversationClosed` -> (`Shutdown` -> stop) or idle again.

use crate::dispatch::{Dispatcher, Handler, HandlerError, RegistrationError};
use crate::lifetime::LifetimeController;
use crate::messages::{ConversationClosed, Message, MessageKind, NewMessageReceived, Shutdown};
use crate::runtime::{AgentId, MessageContext, Publisher, TopicId};
use crate::sink::ObservationSink;
use crate::stay_alive::StayAliveFlag;
use async_trait::async_trait;
use std::sync::Arc;

pub const AGENT_DESCRIPTION: &str = "Hello Agent";
pub const GOODBYE: &str = "Goodbye";
pub const SHUTTING_DOWN: &str = "Shutting down...";

/// The actor. Holds only collaborators; nothing changes between messages.
pub struct HelloAgent {
    id: AgentId,
    topic: TopicId,
    publisher: Arc<dyn Publisher>,
    lifetime: Arc<dyn LifetimeController>,
    stay_alive: Arc<dyn StayAliveFlag>,
    sink: Arc<dyn ObservationSink>,
}

impl HelloAgent {
    pub fn new(
        id: AgentId,
        publisher: Arc<dyn Publisher>,
        lifetime: Arc<dyn LifetimeController>,
        stay_alive: Arc<dyn StayAliveFlag>,
        sink: Arc<dyn ObservationSink>,
    ) -> Self {
        Self {
            id,
            topic: TopicId::hello(),
            publisher,
            lifetime,
            stay_alive,
            sink,
        }
    }

    /// Publish to a topic other than `HelloTopic`.
    pub fn with_topic(mut self, topic: TopicId) -> Self {
        self.topic = topic;
        self
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn description(&self) -> &'static str {
        AGENT_DESCRIPTION
    }

    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    pub async fn on_new_message(
        &self,
        msg: NewMessageReceived,
        _ctx: &MessageContext,
    ) -> Result<(), HandlerError> {
        self.sink.emit(&msg.message);
        let goodbye = ConversationClosed {
            user_id: self.id.agent_type.clone(),
            user_message: GOODBYE.to_string(),
        };
        self.publisher.publish(goodbye.into(), &self.topic).await?;
        Ok(())
    }

    pub async fn on_conversation_closed(
        &self,
        msg: ConversationClosed,
        _ctx: &MessageContext,
    ) -> Result<(), HandlerError> {
        self.sink.emit(&format!("{} said {}", msg.user_id, msg.user_message));
        if self.stay_alive.stay_alive() {
            log::debug!("{}: staying alive after goodbye", self.id);
            return Ok(());
        }
        self.publisher.publish(Shutdown {}.into(), &self.topic).await?;
        Ok(())
    }

    pub async fn on_shutdown(
        &self,
        _msg: Shutdown,
        _ctx: &MessageContext,
    ) -> Result<(), HandlerError> {
        self.sink.emit(SHUTTING_DOWN);
        self.lifetime.request_stop();
        Ok(())
    }

    /// Dispatch table with one handler per message kind.
    pub fn into_dispatcher(self: Arc<Self>) -> Result<Dispatcher, RegistrationError> {
        let handler: Arc<dyn Handler> = Arc::new(AgentHandler(self));
        MessageKind::ALL
            .iter()
            .fold(Dispatcher::builder(), |builder, kind| {
                builder.register(*kind, Arc::clone(&handler))
            })
            .build()
    }
}

/// Routes each variant to its `on_*` method; the match is exhaustive, so a kind
/// registered under this handler can never go unhandled.
struct AgentHandler(Arc<HelloAgent>);

#[async_trait]
impl Handler for AgentHandler {
    async fn handle(&self, message: Message, ctx: MessageContext) -> Result<(), HandlerError> {
        match message {
            Message::NewMessageReceived(m) => self.0.on_new_message(m, &ctx).await,
            Message::ConversationClosed(m) => self.0.on_conversation_closed(m, &ctx).await,
            Message::Shutdown(m) => self.0.on_shutdown(m, &ctx).await,
        }
    }
}
