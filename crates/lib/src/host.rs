//! Agent host: wires one hello agent onto an in-process runtime and runs it until the
//! agent (or the operating system) asks the process to stop.

use crate::agent::HelloAgent;
use crate::config::Config;
use crate::dispatch::RegistrationError;
use crate::lifetime::AppLifetime;
use crate::messages::NewMessageReceived;
use crate::runtime::{InProcessRuntime, PublishError, TopicId};
use crate::sink::ObservationSink;
use crate::stay_alive::StayAliveFlag;
use std::future::Future;
use std::sync::Arc;

pub struct AgentHost {
    runtime: InProcessRuntime,
    lifetime: AppLifetime,
    agent: Arc<HelloAgent>,
    topic: TopicId,
}

impl AgentHost {
    /// Build the agent, check its dispatch table, and subscribe it to the configured topic.
    pub async fn start(
        config: &Config,
        stay_alive: Arc<dyn StayAliveFlag>,
        sink: Arc<dyn ObservationSink>,
    ) -> Result<Self, RegistrationError> {
        let runtime = InProcessRuntime::new(config.runtime.queue_capacity);
        let lifetime = AppLifetime::new();
        let id = config.agent_id();
        let topic = config.topic_id();
        let agent = Arc::new(
            HelloAgent::new(
                id.clone(),
                Arc::new(runtime.publisher_for(id.clone())),
                Arc::new(lifetime.clone()),
                stay_alive,
                sink,
            )
            .with_topic(topic.clone()),
        );
        let dispatcher = Arc::clone(&agent).into_dispatcher()?;
        runtime.subscribe(&topic, Arc::new(dispatcher)).await;
        log::info!(
            "agent {} ({}) subscribed to {}",
            id,
            agent.description(),
            topic
        );
        Ok(Self {
            runtime,
            lifetime,
            agent,
            topic,
        })
    }

    pub fn agent(&self) -> &HelloAgent {
        &self.agent
    }

    pub fn lifetime(&self) -> &AppLifetime {
        &self.lifetime
    }

    pub fn runtime(&self) -> &InProcessRuntime {
        &self.runtime
    }

    /// Publish a `NewMessageReceived` on the agent's topic, starting a conversation.
    pub async fn send(&self, text: impl Into<String>) -> Result<(), PublishError> {
        let msg = NewMessageReceived {
            message: text.into(),
        };
        self.runtime.publish_external(msg.into(), &self.topic).await
    }

    /// Deliver messages until the agent requests a stop or `external` resolves, then drain
    /// in-flight deliveries.
    pub async fn run<F>(&self, external: F)
    where
        F: Future<Output = ()>,
    {
        let lifetime = self.lifetime.clone();
        self.runtime
            .run_until(async move {
                tokio::select! {
                    _ = lifetime.stopped() => {
                        log::info!("host: stop requested by agent");
                    }
                    _ = external => {
                        log::info!("host: external stop");
                    }
                }
            })
            .await;
    }
}

/// Future that completes on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}
