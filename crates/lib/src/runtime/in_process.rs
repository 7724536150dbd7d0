//! In-process runtime: a bounded queue of published messages and a delivery loop that
//! hands each one to the dispatchers subscribed to its topic type.

use crate::dispatch::Dispatcher;
use crate::messages::Message;
use crate::runtime::{AgentId, MessageContext, PublishError, Publisher, TopicId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinSet;

/// A message waiting for delivery.
#[derive(Debug)]
struct Envelope {
    message: Message,
    topic: TopicId,
    sender: Option<AgentId>,
}

type Subscriptions = Arc<RwLock<HashMap<String, Vec<Arc<Dispatcher>>>>>;

pub struct InProcessRuntime {
    subscriptions: Subscriptions,
    /// None once the runtime has stopped; later publishes fail.
    tx: Arc<std::sync::RwLock<Option<mpsc::Sender<Envelope>>>>,
    rx: Mutex<mpsc::Receiver<Envelope>>,
}

impl InProcessRuntime {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            tx: Arc::new(std::sync::RwLock::new(Some(tx))),
            rx: Mutex::new(rx),
        }
    }

    /// Deliver every message published to `topic`'s type to `dispatcher`.
    pub async fn subscribe(&self, topic: &TopicId, dispatcher: Arc<Dispatcher>) {
        let mut g = self.subscriptions.write().await;
        g.entry(topic.topic_type.clone())
            .or_default()
            .push(dispatcher);
        log::debug!("runtime: subscribed dispatcher to {}", topic.topic_type);
    }

    /// Publisher that stamps `agent` as the sender of everything it publishes.
    pub fn publisher_for(&self, agent: AgentId) -> RuntimePublisher {
        RuntimePublisher {
            sender: Some(agent),
            tx: Arc::clone(&self.tx),
        }
    }

    /// Publish from the host (no sending agent).
    pub async fn publish_external(
        &self,
        message: Message,
        topic: &TopicId,
    ) -> Result<(), PublishError> {
        RuntimePublisher {
            sender: None,
            tx: Arc::clone(&self.tx),
        }
        .publish(message, topic)
        .await
    }

    /// Deliver until `stop` resolves, then close the queue and wait for in-flight deliveries.
    /// Messages still queued at that point are dropped.
    pub async fn run_until<F>(&self, stop: F)
    where
        F: Future<Output = ()>,
    {
        let mut rx = self.rx.lock().await;
        let mut in_flight = JoinSet::new();
        tokio::pin!(stop);

        loop {
            tokio::select! {
                biased;

                _ = &mut stop => break,
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }
                envelope = rx.recv() => match envelope {
                    Some(envelope) => {
                        self.deliver(envelope, &mut in_flight).await;
                    }
                    None => break,
                },
            }
        }

        self.close();
        rx.close();
        let mut dropped = 0usize;
        while rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            log::debug!("runtime: dropped {} undelivered message(s) on stop", dropped);
        }
        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        log::info!("runtime: stopped");
    }

    /// Deliver until nothing is queued and nothing is in flight. Returns the number of deliveries.
    pub async fn run_until_idle(&self) -> usize {
        let mut rx = self.rx.lock().await;
        let mut in_flight = JoinSet::new();
        let mut delivered = 0usize;

        loop {
            if in_flight.is_empty() {
                match rx.try_recv() {
                    Ok(envelope) => delivered += self.deliver(envelope, &mut in_flight).await,
                    Err(_) => break,
                }
                continue;
            }
            // keep draining while handlers run so a full queue cannot stall their publishes
            tokio::select! {
                Some(joined) = in_flight.join_next() => log_join(joined),
                Some(envelope) = rx.recv() => {
                    delivered += self.deliver(envelope, &mut in_flight).await;
                }
            }
        }
        delivered
    }

    /// Stop accepting new messages.
    pub fn close(&self) {
        match self.tx.write() {
            Ok(mut g) => *g = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    async fn deliver(&self, envelope: Envelope, in_flight: &mut JoinSet<()>) -> usize {
        let subscribers = self
            .subscriptions
            .read()
            .await
            .get(&envelope.topic.topic_type)
            .cloned()
            .unwrap_or_default();
        if subscribers.is_empty() {
            log::debug!(
                "runtime: no subscribers for {}, dropping {}",
                envelope.topic,
                envelope.message.kind()
            );
            return 0;
        }
        let count = subscribers.len();
        for dispatcher in subscribers {
            let message = envelope.message.clone();
            let ctx = MessageContext::new(envelope.sender.clone(), Some(envelope.topic.clone()));
            in_flight.spawn(async move {
                let kind = message.kind();
                if let Err(e) = dispatcher.dispatch(message, ctx).await {
                    log::warn!("runtime: handler for {} failed: {}", kind, e);
                }
            });
        }
        count
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        log::warn!("runtime: delivery task ended abnormally: {}", e);
    }
}

/// [`Publisher`] backed by an [`InProcessRuntime`] queue.
#[derive(Clone)]
pub struct RuntimePublisher {
    sender: Option<AgentId>,
    tx: Arc<std::sync::RwLock<Option<mpsc::Sender<Envelope>>>>,
}

impl RuntimePublisher {
    fn current_tx(&self) -> Option<mpsc::Sender<Envelope>> {
        match self.tx.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Publisher for RuntimePublisher {
    async fn publish(&self, message: Message, topic: &TopicId) -> Result<(), PublishError> {
        let tx = self
            .current_tx()
            .ok_or_else(|| PublishError::RuntimeStopped(topic.clone()))?;
        let envelope = Envelope {
            message,
            topic: topic.clone(),
            sender: self.sender.clone(),
        };
        tx.send(envelope)
            .await
            .map_err(|_| PublishError::RuntimeStopped(topic.clone()))
    }
}
