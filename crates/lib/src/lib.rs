//! Hello agent library: a single actor on a pub/sub topic that answers a new message with a
//! goodbye and stops the hosting process once the conversation closes.
//!
//! The actor depends only on collaborator seams ([`runtime::Publisher`],
//! [`lifetime::LifetimeController`], [`sink::ObservationSink`], [`stay_alive::StayAliveFlag`]);
//! [`runtime::InProcessRuntime`] and [`host::AgentHost`] provide the in-process wiring.

pub mod agent;
pub mod config;
pub mod dispatch;
pub mod host;
pub mod lifetime;
pub mod messages;
pub mod runtime;
pub mod sink;
pub mod stay_alive;
