//! Runtime seams: identities, delivery context, publishing, and an in-process runtime.
//!
//! The agent only talks to [`Publisher`]; the host owns whichever runtime delivers
//! messages and awaits each [`crate::dispatch::Dispatcher`] call.

mod context;
mod in_process;
mod publisher;

pub use context::{AgentId, MessageContext, TopicId, DEFAULT_KEY, HELLO_TOPIC};
pub use in_process::{InProcessRuntime, RuntimePublisher};
pub use publisher::{PublishError, Publisher};
