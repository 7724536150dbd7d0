//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.hello-agent/config.json`) and environment.
//! Every field has a default, so a missing file runs the agent as-is.

use crate::runtime::{AgentId, TopicId, HELLO_TOPIC};
use crate::stay_alive::{EnvStayAlive, StayAliveFlag};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Identity of the hosted agent.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Topic type the agent subscribes and publishes to (default "HelloTopic").
    #[serde(default = "default_topic")]
    pub topic: String,

    /// In-process runtime settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Fixed stay-alive value. When absent, STAY_ALIVE_ON_GOODBYE is read on every closed conversation.
    #[serde(default)]
    pub stay_alive_on_goodbye: Option<bool>,
}

/// Agent type and instance key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Agent type; also the `UserId` stamped on goodbyes (default "HelloAgent").
    #[serde(default = "default_agent_type")]
    pub agent_type: String,

    /// Instance key (default "default").
    #[serde(default = "default_agent_key")]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Capacity of the publish queue (default 64).
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_topic() -> String {
    HELLO_TOPIC.to_string()
}

fn default_agent_type() -> String {
    "HelloAgent".to_string()
}

fn default_agent_key() -> String {
    crate::runtime::DEFAULT_KEY.to_string()
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            topic: default_topic(),
            runtime: RuntimeConfig::default(),
            stay_alive_on_goodbye: None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_type: default_agent_type(),
            key: default_agent_key(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Config {
    pub fn agent_id(&self) -> AgentId {
        AgentId::new(self.agent.agent_type.trim(), self.agent.key.trim())
    }

    pub fn topic_id(&self) -> TopicId {
        let t = self.topic.trim();
        if t.is_empty() {
            TopicId::hello()
        } else {
            TopicId::new(t)
        }
    }
}

/// Stay-alive source: a configured value is fixed; otherwise the environment is consulted per message.
pub fn resolve_stay_alive(config: &Config) -> Arc<dyn StayAliveFlag> {
    match config.stay_alive_on_goodbye {
        Some(v) => Arc::new(v),
        None => Arc::new(EnvStayAlive),
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("HELLO_AGENT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".hello-agent").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, HELLO_AGENT_CONFIG_PATH, or the default. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.agent_id(), AgentId::new("HelloAgent", "default"));
        assert_eq!(c.topic_id(), TopicId::hello());
        assert_eq!(c.runtime.queue_capacity, 64);
        assert!(c.stay_alive_on_goodbye.is_none());
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let c: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(c.topic, "HelloTopic");
        assert_eq!(c.agent.agent_type, "HelloAgent");
    }

    #[test]
    fn camel_case_fields() {
        let c: Config = serde_json::from_str(
            r#"{"agent":{"agentType":"Greeter"},"topic":"Lobby","stayAliveOnGoodbye":true,"runtime":{"queueCapacity":8}}"#,
        )
        .unwrap();
        assert_eq!(c.agent_id(), AgentId::new("Greeter", "default"));
        assert_eq!(c.topic_id(), TopicId::new("Lobby"));
        assert_eq!(c.runtime.queue_capacity, 8);
        assert!(resolve_stay_alive(&c).stay_alive());
    }

    #[test]
    fn blank_topic_falls_back_to_hello() {
        let mut c = Config::default();
        c.topic = "  ".to_string();
        assert_eq!(c.topic_id(), TopicId::hello());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = std::env::temp_dir()
            .join(format!("hello-agent-missing-{}", uuid::Uuid::new_v4()))
            .join("config.json");
        let (c, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(c.topic, "HelloTopic");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = std::env::temp_dir().join(format!("hello-agent-bad-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config from"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
