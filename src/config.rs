//! Client configuration parsing and validation.
//!
//! All fields have defaults matching the stock `opencode acp` agent, so the
//! binary runs without a config file. A TOML file can override the agent
//! command line and the conversation time budgets.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{ClientError, Result};

fn default_agent_cmd() -> String {
    "opencode".into()
}

fn default_agent_args() -> Vec<String> {
    vec!["acp".into()]
}

fn default_handshake_budget_ms() -> u64 {
    3000
}

fn default_shutdown_grace_ms() -> u64 {
    2000
}

/// Client configuration parsed from TOML (or built from defaults).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClientConfig {
    /// Agent executable launched for each conversation.
    #[serde(default = "default_agent_cmd")]
    pub agent_cmd: String,
    /// Arguments passed to the agent executable.
    #[serde(default = "default_agent_args")]
    pub agent_args: Vec<String>,
    /// Wall-clock budget for each handshake phase (initialize drain and
    /// session creation), in milliseconds.
    #[serde(default = "default_handshake_budget_ms")]
    pub handshake_budget_ms: u64,
    /// Grace period between requesting graceful termination and forcing a
    /// kill during shutdown, in milliseconds.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            agent_cmd: default_agent_cmd(),
            agent_args: default_agent_args(),
            handshake_budget_ms: default_handshake_budget_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ClientConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the file cannot be read, contains
    /// invalid TOML, or fails validation.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| ClientError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Wall-clock budget for one handshake phase.
    #[must_use]
    pub fn handshake_budget(&self) -> Duration {
        Duration::from_millis(self.handshake_budget_ms)
    }

    /// Grace period before a forced kill during shutdown.
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.agent_cmd.trim().is_empty() {
            return Err(ClientError::Config("agent_cmd must not be empty".into()));
        }

        if self.handshake_budget_ms == 0 {
            return Err(ClientError::Config(
                "handshake_budget_ms must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
