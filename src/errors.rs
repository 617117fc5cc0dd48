//! Error types shared across the client.

use std::fmt::{Display, Formatter};

/// Shared client result type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error enumeration covering all conversation failure modes.
///
/// The variants form a closed taxonomy: callers match on the variant to
/// distinguish "agent is slow" ([`ClientError::Timeout`]) from "agent or
/// protocol is broken" ([`ClientError::Protocol`]). None of these failures
/// is retried; a single conversation attempt either completes or fails.
#[derive(Debug)]
pub enum ClientError {
    /// Agent executable missing or OS-level spawn failure.
    Launch(String),
    /// Write to a closed or broken stdin pipe, or a read-side I/O failure.
    Transport(String),
    /// Explicit `error` object during the handshake, or a handshake
    /// acceptance condition not met within its time budget.
    Protocol(String),
    /// Overall execution deadline exceeded without a completion signal.
    /// Carries the configured timeout in seconds.
    Timeout(u64),
    /// Configuration parsing or validation failure.
    Config(String),
    /// File-system or other local I/O failure outside the agent pipes.
    Io(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Launch(msg) => write!(f, "launch: {msg}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Protocol(msg) => write!(f, "protocol: {msg}"),
            Self::Timeout(secs) => {
                write!(f, "timeout: task did not complete within {secs}s")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
