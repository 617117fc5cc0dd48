#![forbid(unsafe_code)]

//! `acp-courier` — stdio client for the Agent Client Protocol.
//!
//! Delegates one task to a headless agent subprocess over line-delimited
//! JSON-RPC and returns the agent's accumulated textual reply.

pub mod acp;
pub mod config;
pub mod errors;

pub use config::ClientConfig;
pub use errors::{ClientError, Result};
