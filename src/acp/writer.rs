//! Outbound JSON-RPC frame encoding and delivery.
//!
//! Each request is serialised as one compact JSON object, terminated by a
//! single `\n`, written to the agent's stdin, and flushed immediately so the
//! agent sees it without buffering delay. A failed write is a terminal
//! condition for the conversation; nothing is retried.

use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio::process::ChildStdin;
use tracing::debug;

use crate::{ClientError, Result};

/// Encode a JSON-RPC request as a compact single-line JSON string (without
/// the trailing newline).
#[must_use]
pub fn encode_request(id: u64, method: &str, params: &Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
    .to_string()
}

/// Serialise a request, write it as one newline-terminated frame, and flush.
///
/// The `id` must be unique within the conversation; the caller assigns small
/// sequential integers per protocol phase.
///
/// # Errors
///
/// Returns [`ClientError::Transport`]`("failed to send …: <cause>")` if the
/// pipe is broken or the OS write fails.
pub async fn send_request(
    stdin: &mut ChildStdin,
    id: u64,
    method: &str,
    params: &Value,
) -> Result<()> {
    let frame = encode_request(id, method, params);
    debug!(dir = ">>>", %frame, "outbound frame");

    let mut bytes = frame.into_bytes();
    bytes.push(b'\n');

    stdin
        .write_all(&bytes)
        .await
        .map_err(|err| ClientError::Transport(format!("failed to send {method}: {err}")))?;
    stdin
        .flush()
        .await
        .map_err(|err| ClientError::Transport(format!("failed to send {method}: {err}")))?;

    Ok(())
}
