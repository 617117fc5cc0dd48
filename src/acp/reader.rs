//! Inbound frame classification.
//!
//! Each line of agent stdout is parsed as JSON and mapped to the one
//! [`Frame`] variant the protocol state machine cares about. Lines that are
//! not JSON at all yield `None` and are silently discarded — the agent's
//! output may interleave non-protocol diagnostic text, and that is not a
//! protocol error.
//!
//! | Inbound shape                                              | Maps to                  |
//! |------------------------------------------------------------|--------------------------|
//! | `{…, "error": {code, message}}`                            | [`Frame::Error`]          |
//! | `{…, "result": {"sessionId": s}}`                          | [`Frame::SessionCreated`] |
//! | `{…, "result": {"stopReason": r}}`                         | [`Frame::TurnEnded`]      |
//! | `session/update` + `agent_message_chunk` with text content | [`Frame::MessageChunk`]   |
//! | *(any other JSON value)*                                   | [`Frame::Other`]          |

use serde::Deserialize;
use serde_json::Value;

/// One classified inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// JSON-RPC error object. Aborts the conversation during the handshake;
    /// counted and ignored during execution.
    Error {
        /// JSON-RPC error code (`-1` when absent).
        code: i64,
        /// Human-readable error message (`"unknown"` when absent).
        message: String,
    },
    /// `session/new` result carrying the opaque session identifier.
    SessionCreated(String),
    /// Response carrying `result.stopReason`; only `"end_turn"` is treated
    /// as the completion signal.
    TurnEnded(String),
    /// `session/update` notification carrying one `agent_message_chunk`
    /// text fragment (unfiltered).
    MessageChunk(String),
    /// Any other well-formed JSON value; counted as protocol traffic but
    /// otherwise irrelevant.
    Other,
}

/// Loose envelope over every inbound frame shape this client understands.
#[derive(Debug, Deserialize)]
struct Envelope {
    method: Option<String>,
    result: Option<Value>,
    error: Option<RpcError>,
    params: Option<Value>,
}

/// JSON-RPC error payload with lenient defaults.
#[derive(Debug, Deserialize)]
struct RpcError {
    code: Option<i64>,
    message: Option<String>,
}

/// Classify one raw line from the agent's stdout.
///
/// Returns `None` for empty/whitespace lines and for lines that are not
/// valid JSON (silent discard). Every well-formed JSON value yields
/// `Some(_)`, falling back to [`Frame::Other`] when no known shape matches;
/// the execution-phase response count is the number of `Some` results.
#[must_use]
pub fn classify_frame(line: &str) -> Option<Frame> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(trimmed).ok()?;
    let Ok(envelope) = serde_json::from_value::<Envelope>(value) else {
        // Parseable JSON that is not an object still counts as traffic.
        return Some(Frame::Other);
    };

    if let Some(err) = envelope.error {
        return Some(Frame::Error {
            code: err.code.unwrap_or(-1),
            message: err.message.unwrap_or_else(|| "unknown".into()),
        });
    }

    if let Some(result) = &envelope.result {
        if let Some(session_id) = result.get("sessionId").and_then(Value::as_str) {
            return Some(Frame::SessionCreated(session_id.to_owned()));
        }
        if let Some(stop_reason) = result.get("stopReason").and_then(Value::as_str) {
            return Some(Frame::TurnEnded(stop_reason.to_owned()));
        }
    }

    if envelope.method.as_deref() == Some("session/update") {
        if let Some(text) = chunk_text(envelope.params.as_ref()) {
            return Some(Frame::MessageChunk(text));
        }
    }

    Some(Frame::Other)
}

/// Extract the text of an `agent_message_chunk` update, if that is what the
/// notification params carry.
fn chunk_text(params: Option<&Value>) -> Option<String> {
    let update = params?.get("update")?;

    if update.get("sessionUpdate").and_then(Value::as_str) != Some("agent_message_chunk") {
        return None;
    }

    let content = update.get("content")?;
    if content.get("type").and_then(Value::as_str) != Some("text") {
        return None;
    }

    content
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
