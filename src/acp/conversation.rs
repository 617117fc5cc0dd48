//! Three-phase ACP conversation driver.
//!
//! One call to [`execute`] owns one agent subprocess and one session:
//!
//! 1. **Initialize** — send `initialize` (id 1), then drain responses for
//!    the handshake budget, discarding content but aborting on an explicit
//!    error object.
//! 2. **Session creation** — send `session/new` (id 2), then read until a
//!    `result.sessionId` arrives within the handshake budget.
//! 3. **Execution** — send `session/prompt` (id 3) carrying the task text
//!    plus the concision directive, then accumulate filtered
//!    `agent_message_chunk` text until a response with
//!    `result.stopReason == "end_turn"` or the overall deadline.
//!
//! The agent process is torn down via [`spawner::shutdown`] on every exit
//! path — success, protocol failure, transport failure, or timeout.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::acp::filter::OutputAccumulator;
use crate::acp::reader::{classify_frame, Frame};
use crate::acp::spawner::{self, AgentProcess, FrameStream};
use crate::acp::writer::send_request;
use crate::config::ClientConfig;
use crate::{ClientError, Result};

/// Request id for the `initialize` request.
const INITIALIZE_ID: u64 = 1;
/// Request id for the `session/new` request.
const SESSION_NEW_ID: u64 = 2;
/// Request id for the `session/prompt` request.
const SESSION_PROMPT_ID: u64 = 3;

/// Steering directive appended to every task. Part of the wire payload the
/// agent receives, not a local-only hint.
const CONCISION_DIRECTIVE: &str = "IMPORTANT: Keep output concise with summary-first approach. \
     Show key results only, no detailed breakdowns or verbose reasoning.";

/// Result of one completed conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    /// Accumulated visible text, concatenated in receipt order.
    pub text: String,
    /// Number of JSON-parseable inbound lines seen during the execution
    /// phase (all protocol traffic, not only message chunks).
    pub response_count: u64,
}

/// Drive one full conversation against a freshly spawned agent.
///
/// # Errors
///
/// - [`ClientError::Launch`] — the agent executable is missing or failed to
///   start.
/// - [`ClientError::Transport`] — a stdin write failed, or the agent closed
///   or broke its output stream mid-conversation.
/// - [`ClientError::Protocol`] — an explicit error object arrived during the
///   handshake, or no `sessionId` arrived within the handshake budget.
/// - [`ClientError::Timeout`] — `timeout` elapsed without a completion
///   signal; the message names the configured value.
pub async fn execute(
    config: &ClientConfig,
    cwd: &Path,
    task: &str,
    timeout: Duration,
) -> Result<TaskOutput> {
    let mut agent = spawner::spawn_agent(config, cwd)?;

    // Teardown must run whether `drive` succeeded or failed, so the outcome
    // is held across the shutdown rather than propagated with `?`.
    let outcome = drive(config, &mut agent, cwd, task, timeout).await;
    spawner::shutdown(agent, config.shutdown_grace()).await;

    outcome
}

/// Run the three protocol phases against a live agent process.
async fn drive(
    config: &ClientConfig,
    agent: &mut AgentProcess,
    cwd: &Path,
    task: &str,
    timeout: Duration,
) -> Result<TaskOutput> {
    send_request(
        &mut agent.stdin,
        INITIALIZE_ID,
        "initialize",
        &json!({
            "protocolVersion": 1,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        }),
    )
    .await?;

    drain_initialize(&mut agent.frames, config.handshake_budget()).await?;

    send_request(
        &mut agent.stdin,
        SESSION_NEW_ID,
        "session/new",
        &json!({
            "cwd": cwd.to_string_lossy(),
            "mcpServers": [],
        }),
    )
    .await?;

    let session_id = await_session(&mut agent.frames, config.handshake_budget()).await?;
    info!(%session_id, "session created");

    send_request(
        &mut agent.stdin,
        SESSION_PROMPT_ID,
        "session/prompt",
        &json!({
            "sessionId": session_id,
            "prompt": [{"type": "text", "text": format!("{task}\n\n{CONCISION_DIRECTIVE}")}],
        }),
    )
    .await?;

    collect_response(&mut agent.frames, timeout).await
}

/// One step of deadline-bounded reading.
enum Step {
    /// A complete raw line arrived before the deadline.
    Line(String),
    /// The agent closed its stdout.
    Eof,
    /// The deadline elapsed with no complete line.
    Deadline,
}

/// Read the next line from `frames`, bounded by `deadline`.
///
/// Oversized frames are skipped and reading continues; read-side I/O
/// failures surface as [`ClientError::Transport`] (distinct from a deadline
/// expiry, which the caller maps to its phase-specific outcome).
async fn next_line(frames: &mut FrameStream, deadline: Instant) -> Result<Step> {
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(Step::Deadline);
        }

        match tokio::time::timeout(remaining, frames.next()).await {
            Err(_elapsed) => return Ok(Step::Deadline),
            Ok(None) => return Ok(Step::Eof),
            Ok(Some(Ok(line))) => {
                debug!(dir = "<<<", frame = %line, "inbound frame");
                return Ok(Step::Line(line));
            }
            Ok(Some(Err(ClientError::Protocol(msg)))) => {
                warn!(%msg, "skipping oversized inbound frame");
            }
            // FramedRead maps stream I/O failures through From<io::Error>;
            // on the agent pipes they are transport failures.
            Ok(Some(Err(ClientError::Io(msg)))) => {
                return Err(ClientError::Transport(format!("read failed: {msg}")));
            }
            Ok(Some(Err(err))) => return Err(err),
        }
    }
}

/// Phase 1 drain: read for the whole budget, discarding everything except an
/// explicit error object. EOF ends the drain early; the next outbound send
/// will surface the broken transport if the agent is really gone.
async fn drain_initialize(frames: &mut FrameStream, budget: Duration) -> Result<()> {
    let deadline = Instant::now() + budget;

    loop {
        match next_line(frames, deadline).await? {
            Step::Deadline | Step::Eof => return Ok(()),
            Step::Line(line) => {
                if let Some(Frame::Error { code, message }) = classify_frame(&line) {
                    return Err(protocol_error(code, &message));
                }
            }
        }
    }
}

/// Phase 2 wait: read until a `result.sessionId` arrives, the budget
/// expires, or an error object aborts the handshake.
async fn await_session(frames: &mut FrameStream, budget: Duration) -> Result<String> {
    let deadline = Instant::now() + budget;

    loop {
        match next_line(frames, deadline).await? {
            Step::Deadline => {
                return Err(ClientError::Protocol(
                    "failed to create session: no sessionId within the handshake budget".into(),
                ));
            }
            Step::Eof => {
                return Err(ClientError::Protocol(
                    "failed to create session: agent closed its output stream".into(),
                ));
            }
            Step::Line(line) => match classify_frame(&line) {
                Some(Frame::SessionCreated(session_id)) => return Ok(session_id),
                Some(Frame::Error { code, message }) => {
                    return Err(protocol_error(code, &message));
                }
                _ => {}
            },
        }
    }
}

/// Phase 3 main loop: count every parseable inbound line, accumulate
/// filtered message-chunk text, and finish on `stopReason == "end_turn"`.
///
/// Error objects inside this phase are not specially interpreted — only the
/// completion signal or the deadline ends the loop. Stream EOF or a read
/// failure before either is a transport failure, not a timeout.
async fn collect_response(frames: &mut FrameStream, timeout: Duration) -> Result<TaskOutput> {
    let deadline = Instant::now() + timeout;
    let mut output = OutputAccumulator::new();
    let mut response_count: u64 = 0;

    loop {
        match next_line(frames, deadline).await? {
            Step::Deadline => return Err(ClientError::Timeout(timeout.as_secs())),
            Step::Eof => {
                return Err(ClientError::Transport(
                    "agent closed its output stream before signaling end of turn".into(),
                ));
            }
            Step::Line(line) => {
                let Some(frame) = classify_frame(&line) else {
                    // Non-JSON diagnostic noise; not protocol traffic.
                    continue;
                };
                response_count += 1;

                match frame {
                    Frame::MessageChunk(text) => output.push(&text),
                    Frame::TurnEnded(reason) if reason == "end_turn" => {
                        info!(response_count, fragments = output.len(), "turn completed");
                        return Ok(TaskOutput {
                            text: output.into_text(),
                            response_count,
                        });
                    }
                    Frame::TurnEnded(reason) => {
                        debug!(%reason, "ignoring non-terminal stop reason");
                    }
                    Frame::Error { code, message } => {
                        warn!(code, %message, "ignoring error frame during execution");
                    }
                    Frame::SessionCreated(_) | Frame::Other => {}
                }
            }
        }
    }
}

fn protocol_error(code: i64, message: &str) -> ClientError {
    ClientError::Protocol(format!("protocol error [{code}]: {message}"))
}
