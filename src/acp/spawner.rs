//! Agent process lifecycle.
//!
//! Spawns the agent subprocess for one conversation with:
//! - piped stdin/stdout/stderr owned exclusively by the conversation,
//! - `kill_on_drop(true)` as a backstop so an unwound call never leaks the
//!   child,
//! - an explicit [`shutdown`] sequence (close stdin, graceful termination,
//!   bounded wait, forced kill) invoked on every exit path.
//!
//! There is no ambient process handle: the [`AgentProcess`] lives inside a
//! single `execute` call and is consumed by [`shutdown`].

use std::path::Path;
use std::time::Duration;

use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

use crate::acp::codec::FrameCodec;
use crate::config::ClientConfig;
use crate::{ClientError, Result};

/// Framed line reader over an agent's stdout.
pub type FrameStream = FramedRead<ChildStdout, FrameCodec>;

/// Live stdio connection to a spawned agent process.
///
/// Owns the child handle and both pipe ends for the duration of one
/// conversation. Dropping it kills the child via `kill_on_drop`, but callers
/// should prefer the orderly [`shutdown`].
#[derive(Debug)]
pub struct AgentProcess {
    /// Child process handle, kept alive so `kill_on_drop` works.
    pub child: Child,
    /// Agent's stdin for outbound JSON-RPC frames.
    pub stdin: ChildStdin,
    /// Framed line reader over the agent's stdout.
    pub frames: FrameStream,
}

/// Spawn the configured agent executable in `cwd` with piped stdio.
///
/// # Errors
///
/// - [`ClientError::Launch`]`("agent command not found: …")` — the
///   executable does not exist on `PATH`.
/// - [`ClientError::Launch`]`("failed to start agent: …")` — any other OS
///   spawn failure.
/// - [`ClientError::Launch`]`("failed to capture agent …")` — a stdio pipe
///   was not handed back by the OS.
pub fn spawn_agent(config: &ClientConfig, cwd: &Path) -> Result<AgentProcess> {
    let mut cmd = Command::new(&config.agent_cmd);
    cmd.args(&config.agent_args)
        .current_dir(cwd)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ClientError::Launch(format!("agent command not found: {}", config.agent_cmd))
        } else {
            ClientError::Launch(format!("failed to start agent: {err}"))
        }
    })?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| ClientError::Launch("failed to capture agent stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ClientError::Launch("failed to capture agent stdout".into()))?;

    debug!(
        agent_cmd = %config.agent_cmd,
        cwd = %cwd.display(),
        "agent process spawned"
    );

    Ok(AgentProcess {
        child,
        stdin,
        frames: FramedRead::new(stdout, FrameCodec::new()),
    })
}

/// Tear down the agent process: close stdin, request graceful termination,
/// wait up to `grace`, then force-kill if still alive.
///
/// Idempotent from the caller's perspective (consumes the handle) and
/// infallible: every failure mode ends with the child reaped or killed, so
/// no zombie or orphan survives regardless of how the conversation ended.
pub async fn shutdown(agent: AgentProcess, grace: Duration) {
    let AgentProcess {
        mut child,
        stdin,
        frames,
    } = agent;

    // Closing stdin first signals "no more input" to a well-behaved agent.
    drop(stdin);
    drop(frames);

    request_termination(&mut child);

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => {
            debug!(?status, "agent process exited within grace period");
        }
        Ok(Err(err)) => {
            warn!(%err, "error waiting for agent process, forcing kill");
            child.kill().await.ok();
        }
        Err(_elapsed) => {
            warn!(?grace, "agent did not exit within grace period, killing");
            child.kill().await.ok();
        }
    }
}

/// Ask the child to terminate gracefully: SIGTERM on unix, immediate kill
/// signal elsewhere (Windows has no graceful equivalent for console apps).
#[cfg(unix)]
fn request_termination(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        // Already reaped; nothing to signal.
        return;
    };

    if let Err(err) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
        debug!(%err, pid, "SIGTERM delivery failed (process likely gone)");
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        debug!(%err, "kill request failed (process likely gone)");
    }
}
