//! Unit tests for the error taxonomy.

use acp_courier::ClientError;

/// Each variant formats with its category prefix.
#[test]
fn display_carries_category_prefix() {
    assert_eq!(
        ClientError::Launch("agent command not found: opencode".into()).to_string(),
        "launch: agent command not found: opencode"
    );
    assert_eq!(
        ClientError::Transport("failed to send initialize: broken pipe".into()).to_string(),
        "transport: failed to send initialize: broken pipe"
    );
    assert_eq!(
        ClientError::Protocol("failed to create session".into()).to_string(),
        "protocol: failed to create session"
    );
    assert_eq!(
        ClientError::Config("agent_cmd must not be empty".into()).to_string(),
        "config: agent_cmd must not be empty"
    );
    assert_eq!(
        ClientError::Io("permission denied".into()).to_string(),
        "io: permission denied"
    );
}

/// The timeout message names the configured value so callers can tell
/// "agent is slow" from "agent is broken".
#[test]
fn timeout_message_names_configured_seconds() {
    let msg = ClientError::Timeout(1800).to_string();
    assert!(msg.contains("1800s"), "message must name the value: {msg}");
    assert!(msg.starts_with("timeout:"));
}

/// Local I/O errors convert into the `Io` variant.
#[test]
fn io_error_converts() {
    let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let err: ClientError = io_err.into();
    assert!(matches!(err, ClientError::Io(_)));
    assert!(err.to_string().contains("pipe closed"));
}
