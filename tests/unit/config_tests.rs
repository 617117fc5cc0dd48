//! Unit tests for client configuration parsing and validation.

use std::time::Duration;

use acp_courier::{ClientConfig, ClientError};

/// Defaults target the stock `opencode acp` agent with a 3 s handshake
/// budget and a 2 s shutdown grace.
#[test]
fn defaults_match_stock_agent() {
    let config = ClientConfig::default();

    assert_eq!(config.agent_cmd, "opencode");
    assert_eq!(config.agent_args, vec!["acp".to_owned()]);
    assert_eq!(config.handshake_budget(), Duration::from_secs(3));
    assert_eq!(config.shutdown_grace(), Duration::from_secs(2));
}

/// An empty TOML document yields the defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = ClientConfig::from_toml_str("").expect("empty config must parse");
    assert_eq!(config, ClientConfig::default());
}

/// Every field is overridable from TOML.
#[test]
fn toml_overrides_are_applied() {
    let raw = r#"
        agent_cmd = "my-agent"
        agent_args = ["--stdio", "--quiet"]
        handshake_budget_ms = 500
        shutdown_grace_ms = 250
    "#;
    let config = ClientConfig::from_toml_str(raw).expect("config must parse");

    assert_eq!(config.agent_cmd, "my-agent");
    assert_eq!(
        config.agent_args,
        vec!["--stdio".to_owned(), "--quiet".to_owned()]
    );
    assert_eq!(config.handshake_budget(), Duration::from_millis(500));
    assert_eq!(config.shutdown_grace(), Duration::from_millis(250));
}

/// A blank agent command fails validation.
#[test]
fn blank_agent_cmd_is_rejected() {
    let result = ClientConfig::from_toml_str(r#"agent_cmd = "  ""#);
    assert!(
        matches!(result, Err(ClientError::Config(_))),
        "blank agent_cmd must be rejected, got: {result:?}"
    );
}

/// A zero handshake budget fails validation.
#[test]
fn zero_handshake_budget_is_rejected() {
    let result = ClientConfig::from_toml_str("handshake_budget_ms = 0");
    assert!(
        matches!(result, Err(ClientError::Config(_))),
        "zero handshake budget must be rejected, got: {result:?}"
    );
}

/// Malformed TOML surfaces as a config error, not a panic.
#[test]
fn invalid_toml_is_a_config_error() {
    let result = ClientConfig::from_toml_str("agent_cmd = 5");
    assert!(matches!(result, Err(ClientError::Config(_))));
}
