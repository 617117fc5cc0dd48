//! Unit tests for outbound JSON-RPC request encoding.

use acp_courier::acp::writer::encode_request;
use serde_json::{json, Value};

/// The envelope carries the JSON-RPC version, id, method, and params.
#[test]
fn envelope_fields_are_correct() {
    let frame = encode_request(1, "initialize", &json!({"protocolVersion": 1}));
    let parsed: Value = serde_json::from_str(&frame).expect("frame must be valid JSON");

    assert_eq!(parsed["jsonrpc"], "2.0");
    assert_eq!(parsed["id"], 1);
    assert_eq!(parsed["method"], "initialize");
    assert_eq!(parsed["params"]["protocolVersion"], 1);
}

/// One frame is one line: compact encoding with no embedded newlines, even
/// when params themselves contain newline characters.
#[test]
fn frame_is_a_single_line() {
    let frame = encode_request(
        3,
        "session/prompt",
        &json!({"prompt": [{"type": "text", "text": "line one\nline two"}]}),
    );
    assert!(
        !frame.contains('\n'),
        "frame must not contain literal newlines: {frame}"
    );
}

/// Params round-trip structurally through the envelope.
#[test]
fn params_round_trip() {
    let params = json!({"cwd": "/work", "mcpServers": []});
    let frame = encode_request(2, "session/new", &params);
    let parsed: Value = serde_json::from_str(&frame).expect("valid JSON");

    assert_eq!(parsed["params"], params);
}

/// Ids serialize as plain integers, not strings.
#[test]
fn id_is_numeric() {
    let frame = encode_request(2, "session/new", &json!({}));
    let parsed: Value = serde_json::from_str(&frame).expect("valid JSON");
    assert!(parsed["id"].is_u64(), "id must be numeric: {frame}");
}
