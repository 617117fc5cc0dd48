//! Unit tests for the thinking-span stream filter and output accumulator.

use acp_courier::acp::filter::{strip_thinking, OutputAccumulator};

// ── strip_thinking ───────────────────────────────────────────────────────────

/// A chunk with no reasoning spans passes through unchanged.
#[test]
fn chunk_without_spans_is_unchanged() {
    let chunk = "plain visible text";
    assert_eq!(strip_thinking(chunk), chunk);
}

/// A single embedded span is removed and the surrounding text joined.
#[test]
fn single_span_is_removed() {
    let chunk = "before<thinking>secret plan</thinking>after";
    assert_eq!(strip_thinking(chunk), "beforeafter");
}

/// Multiple spans within one chunk are each removed exactly once.
#[test]
fn multiple_spans_are_each_removed() {
    let chunk = "a<thinking>one</thinking>b<thinking>two</thinking>c";
    assert_eq!(strip_thinking(chunk), "abc");
}

/// Spans crossing line boundaries are removed (dot matches newline).
#[test]
fn multiline_span_is_removed() {
    let chunk = "head\n<thinking>line one\nline two\nline three</thinking>\ntail";
    assert_eq!(strip_thinking(chunk), "head\n\ntail");
}

/// Matching is non-greedy: two spans with visible text between them do not
/// swallow that text.
#[test]
fn non_greedy_matching_preserves_text_between_spans() {
    let chunk = "<thinking>x</thinking>KEEP<thinking>y</thinking>";
    assert_eq!(strip_thinking(chunk), "KEEP");
}

/// Filtering is idempotent: a second pass over filtered text is a no-op.
#[test]
fn filtering_is_idempotent() {
    let chunk = "a<thinking>one</thinking>b\n<thinking>two\nthree</thinking>c";
    let once = strip_thinking(chunk).into_owned();
    let twice = strip_thinking(&once).into_owned();
    assert_eq!(once, twice);
}

/// The filtered output never contains a span or its inner text.
#[test]
fn filtered_output_contains_no_trace_of_reasoning() {
    let chunk = "result: <thinking>the secret approach</thinking>42";
    let filtered = strip_thinking(chunk);
    assert!(!filtered.contains("<thinking>"));
    assert!(!filtered.contains("</thinking>"));
    assert!(!filtered.contains("secret approach"));
    assert_eq!(filtered, "result: 42");
}

// ── OutputAccumulator ────────────────────────────────────────────────────────

/// Fragments are concatenated in push order with no separator.
#[test]
fn fragments_concatenate_in_arrival_order() {
    let mut acc = OutputAccumulator::new();
    acc.push("Hello ");
    acc.push("world");
    assert_eq!(acc.len(), 2);
    assert_eq!(acc.into_text(), "Hello world");
}

/// The untrimmed filtered text is kept — surrounding whitespace the agent
/// emitted stays part of the output.
#[test]
fn surrounding_whitespace_is_preserved() {
    let mut acc = OutputAccumulator::new();
    acc.push(" padded <thinking>x</thinking>text ");
    assert_eq!(acc.into_text(), " padded text ");
}

/// A chunk that is nothing but a reasoning span contributes nothing.
#[test]
fn all_thinking_chunk_contributes_nothing() {
    let mut acc = OutputAccumulator::new();
    acc.push("<thinking>only reasoning</thinking>");
    assert!(acc.is_empty());
    assert_eq!(acc.into_text(), "");
}

/// A chunk that filters down to pure whitespace also contributes nothing.
#[test]
fn whitespace_only_remainder_contributes_nothing() {
    let mut acc = OutputAccumulator::new();
    acc.push("  <thinking>a</thinking>\n<thinking>b</thinking>  ");
    assert!(acc.is_empty());
}

/// Mixed pushes: filtered-empty chunks are skipped, visible ones kept.
#[test]
fn empty_contributions_do_not_break_ordering() {
    let mut acc = OutputAccumulator::new();
    acc.push("first");
    acc.push("<thinking>dropped</thinking>");
    acc.push("second");
    assert_eq!(acc.len(), 2);
    assert_eq!(acc.into_text(), "firstsecond");
}
