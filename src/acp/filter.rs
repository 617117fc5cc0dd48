//! Streaming output filter.
//!
//! Agents interleave internal reasoning into their message chunks as
//! `<thinking>…</thinking>` spans. The filter removes every such span —
//! spans may cross line boundaries and appear multiple times per chunk —
//! before the remaining visible text is accumulated. A chunk that is
//! nothing but reasoning contributes nothing.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Non-greedy, dot-matches-newline matcher for one reasoning span.
const THINKING_SPAN_PATTERN: &str = r"(?s)<thinking>.*?</thinking>";

#[allow(clippy::expect_used)] // Pattern is a compile-time literal known to be valid.
fn thinking_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(THINKING_SPAN_PATTERN).expect("thinking-span pattern is valid"))
}

/// Remove every `<thinking>…</thinking>` span from `text`.
///
/// Matching is non-overlapping and non-greedy, so multiple spans within one
/// chunk are each removed exactly once. Idempotent for well-formed input:
/// filtering an already-filtered chunk is a no-op.
#[must_use]
pub fn strip_thinking(text: &str) -> Cow<'_, str> {
    thinking_span().replace_all(text, "")
}

/// Ordered accumulator for visible output fragments.
///
/// Fragments are concatenated in receipt order with no separator — the
/// protocol is a strictly sequential single stream, so receipt order is the
/// agent's emission order.
#[derive(Debug, Default)]
pub struct OutputAccumulator {
    fragments: Vec<String>,
}

impl OutputAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one raw chunk and append the visible remainder.
    ///
    /// The remainder is dropped when it trims to empty; otherwise the
    /// untrimmed filtered text is kept, preserving the agent's own spacing
    /// between fragments.
    pub fn push(&mut self, chunk: &str) {
        let filtered = strip_thinking(chunk);
        if !filtered.trim().is_empty() {
            self.fragments.push(filtered.into_owned());
        }
    }

    /// Number of fragments accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether nothing visible has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenate all fragments into the final result string.
    #[must_use]
    pub fn into_text(self) -> String {
        self.fragments.concat()
    }
}
