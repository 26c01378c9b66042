//! Session-scoped transcript accumulation.

/// Ordered, append-only record of what the agent said during one session.
///
/// Owned exclusively by the session that created it. Segments arrive through
/// [`append`](Self::append) in commit order and are never reordered or
/// deduplicated; empty segments are dropped. There is no capacity bound — an
/// unbounded session implies unbounded memory, which is accepted rather than
/// silently capped.
///
/// [`drain`](Self::drain) consumes the accumulator, so the transcript can be
/// frozen at most once and never mutated afterwards.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    segments: Vec<String>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one committed utterance. Empty text is dropped.
    pub fn append(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.segments.push(text);
    }

    /// Number of segments collected so far.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Freezes the transcript: joins all segments with newlines and consumes
    /// the accumulator.
    pub fn drain(self) -> String {
        self.segments.join("\n")
    }
}
