//! Inline code: backtick pairs.
//!
//! Backticks already covered by an earlier pass are ignored. Each remaining
//! backtick pairs with the next one when the text between them spans at most
//! two line breaks, holds no other backtick and is not blank. Otherwise the
//! later backtick becomes the new candidate opener. Unpaired backticks are
//! not an error.

use super::{CodeSpans, LineIndex, SpanKind};

const MAX_NEWLINES: usize = 2;

/// Pairing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for an opener.
    Seeking,
    /// Holding an opener at byte `at`.
    Open { at: usize },
}

pub(super) fn detect(text: &str, index: &LineIndex, spans: &mut CodeSpans) {
    let ticks: Vec<usize> = text
        .match_indices('`')
        .map(|(i, _)| i)
        .filter(|&i| !spans.covers(i))
        .collect();

    let mut found = Vec::new();
    let mut state = State::Seeking;
    for pos in ticks {
        state = match state {
            State::Seeking => State::Open { at: pos },
            State::Open { at } if is_code(&text[at + 1..pos]) => {
                found.push((at, pos + 1));
                State::Seeking
            }
            State::Open { .. } => State::Open { at: pos },
        };
    }

    for (start, end) in found {
        spans.push(index, SpanKind::Inline, start, end);
    }
}

/// Valid content between two backticks.
fn is_code(inner: &str) -> bool {
    !inner.contains('`')
        && inner.matches('\n').count() <= MAX_NEWLINES
        && !inner.trim().is_empty()
}
