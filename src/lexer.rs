//! Longest-match lexical tokenizer: scans a code-point buffer against a packed DFA, emitting one
//! span per match with the tag(s) attached to the state the match ended in.
//!
//! Grounded on `blingfiretokdll.cpp`'s `TextToSentencesWithOffsetsWithModel` /
//! `TextToWordsWithOffsetsWithModel` span-walking loops: at each position, follow the DFA as far
//! as possible, remember the last position at which it was in a final state, and emit a span back
//! to that position (or, if no final state was ever reached, advance by one position and emit an
//! [`crate::limits::IGNORE_TAG`] span so the scan always makes progress).

use alloc::vec::Vec;

use crate::config::{Direction, LexConfig};
use crate::limits::IGNORE_TAG;

/// One subtoken carved out of a [`Span`]'s match range: a dictionary id plus the `[from, to)`
/// range it covers, per the "subtoken emission" rule in `DESIGN.md` — subtoken ranges tile their
/// parent span's range contiguously, in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtoken {
    pub id:   i32,
    pub from: usize,
    pub to:   usize,
}

/// A single lexical span: `[from, to)` over the input code-point buffer, tagged with the primary
/// output value attached to the DFA state the match ended in, plus — when that state emits more
/// than one output — the subtoken spans that tile the match, in declared order.
///
/// A state with a single output has `subtokens` empty; `tag` alone (`WORD_TAG`, a sentence tag, or
/// `IGNORE_TAG`) is all a word/sentence breaker ever needs. A state configured for WordPiece-style
/// subtoken coverage instead carries `tag == WORD_TAG` plus one [`Subtoken`] per dictionary entry
/// covering the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub from:      usize,
    pub to:        usize,
    pub tag:       i32,
    pub subtokens: Vec<Subtoken>,
}
impl Span {
    #[must_use]
    pub fn has_tag(&self, tag: i32) -> bool {
        self.tag == tag
    }
}

/// Decodes a state's raw `State→Output` values into a primary tag plus subtoken spans.
///
/// The packed convention is: the first value is always the primary tag. Any further values come
/// in `(id, length)` pairs, each naming a subtoken that starts where the previous one ended
/// (the first starts at `from`); lengths are clamped so a malformed model can never produce a
/// subtoken past `to`. A single bare value (the common case for word/sentence breakers) yields no
/// subtokens.
fn decode_outputs(raw: &[i32], from: usize, to: usize) -> (i32, Vec<Subtoken>) {
    let Some((&tag, rest)) = raw.split_first() else {
        return (IGNORE_TAG, Vec::new());
    };
    let mut subtokens = Vec::new();
    let mut pos = from;
    let mut pairs = rest.chunks_exact(2);
    for pair in &mut pairs {
        let id = pair[0];
        let len = pair[1].max(0) as usize;
        let end = (pos + len).min(to);
        subtokens.push(Subtoken { id, from: pos, to: end });
        pos = end;
    }
    (tag, subtokens)
}

/// Scans `input` against `config`'s DFA, producing one [`Span`] per match.
///
/// Matching is longest-match: from each position, the DFA is followed while it accepts, tracking
/// the most recent final state reached. When no further transition exists, the span ends at that
/// final state's position (or, if none was ever reached, the scan emits a one-codepoint
/// [`IGNORE_TAG`] span and advances by one, so the whole input is always covered).
#[must_use]
pub fn scan(input: &[i32], config: &LexConfig) -> Vec<Span> {
    let len = input.len();
    let mut spans = Vec::new();
    let mut pos = 0usize;
    while pos < len {
        let (from, to) = match config.direction() {
            Direction::LeftToRight => (pos, scan_one(input, pos, len, config)),
            Direction::RightToLeft => (scan_one_rtl(input, pos, len, config), pos + 1),
        };
        match to {
            Some(end) if end > from => {
                let state = walk_state(input, from, end, config);
                let (tag, subtokens) = decode_outputs(config.tags(state), from, end);
                spans.push(Span { from, to: end, tag, subtokens });
                pos = end;
            }
            _ => {
                spans.push(Span { from: pos, to: pos + 1, tag: IGNORE_TAG, subtokens: Vec::new() });
                pos += 1;
            }
        }
    }
    spans
}

fn normalized_symbol(c: i32, config: &LexConfig) -> i32 {
    if config.ignore_case() { to_lower(c) } else { c }
}

fn to_lower(c: i32) -> i32 {
    char::from_u32(c as u32).map_or(c, |ch| ch.to_lowercase().next().map_or(c, |l| l as i32))
}

/// Walks forward from `pos`, returning the end of the longest accepted match (exclusive), or
/// `None` if no final state was ever reached.
fn scan_one(input: &[i32], pos: usize, len: usize, config: &LexConfig) -> Option<usize> {
    let dfa = config.dfa();
    let mut state = dfa.initial();
    let mut last_final = None;
    let mut i = pos;
    while i < len {
        let symbol = normalized_symbol(input[i], config);
        match dfa.step(state, symbol) {
            Some(next) => {
                state = next;
                i += 1;
                if dfa.is_final(state) {
                    last_final = Some(i);
                }
            }
            None => break,
        }
    }
    last_final
}

/// Right-to-left variant: walks backward from `pos` (inclusive), returning the start of the
/// longest accepted match, or `None`.
fn scan_one_rtl(input: &[i32], pos: usize, _len: usize, config: &LexConfig) -> Option<usize> {
    let dfa = config.dfa();
    let mut state = dfa.initial();
    let mut last_final = None;
    let mut i = pos as isize;
    while i >= 0 {
        let symbol = normalized_symbol(input[i as usize], config);
        match dfa.step(state, symbol) {
            Some(next) => {
                state = next;
                i -= 1;
                if dfa.is_final(state) {
                    last_final = Some((i + 1) as usize);
                }
            }
            None => break,
        }
    }
    last_final
}

/// Re-walks `[from, to)` to recover the DFA state the match ended in, used to look up its tags.
fn walk_state(input: &[i32], from: usize, to: usize, config: &LexConfig) -> u32 {
    let dfa = config.dfa();
    let mut state = dfa.initial();
    for &c in &input[from..to] {
        let symbol = normalized_symbol(c, config);
        state = dfa.step(state, symbol).unwrap_or(state);
    }
    state
}
