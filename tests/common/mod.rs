//! Shared helpers for building toy models in integration tests.

use packfsm::automaton::builder::{array, mealy_dfa, multi_map, rs_dfa};
use packfsm::config::{DictConfig, Direction, FsmType, LexConfig, TokAlgo};
use packfsm::limits::WORD_TAG;

/// A word breaker that accepts maximal runs of ASCII letters or digits as words, treating
/// everything else as a gap.
pub fn ascii_word_breaker() -> LexConfig {
    let mut edges = Vec::new();
    for c in b'a'..=b'z' {
        edges.push((0u32, c as i32, 1u32));
        edges.push((1u32, c as i32, 1u32));
    }
    for c in b'0'..=b'9' {
        edges.push((0u32, c as i32, 1u32));
        edges.push((1u32, c as i32, 1u32));
    }
    let dfa = rs_dfa(2, 0, edges, &[1]);
    let tags = multi_map(2, vec![(1, vec![WORD_TAG])]);
    LexConfig::new(dfa, tags, None, false, Direction::LeftToRight)
}

/// A word breaker that treats maximal letter runs (case-insensitively) and each of `.`, `!`, `?`
/// as its own one-character word, matching the "Hello, world!" tokens-include-punctuation
/// scenario used for hashing.
pub fn hashing_word_breaker() -> LexConfig {
    let mut edges = Vec::new();
    for c in b'a'..=b'z' {
        edges.push((0u32, c as i32, 1u32));
        edges.push((1u32, c as i32, 1u32));
    }
    for &term in &[b'.', b'!', b'?'] {
        edges.push((0u32, term as i32, 2u32));
    }
    let dfa = rs_dfa(3, 0, edges, &[1, 2]);
    let tags = multi_map(3, vec![(1, vec![WORD_TAG]), (2, vec![WORD_TAG])]);
    LexConfig::new(dfa, tags, None, true, Direction::LeftToRight)
}

/// A sentence breaker that splits on `.`, `!`, `?` followed by end of input or whitespace,
/// simplified to: any run of non-terminator characters followed by exactly one terminator.
pub fn ascii_sentence_breaker() -> LexConfig {
    // state 0: default; state 1 (non-terminator run); state 2 (final, just consumed a
    // terminator). State 2 has no outgoing transitions, so the longest match always stops right
    // after the terminator — the next sentence starts a fresh walk from state 0.
    let mut edges = Vec::new();
    for c in 0x20u32..=0x7eu32 {
        if c == b'.' as u32 || c == b'!' as u32 || c == b'?' as u32 {
            continue;
        }
        edges.push((0u32, c as i32, 1u32));
        edges.push((1u32, c as i32, 1u32));
    }
    for &term in &[b'.', b'!', b'?'] {
        edges.push((0u32, term as i32, 2u32));
        edges.push((1u32, term as i32, 2u32));
    }
    let dfa = rs_dfa(3, 0, edges, &[2]);
    let tags = multi_map(3, vec![(2, vec![WORD_TAG])]);
    LexConfig::new(dfa, tags, None, false, Direction::LeftToRight)
}

/// A dictionary with three unigram-LM entries, scores lower-is-better: "a" (1), "ab" (1), "b" (1).
/// "ab"'s total (1) beats "a"+"b"'s total (1+1=2), so the DP should prefer the single merged
/// match.
pub fn unigram_dictionary() -> DictConfig {
    let dfa = mealy_dfa(
        4,
        0,
        vec![(0, 'a' as i32, 1, 0), (1, 'b' as i32, 2, 1), (0, 'b' as i32, 3, 2)],
        &[1, 2, 3],
    );
    let k2i = array(vec![0, 1, 2]);
    let i2info =
        multi_map(3, vec![(0, vec![1, 1, 0]), (1, vec![1, 2, 0]), (2, vec![1, 1, 0])]);
    DictConfig::new(FsmType::MealyDfa, None, Some(dfa), k2i, i2info, None, TokAlgo::UnigramLm, -1)
        .unwrap()
}
