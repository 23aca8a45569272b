//! Unigram-LM best (1-best Viterbi) segmentation.
//!
//! Generalizes [`kitoken`](https://github.com/Systemcluster/kitoken)'s `encode_unigram` from a
//! byte-trie dictionary to a packed dictionary automaton over code points. At every position, the
//! automaton is walked forward once, recording every dictionary match that ends there (an
//! automaton may pass through more than one final state along a single walk); a standard
//! left-to-right DP then picks the lowest-total-score segmentation (scores are negative-log-prob
//! surrogates, so lower is better), breaking ties by preferring the longer of the two candidate
//! matches, then the numerically smaller dictionary id.

use alloc::vec::Vec;

use crate::config::{DictConfig, FsmType};
use crate::error::ProcessError;
use crate::limits::MAX_ARR_SIZE;
use crate::segment::DictMatch;

/// One emitted subtoken: a code-point span plus the dictionary id it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub from: usize,
    pub to:   usize,
    pub id:   i32,
}

/// Returns every dictionary match starting at `start`, as `(end, DictMatch)` pairs, found by a
/// single forward walk of the dictionary automaton from `start`.
fn matches_from(config: &DictConfig, input: &[i32], start: usize) -> Vec<(usize, DictMatch)> {
    let mut out = Vec::new();
    match config.fsm_type() {
        FsmType::MealyDfa => {
            let Some(dfa) = config.mealy_dfa() else { return out };
            let mut state = dfa.initial();
            let mut acc = 0i32;
            for (offset, &c) in input[start..].iter().enumerate() {
                match dfa.step(state, c) {
                    Some((next, delta)) => {
                        state = next;
                        acc += delta;
                        if dfa.is_final(state) {
                            let external_id = config.k2i().get(acc as u32);
                            if let Some(info) =
                                crate::config::DictInfo::from_slice(config.i2info().get(external_id as u32))
                            {
                                out.push((
                                    start + offset + 1,
                                    DictMatch { id: external_id, info },
                                ));
                            }
                        }
                    }
                    None => break,
                }
            }
        }
        FsmType::RsDfa => {
            let Some(dfa) = config.rs_dfa() else { return out };
            let mut state = dfa.initial();
            for (offset, &c) in input[start..].iter().enumerate() {
                match dfa.step(state, c) {
                    Some(next) => {
                        state = next;
                        if dfa.is_final(state) {
                            let external_id = config.k2i().get(state);
                            if let Some(info) =
                                crate::config::DictInfo::from_slice(config.i2info().get(external_id as u32))
                            {
                                out.push((
                                    start + offset + 1,
                                    DictMatch { id: external_id, info },
                                ));
                            }
                        }
                    }
                    None => break,
                }
            }
        }
    }
    out
}

/// Best-path DP state for one buffer position.
#[derive(Debug, Clone, Copy)]
struct Cell {
    score: i64,
    from:  usize,
    id:    i32,
    len:   usize,
}

/// Computes the unigram-LM best segmentation of `input`, returning one [`Piece`] per emitted
/// subtoken in left-to-right order. `unk_id` fills any span with no dictionary coverage.
pub fn segment(config: &DictConfig, input: &[i32]) -> Result<Vec<Piece>, ProcessError> {
    if input.len() > MAX_ARR_SIZE {
        return Err(ProcessError::InputTooLarge);
    }
    let n = input.len();
    let mut best: Vec<Option<Cell>> = alloc::vec![None; n + 1];
    best[0] = Some(Cell { score: 0, from: 0, id: -1, len: 0 });

    for pos in 0..n {
        let Some(base_cell) = best[pos] else { continue };
        let base = base_cell.score;
        for (end, m) in matches_from(config, input, pos) {
            let candidate_len = end - pos;
            let candidate = Cell { score: base + i64::from(m.info.score), from: pos, id: m.id, len: candidate_len };
            // Minimization: lower total score wins; ties prefer the longer match, then the
            // numerically smaller dictionary id.
            let replace = match best[end] {
                None => true,
                Some(existing) => {
                    (candidate.score, -(candidate_len as i64), m.id)
                        < (existing.score, -(existing.len as i64), existing.id)
                }
            };
            if replace {
                best[end] = Some(candidate);
            }
        }
    }

    // If the DP never reaches `n`, the dictionary gives no full covering segmentation: emit one
    // fallback span for the whole input rather than patching individual uncovered positions.
    if best[n].is_none() {
        return Ok(alloc::vec![Piece { from: 0, to: n, id: config.unk_id() }]);
    }

    let mut pieces = Vec::new();
    let mut pos = n;
    while pos > 0 {
        let cell = best[pos].ok_or(ProcessError::MalformedOutput)?;
        pieces.push(Piece { from: cell.from, to: pos, id: cell.id });
        pos = cell.from;
    }
    pieces.reverse();
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::builder::{array, mealy_dfa, multi_map};
    use crate::config::{DictConfig, FsmType, TokAlgo};

    fn toy_config() -> DictConfig {
        // dictionary: "a" -> mph 0, "ab" -> mph 1, "b" -> mph 2
        let dfa = mealy_dfa(
            4,
            0,
            alloc::vec![
                (0, 'a' as i32, 1, 0),
                (1, 'b' as i32, 2, 1),
                (0, 'b' as i32, 3, 2),
            ],
            &[1, 2, 3],
        );
        let k2i = array(alloc::vec![0, 1, 2]);
        // scores (lower is better): "a"=1, "ab"=1 (total 1, beats "a"+"b"'s total of 2), "b"=1
        let i2info = multi_map(3, alloc::vec![
            (0, alloc::vec![1, 1, 0]),
            (1, alloc::vec![1, 2, 0]),
            (2, alloc::vec![1, 1, 0]),
        ]);
        DictConfig::new(FsmType::MealyDfa, None, Some(dfa), k2i, i2info, None, TokAlgo::UnigramLm, -1).unwrap()
    }

    #[test]
    fn prefers_lower_total_score() {
        let config = toy_config();
        let input = alloc::vec!['a' as i32, 'b' as i32];
        let pieces = segment(&config, &input).unwrap();
        // "ab" (total score 1) beats "a"+"b" (total score 1+1=2): lower total wins.
        assert_eq!(pieces, alloc::vec![Piece { from: 0, to: 2, id: 1 }]);
    }

    #[test]
    fn falls_back_to_unk_on_uncovered_span() {
        let config = toy_config();
        let input = alloc::vec!['a' as i32, 'z' as i32];
        let pieces = segment(&config, &input).unwrap();
        // no segmentation covers the whole input ("z" matches nothing), so the DP never reaches
        // n: emit one fallback span for the entire input, not a patched-together partial cover.
        assert_eq!(pieces, alloc::vec![Piece { from: 0, to: 2, id: -1 }]);
    }
}
