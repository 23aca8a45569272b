//! Subword segmentation engines: unigram-LM best segmentation ([`unigram`]) and greedy-merge BPE
//! ([`bpe`]). Both share the same dictionary lookup primitive over a [`DictConfig`], since both
//! ultimately ask the same question — "does this code-point span have a dictionary entry, and
//! what is its id and score" — and differ only in how they use the answer (DP vs greedy merge).

pub mod bpe;
pub mod unigram;

use crate::config::{DictConfig, DictInfo, FsmType};

/// The outcome of a successful dictionary lookup: the id used to index `I2Info`
/// (the automaton's minimal-perfect-hash id, or its `K2I`-mapped external id — see
/// `DESIGN.md`'s note on this ambiguity), plus the decoded score/length/flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictMatch {
    pub id:   i32,
    pub info: DictInfo,
}

/// Looks up `span` (a contiguous code-point slice) in `config`'s dictionary automaton.
///
/// For a [`FsmType::MealyDfa`] dictionary, walks the Mealy machine and sums transition deltas to
/// get the minimal-perfect-hash id, per `FAMealyDfa_pack_triv`'s role in `FADictConfKeeper.h`. For
/// a [`FsmType::RsDfa`] dictionary, the terminal state index is used directly as the id, since a
/// plain RS-DFA carries no output values of its own.
#[must_use]
pub fn lookup(config: &DictConfig, span: &[i32]) -> Option<DictMatch> {
    let mph_id = match config.fsm_type() {
        FsmType::MealyDfa => {
            let dfa = config.mealy_dfa()?;
            let mut state = dfa.initial();
            let mut acc = 0i32;
            for &c in span {
                let (next, delta) = dfa.step(state, c)?;
                state = next;
                acc += delta;
            }
            if !dfa.is_final(state) {
                return None;
            }
            acc
        }
        FsmType::RsDfa => {
            let dfa = config.rs_dfa()?;
            let mut state = dfa.initial();
            for &c in span {
                state = dfa.step(state, c)?;
            }
            if !dfa.is_final(state) {
                return None;
            }
            state as i32
        }
    };
    let external_id = config.k2i().get(mph_id as u32);
    let values = config.i2info().get(external_id as u32);
    let info = DictInfo::from_slice(values)?;
    Some(DictMatch { id: external_id, info })
}
