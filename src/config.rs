//! Typed configuration mirroring `FADictConfKeeper`'s accessors: which packed sections a model
//! carries, and how to interpret them.

use alloc::vec::Vec;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::automaton::{MealyDfa, PackedArray, PackedMultiMap, RsDfa};
use crate::charsmap::PackedCharMap;
use crate::error::ConfigError;

/// Direction a DFA is walked in. Mirrors `FAFsmConst::DIR_L2R` / `DIR_R2L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Subword segmentation algorithm a dictionary section is configured for. Mirrors
/// `FAFsmConst::TOKALG_*`.
///
/// `None` means the unigram-LM/BPE engines are not used at all: `text_to_ids` runs the word
/// breaker directly and reads WordPiece-style subtoken coverage off its spans instead (see
/// `DictConfig`'s doc comment and `facade::word_piece_ids`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum TokAlgo {
    /// No subword segmentation engine; `text_to_ids` falls back to lex-engine-driven WordPiece
    /// coverage.
    None,
    /// Unigram-LM best (Viterbi) segmentation.
    UnigramLm,
    /// Greedy-merge BPE segmentation, rescanning all adjacent pairs after every merge.
    Bpe,
    /// Greedy-merge BPE segmentation, using a priority queue with lazy deletion. Must produce the
    /// same output as [`TokAlgo::Bpe`] for the same input and model.
    BpeOpt,
}

/// Which packed object kind a section's automaton is. Mirrors `FAFsmConst::TYPE_RS_DFA` /
/// `TYPE_MEALY_DFA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FsmType {
    RsDfa,
    MealyDfa,
}

/// Lexical configuration: a DFA plus tag lookup, used for word- and sentence-breaking (`WBD`
/// sections).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LexConfig {
    pub(crate) dfa:         RsDfa,
    pub(crate) state_to_ow: PackedMultiMap,
    pub(crate) char_map:    Option<PackedCharMap>,
    pub(crate) ignore_case: bool,
    pub(crate) direction:   Direction,
}
impl LexConfig {
    #[must_use]
    pub fn new(
        dfa: RsDfa, state_to_ow: PackedMultiMap, char_map: Option<PackedCharMap>,
        ignore_case: bool, direction: Direction,
    ) -> Self {
        Self { dfa, state_to_ow, char_map, ignore_case, direction }
    }

    #[must_use]
    pub fn dfa(&self) -> &RsDfa {
        &self.dfa
    }

    #[must_use]
    pub fn tags(&self, state: u32) -> &[i32] {
        self.state_to_ow.get(state)
    }

    #[must_use]
    pub fn char_map(&self) -> Option<&PackedCharMap> {
        self.char_map.as_ref()
    }

    #[must_use]
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Deserializes a [`LexConfig`] from the bytes of a packed section, as written by
    /// [`crate::build::assemble`].
    #[cfg(feature = "serialization")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::error::LoadError> {
        postcard::from_bytes(bytes).map_err(|e| {
            crate::error::LoadError::MalformedSection(
                crate::image::SectionId::Wbd,
                alloc::format!("{e}"),
            )
        })
    }
}

/// Dictionary configuration for subword segmentation (`POS_DICT` sections): an automaton used as
/// a minimal perfect hash over dictionary keys (`fsm_type` selects which kind), plus the
/// `K2I`/`I2Info` side tables and per-entry scores for unigram-LM dictionaries.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DictConfig {
    pub(crate) fsm_type:  FsmType,
    pub(crate) rs_dfa:    Option<RsDfa>,
    pub(crate) mealy_dfa: Option<MealyDfa>,
    pub(crate) k2i:       PackedArray,
    pub(crate) i2info:    PackedMultiMap,
    pub(crate) char_map:  Option<PackedCharMap>,
    pub(crate) tok_algo:  TokAlgo,
    pub(crate) unk_id:    i32,
}
impl DictConfig {
    #[must_use]
    pub fn new(
        fsm_type: FsmType, rs_dfa: Option<RsDfa>, mealy_dfa: Option<MealyDfa>, k2i: PackedArray,
        i2info: PackedMultiMap, char_map: Option<PackedCharMap>, tok_algo: TokAlgo, unk_id: i32,
    ) -> Result<Self, ConfigError> {
        match fsm_type {
            FsmType::RsDfa if rs_dfa.is_none() => return Err(ConfigError::MissingDictionary(tok_algo)),
            FsmType::MealyDfa if mealy_dfa.is_none() => {
                return Err(ConfigError::MissingDictionary(tok_algo));
            }
            _ => {}
        }
        Ok(Self { fsm_type, rs_dfa, mealy_dfa, k2i, i2info, char_map, tok_algo, unk_id })
    }

    #[must_use]
    pub fn fsm_type(&self) -> FsmType {
        self.fsm_type
    }

    #[must_use]
    pub fn rs_dfa(&self) -> Option<&RsDfa> {
        self.rs_dfa.as_ref()
    }

    #[must_use]
    pub fn mealy_dfa(&self) -> Option<&MealyDfa> {
        self.mealy_dfa.as_ref()
    }

    #[must_use]
    pub fn k2i(&self) -> &PackedArray {
        &self.k2i
    }

    #[must_use]
    pub fn i2info(&self) -> &PackedMultiMap {
        &self.i2info
    }

    #[must_use]
    pub fn char_map(&self) -> Option<&PackedCharMap> {
        self.char_map.as_ref()
    }

    #[must_use]
    pub fn tok_algo(&self) -> TokAlgo {
        self.tok_algo
    }

    #[must_use]
    pub fn unk_id(&self) -> i32 {
        self.unk_id
    }

    /// Validates that `scores` has one entry per dictionary output, as required by
    /// [`TokAlgo::UnigramLm`] dictionaries.
    pub fn validate_scores(&self, scores: &[i32]) -> Result<(), ConfigError> {
        if self.tok_algo == TokAlgo::UnigramLm && scores.len() != self.k2i.len() {
            return Err(ConfigError::InvalidScores);
        }
        Ok(())
    }

    /// Deserializes a [`DictConfig`] from the bytes of a packed section, as written by
    /// [`crate::build::assemble`].
    #[cfg(feature = "serialization")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::error::LoadError> {
        postcard::from_bytes(bytes).map_err(|e| {
            crate::error::LoadError::MalformedSection(
                crate::image::SectionId::PosDict,
                alloc::format!("{e}"),
            )
        })
    }
}

/// Score/length/flags tuple extracted from an `I2Info` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictInfo {
    pub score:  i32,
    pub length: i32,
    pub flags:  i32,
}
impl DictInfo {
    #[must_use]
    pub fn from_slice(values: &[i32]) -> Option<Self> {
        match values {
            [score, length, flags, ..] => Some(Self { score: *score, length: *length, flags: *flags }),
            _ => None,
        }
    }
}

/// Collects all `i32` values at the given dictionary id into a `Vec`, used by builder/tooling
/// code paths where a borrowed slice would outlive the temporary it is computed from.
#[must_use]
pub fn collect_info(map: &PackedMultiMap, id: u32) -> Vec<i32> {
    map.get(id).to_vec()
}
