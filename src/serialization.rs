//! Human-editable model definition format, serialized with `serde`/`postcard`.
//!
//! Mirrors `kitoken`'s `Definition` type (`src/definition.rs`): a plain, fully-owned description
//! of a model that is easy to author or inspect directly, kept separate from the packed binary
//! [`crate::image::Image`] that the hot-path readers actually consume. [`crate::build`] turns a
//! `Definition` into an `Image`; this module only describes the shape.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::config::{Direction, FsmType, TokAlgo};

/// Plain description of a lexical (word- or sentence-breaking) automaton, in the same edge-list
/// shape [`crate::automaton::builder`] consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexDefinition {
    pub state_count:  u32,
    pub initial:      u32,
    pub edges:        Vec<(u32, i32, u32)>,
    pub finals:       Vec<u32>,
    pub tags:         Vec<(u32, Vec<i32>)>,
    pub char_map:     Option<Vec<(Vec<i32>, Vec<i32>)>>,
    pub ignore_case:  bool,
    pub direction:    Direction,
}

/// Plain description of a dictionary automaton used for subword segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictDefinition {
    pub fsm_type:    FsmType,
    pub state_count: u32,
    pub initial:     u32,
    /// `(state, symbol, target)` edges, used when `fsm_type` is [`FsmType::RsDfa`].
    pub rs_edges:    Option<Vec<(u32, i32, u32)>>,
    /// `(state, symbol, target, delta)` edges, used when `fsm_type` is [`FsmType::MealyDfa`].
    pub mealy_edges: Option<Vec<(u32, i32, u32, i32)>>,
    pub finals:      Vec<u32>,
    pub k2i:         Vec<i32>,
    pub i2info:      Vec<(u32, Vec<i32>)>,
    pub char_map:    Option<Vec<(Vec<i32>, Vec<i32>)>>,
    pub tok_algo:    TokAlgo,
    pub unk_id:      i32,
}

/// A full model definition: an optional word breaker, an optional sentence breaker, and an
/// optional dictionary, matching the three sections this crate's model images carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Definition {
    pub word_breaker:     Option<LexDefinition>,
    pub sentence_breaker: Option<LexDefinition>,
    pub dictionary:       Option<DictDefinition>,
}
