//! Packed, read-only automaton views.
//!
//! Every type here is an index-keyed, pointer-free arena over plain `Vec`s: transitions are
//! looked up by binary search within a per-state slice rather than followed through pointers, per
//! the "pointer graphs to packed indices" design note. None of these types ever allocate or
//! mutate after construction; they are built once (by [`crate::build`] or a loader) and then only
//! read.

use alloc::vec::Vec;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A single `(code point, target state)` transition, stored sorted by code point within a state's
/// slice so lookups are a binary search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
struct Transition {
    symbol: i32,
    target: u32,
}

/// Range of transitions belonging to one state, as a `(start, count)` pair into a shared flat
/// transition array.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
struct StateRange {
    start: u32,
    count: u32,
}

/// A packed deterministic finite automaton over Unicode code points.
///
/// Transitions for all states are stored in one flat, per-state-sorted array; state `s`'s
/// transitions live in `transitions[ranges[s].start .. +count]`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct RsDfa {
    ranges:      Vec<StateRange>,
    transitions: Vec<Transition>,
    finals:      Vec<bool>,
    initial:     u32,
}
impl RsDfa {
    pub(crate) fn new(
        ranges: Vec<StateRange>, transitions: Vec<Transition>, finals: Vec<bool>, initial: u32,
    ) -> Self {
        Self { ranges, transitions, finals, initial }
    }

    /// Returns the initial state.
    #[inline]
    #[must_use]
    pub fn initial(&self) -> u32 {
        self.initial
    }

    /// Returns whether `state` is an accepting state.
    #[inline]
    #[must_use]
    pub fn is_final(&self, state: u32) -> bool {
        self.finals.get(state as usize).copied().unwrap_or(false)
    }

    /// Returns the number of states.
    #[inline]
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.ranges.len()
    }

    /// Steps the automaton from `state` on `symbol`, returning the target state if a transition
    /// exists.
    #[inline]
    #[must_use]
    pub fn step(&self, state: u32, symbol: i32) -> Option<u32> {
        let range = self.ranges.get(state as usize)?;
        let slice = &self.transitions
            [range.start as usize..range.start as usize + range.count as usize];
        slice.binary_search_by_key(&symbol, |t| t.symbol).ok().map(|i| slice[i].target)
    }
}

/// A single Mealy-DFA transition: `(symbol, target state, output increment)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
struct MealyTransition {
    symbol: i32,
    target: u32,
    delta:  i32,
}

/// A packed Mealy machine used as a minimal perfect hash of dictionary keys.
///
/// Walking an accepted key from the initial state and summing the per-transition `delta` yields a
/// unique id in `[0, K)` for every key accepted by the underlying automaton.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct MealyDfa {
    ranges:      Vec<StateRange>,
    transitions: Vec<MealyTransition>,
    finals:      Vec<bool>,
    initial:     u32,
}
impl MealyDfa {
    pub(crate) fn new(
        ranges: Vec<StateRange>, transitions: Vec<MealyTransition>, finals: Vec<bool>,
        initial: u32,
    ) -> Self {
        Self { ranges, transitions, finals, initial }
    }

    #[inline]
    #[must_use]
    pub fn initial(&self) -> u32 {
        self.initial
    }

    #[inline]
    #[must_use]
    pub fn is_final(&self, state: u32) -> bool {
        self.finals.get(state as usize).copied().unwrap_or(false)
    }

    /// Steps the automaton from `state` on `symbol`, returning the target state and the output
    /// increment accumulated along this transition.
    #[inline]
    #[must_use]
    pub fn step(&self, state: u32, symbol: i32) -> Option<(u32, i32)> {
        let range = self.ranges.get(state as usize)?;
        let slice = &self.transitions
            [range.start as usize..range.start as usize + range.count as usize];
        slice
            .binary_search_by_key(&symbol, |t| t.symbol)
            .ok()
            .map(|i| (slice[i].target, slice[i].delta))
    }
}

/// A packed map from an integer key to a short slice of integer values.
///
/// Shared backing for both `State2Ow` (state to output tags) and `I2Info` (dictionary id to
/// `[score, length, flags...]`) in the data model: both are "map one small int to zero or more
/// ints", so they share this one packed representation instead of two near-duplicate types.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PackedMultiMap {
    ranges: Vec<StateRange>,
    values: Vec<i32>,
}
impl PackedMultiMap {
    pub(crate) fn new(ranges: Vec<StateRange>, values: Vec<i32>) -> Self {
        Self { ranges, values }
    }

    /// Returns the values associated with `key`, or an empty slice if `key` has no entry or is
    /// out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, key: u32) -> &[i32] {
        match self.ranges.get(key as usize) {
            Some(range) => &self.values[range.start as usize..range.start as usize + range.count as usize],
            None => &[],
        }
    }
}

/// A packed array mapping a dense integer index to an external integer value (`K2I`).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PackedArray {
    values: Vec<i32>,
}
impl PackedArray {
    pub(crate) fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    /// Returns the value at `index`, or `0` if out of range (mirrors a zero-filled packed array).
    #[inline]
    #[must_use]
    pub fn get(&self, index: u32) -> i32 {
        self.values.get(index as usize).copied().unwrap_or(0)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder-facing constructors, used by [`crate::build`] and by tests/tooling to assemble packed
/// automata from plain Rust descriptions without going through `serde`. Kept separate from the
/// hot-path read API above.
pub mod builder {
    use super::{MealyDfa, MealyTransition, PackedArray, PackedMultiMap, RsDfa, StateRange, Transition};
    use alloc::vec::Vec;

    /// Builds an [`RsDfa`] from a list of `(state, symbol, target)` transitions and a list of
    /// final states. States are assumed dense in `0..state_count`.
    pub fn rs_dfa(
        state_count: u32, initial: u32, mut edges: Vec<(u32, i32, u32)>, finals: &[u32],
    ) -> RsDfa {
        edges.sort_by_key(|&(s, c, _)| (s, c));
        let mut ranges = Vec::with_capacity(state_count as usize);
        let mut transitions = Vec::with_capacity(edges.len());
        let mut finals_vec = alloc::vec![false; state_count as usize];
        for &f in finals {
            if (f as usize) < finals_vec.len() {
                finals_vec[f as usize] = true;
            }
        }
        let mut iter = edges.into_iter().peekable();
        for state in 0..state_count {
            let start = transitions.len() as u32;
            let mut count = 0u32;
            while let Some(&(s, c, t)) = iter.peek() {
                if s != state {
                    break;
                }
                transitions.push(Transition { symbol: c, target: t });
                count += 1;
                iter.next();
            }
            ranges.push(StateRange { start, count });
        }
        RsDfa::new(ranges, transitions, finals_vec, initial)
    }

    /// Builds a [`MealyDfa`] from a list of `(state, symbol, target, delta)` transitions.
    pub fn mealy_dfa(
        state_count: u32, initial: u32, mut edges: Vec<(u32, i32, u32, i32)>, finals: &[u32],
    ) -> MealyDfa {
        edges.sort_by_key(|&(s, c, _, _)| (s, c));
        let mut ranges = Vec::with_capacity(state_count as usize);
        let mut transitions = Vec::with_capacity(edges.len());
        let mut finals_vec = alloc::vec![false; state_count as usize];
        for &f in finals {
            if (f as usize) < finals_vec.len() {
                finals_vec[f as usize] = true;
            }
        }
        let mut iter = edges.into_iter().peekable();
        for state in 0..state_count {
            let start = transitions.len() as u32;
            let mut count = 0u32;
            while let Some(&(s, c, t, d)) = iter.peek() {
                if s != state {
                    break;
                }
                transitions.push(MealyTransition { symbol: c, target: t, delta: d });
                count += 1;
                iter.next();
            }
            ranges.push(StateRange { start, count });
        }
        MealyDfa::new(ranges, transitions, finals_vec, initial)
    }

    /// Builds a [`PackedMultiMap`] from a list of `(key, values)` pairs. Keys are assumed dense in
    /// `0..key_count`; keys without an entry map to an empty slice.
    pub fn multi_map(key_count: u32, mut entries: Vec<(u32, Vec<i32>)>) -> PackedMultiMap {
        entries.sort_by_key(|&(k, _)| k);
        let mut ranges = alloc::vec![StateRange { start: 0, count: 0 }; key_count as usize];
        let mut values = Vec::new();
        for (key, vals) in entries {
            if (key as usize) < ranges.len() {
                ranges[key as usize] = StateRange { start: values.len() as u32, count: vals.len() as u32 };
                values.extend(vals);
            }
        }
        PackedMultiMap::new(ranges, values)
    }

    /// Builds a [`PackedArray`] from a dense list of values.
    pub fn array(values: Vec<i32>) -> PackedArray {
        PackedArray::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::builder::*;

    #[test]
    fn rs_dfa_steps_and_finals() {
        // accepts "ab"
        let dfa = rs_dfa(3, 0, alloc::vec![(0, b'a' as i32, 1), (1, b'b' as i32, 2)], &[2]);
        assert_eq!(dfa.step(0, b'a' as i32), Some(1));
        assert_eq!(dfa.step(1, b'b' as i32), Some(2));
        assert_eq!(dfa.step(0, b'x' as i32), None);
        assert!(dfa.is_final(2));
        assert!(!dfa.is_final(1));
    }

    #[test]
    fn mealy_dfa_accumulates_delta() {
        let dfa = mealy_dfa(3, 0, alloc::vec![(0, b'a' as i32, 1, 0), (1, b'b' as i32, 2, 5)], &[2]);
        let (s1, d1) = dfa.step(0, b'a' as i32).unwrap();
        let (s2, d2) = dfa.step(s1, b'b' as i32).unwrap();
        assert_eq!(s2, 2);
        assert_eq!(d1 + d2, 5);
    }

    #[test]
    fn multi_map_missing_key_is_empty() {
        let map = multi_map(3, alloc::vec![(1, alloc::vec![7, 8])]);
        assert_eq!(map.get(1), &[7, 8]);
        assert_eq!(map.get(0), &[] as &[i32]);
        assert_eq!(map.get(99), &[] as &[i32]);
    }

    #[test]
    fn packed_array_out_of_range_is_zero() {
        let arr = array(alloc::vec![10, 20, 30]);
        assert_eq!(arr.get(1), 20);
        assert_eq!(arr.get(99), 0);
    }
}
