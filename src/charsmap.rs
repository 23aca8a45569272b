//! Character normalizer: longest-prefix-match substitution over UTF-32 code points, with offset
//! tracking from output position back to input position.
//!
//! Adapted from [`kitoken`](https://github.com/Systemcluster/kitoken)'s `CharsMap`, which performs
//! the same longest-prefix substitution over UTF-8 bytes for SentencePiece-style normalization.
//! This version operates one layer up, over `i32` code points, since the packed model image
//! stores normalization rules as code-point sequences rather than byte sequences.

use alloc::vec::Vec;

use hashbrown::HashMap;
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::error::ProcessError;
use crate::limits::MAX_ARR_SIZE;

/// One normalization rule: replace `pattern` (matched as a prefix of the remaining input) with
/// `replacement`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
struct Rule {
    pattern:     Vec<i32>,
    replacement: Vec<i32>,
}

/// A packed, read-only character normalizer.
///
/// Rules are grouped by their first code point and sorted longest-pattern-first within each
/// group, so `normalize` always finds the longest matching prefix at a given position without
/// backtracking.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PackedCharMap {
    by_first: HashMap<i32, Vec<Rule>>,
}
impl PackedCharMap {
    pub(crate) fn new(mut rules: Vec<(Vec<i32>, Vec<i32>)>) -> Self {
        rules.retain(|(pattern, _)| !pattern.is_empty());
        let mut by_first: HashMap<i32, Vec<Rule>> = HashMap::new();
        for (pattern, replacement) in rules {
            by_first.entry(pattern[0]).or_default().push(Rule { pattern, replacement });
        }
        for group in by_first.values_mut() {
            group.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        }
        Self { by_first }
    }

    /// Returns the longest rule whose pattern matches a prefix of `input`, if any.
    fn longest_match(&self, input: &[i32]) -> Option<&Rule> {
        let first = *input.first()?;
        let group = self.by_first.get(&first)?;
        group.iter().find(|rule| input.starts_with(&rule.pattern[..]))
    }

    /// Normalizes `input`, appending output code points to `out` and, for every output code
    /// point, the input index it originated from (the first input index of the match it came
    /// from, for substituted spans) to `offsets`.
    ///
    /// Code points with no matching rule pass through unchanged. Fails with
    /// [`ProcessError::ScratchExhausted`] rather than truncating if the output would exceed
    /// [`MAX_ARR_SIZE`] — see the "normalization overflow" resolution in `DESIGN.md`.
    pub fn normalize(
        &self, input: &[i32], out: &mut Vec<i32>, offsets: &mut Vec<usize>,
    ) -> Result<(), ProcessError> {
        let mut pos = 0usize;
        while pos < input.len() {
            if out.len() >= MAX_ARR_SIZE {
                return Err(ProcessError::ScratchExhausted);
            }
            match self.longest_match(&input[pos..]) {
                Some(rule) => {
                    for &c in &rule.replacement {
                        if out.len() >= MAX_ARR_SIZE {
                            return Err(ProcessError::ScratchExhausted);
                        }
                        out.push(c);
                        offsets.push(pos);
                    }
                    pos += rule.pattern.len();
                }
                None => {
                    out.push(input[pos]);
                    offsets.push(pos);
                    pos += 1;
                }
            }
        }
        Ok(())
    }

    /// Returns whether this map has any rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_first.is_empty()
    }
}

/// Builder-facing constructor, used by [`crate::build`] and by tests/tooling.
pub mod builder {
    use super::PackedCharMap;
    use alloc::vec::Vec;

    #[must_use]
    pub fn char_map(rules: Vec<(Vec<i32>, Vec<i32>)>) -> PackedCharMap {
        PackedCharMap::new(rules)
    }
}
