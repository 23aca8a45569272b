//! FastText-compatible hashing (`text_to_hashes`) and whitespace normalization
//! (`normalize_spaces`).
//!
//! Grounded directly on `blingfiretokdll.cpp`'s `GetHash`, `AddWordNgrams`, `ComputeHashes`,
//! `TextToHashes`, and `NormalizeSpaces` — constants and control flow copied verbatim, generalized
//! only from `char*`/`wchar_t*` buffers to Rust slices.

use alloc::vec::Vec;

use crate::lexer::{scan, Span};
use crate::limits::{is_whitespace, WORD_TAG};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
/// Multiplicative constant folded into word-ngram hashing, matching fastText's `addWordNgrams`.
const NGRAM_MIX: u32 = 116_049_371;

/// One step of FNV-1a-like hashing over a single code point, matching `GetHash`'s per-character
/// update.
#[inline]
fn hash_step(mut h: u32, c: i32) -> u32 {
    h ^= c as u32;
    h = h.wrapping_mul(FNV_PRIME);
    h
}

/// Raw (un-bucketed) FNV-1a-like hash of a code-point slice, shared by [`hash_word`] and the
/// n-gram mixer, which needs the pre-bucket value to mix correctly.
fn raw_hash(word: &[i32]) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for &c in word {
        h = hash_step(h, c);
    }
    h
}

/// Hashes a single word span (a slice of code points) to its bucketed fastText id.
#[must_use]
pub fn hash_word(word: &[i32], bucket: u32) -> i32 {
    (raw_hash(word) % bucket) as i32
}

const EOS: &[i32] = &['<' as i32, '/' as i32, 's' as i32, '>' as i32];

/// Hashes the end-of-sentence marker `"</s>"`, matching `hash("</s>")` in the reference
/// implementation's `TextToHashes`.
#[must_use]
pub fn hash_eos(bucket: u32) -> i32 {
    hash_word(EOS, bucket)
}

/// Combines two word hashes into an order-sensitive bigram hash, matching fastText's
/// `addWordNgrams` mixing step.
#[must_use]
fn mix_ngram(a: u32, b: u32) -> u32 {
    a.wrapping_mul(NGRAM_MIX).wrapping_add(b)
}

/// Splits `input` into word spans using `config`'s word-breaking DFA, then emits one hash per
/// word followed by, for each `n` in `2..=word_ngrams`, one hash per contiguous word n-gram, in
/// the order `blingfiretokdll.cpp`'s `TextToHashes`/`AddWordNgrams` produce them (unigrams first,
/// then each n-gram order in turn).
///
/// `</s>` always pads the right edge: an n-gram window that would run past the last word is
/// filled out with [`hash_eos`]'s raw hash instead, so the final n-gram of every order still
/// starts at the last real word rather than being dropped. Matches `AddWordNgrams`, which
/// unconditionally appends the end-of-sentence hash before forming n-grams.
#[must_use]
pub fn text_to_hashes(
    input: &[i32], config: &crate::config::LexConfig, word_ngrams: u32, bucket: u32,
) -> Vec<i32> {
    let spans: Vec<Span> = scan(input, config).into_iter().filter(|s| s.has_tag(WORD_TAG)).collect();
    let word_hashes: Vec<u32> = spans.iter().map(|s| raw_hash(&input[s.from..s.to])).collect();

    let mut out = Vec::with_capacity(word_hashes.len() * word_ngrams.max(1) as usize);
    for &h in &word_hashes {
        out.push((h % bucket) as i32);
    }
    if word_ngrams >= 2 {
        let eos = raw_hash(EOS);
        for n in 2..=word_ngrams as usize {
            let mut padded = word_hashes.clone();
            padded.extend(core::iter::repeat(eos).take(n - 1));
            for window in padded.windows(n) {
                let mut mixed = window[0];
                for &h in &window[1..] {
                    mixed = mix_ngram(mixed, h);
                }
                out.push((mixed % bucket) as i32);
            }
        }
    }
    out
}

/// Collapses every maximal run of whitespace code points (per [`is_whitespace`]) to a single
/// ASCII space, and trims leading/trailing whitespace, matching `NormalizeSpaces`. Returns the
/// normalized code points and, for each output position, the input index it was derived from.
pub fn normalize_spaces(input: &[i32]) -> (Vec<i32>, Vec<usize>) {
    let mut out = Vec::with_capacity(input.len());
    let mut offsets = Vec::with_capacity(input.len());
    let mut i = 0usize;
    while i < input.len() && is_whitespace(input[i]) {
        i += 1;
    }
    let mut last_was_space = false;
    while i < input.len() {
        if is_whitespace(input[i]) {
            if !last_was_space {
                out.push(' ' as i32);
                offsets.push(i);
                last_was_space = true;
            }
        } else {
            out.push(input[i]);
            offsets.push(i);
            last_was_space = false;
        }
        i += 1;
    }
    while out.last() == Some(&(' ' as i32)) {
        out.pop();
        offsets.pop();
    }
    (out, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_spaces_collapses_and_trims() {
        let input: Vec<i32> = "  a   b  c ".chars().map(|c| c as i32).collect();
        let (out, _) = normalize_spaces(&input);
        let s: alloc::string::String = out.into_iter().map(|c| char::from_u32(c as u32).unwrap()).collect();
        assert_eq!(s, "a b c");
    }

    #[test]
    fn normalize_spaces_is_idempotent() {
        let input: Vec<i32> = "a  b\tc\u{00a0}d".chars().map(|c| c as i32).collect();
        let (once, _) = normalize_spaces(&input);
        let (twice, _) = normalize_spaces(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn hash_word_is_deterministic() {
        let word: Vec<i32> = "ok".chars().map(|c| c as i32).collect();
        assert_eq!(hash_word(&word, 2_000_000), hash_word(&word, 2_000_000));
    }

    #[test]
    fn eos_hash_is_constant_for_bucket() {
        assert_eq!(hash_eos(2_000_000), hash_eos(2_000_000));
    }
}
