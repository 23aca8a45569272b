//! Crate-wide constants mirroring the reference implementation's fixed limits and reserved values.

/// Upper bound on the byte length of any single input buffer accepted by the public operations.
///
/// Mirrors `FALimits::MaxArrSize` in the reference implementation. Intermediate buffers derived
/// from an input (UTF-32, normalized, segmentation results) are sized from this bound, and any
/// computation that would need to exceed it fails with [`crate::error::ProcessError::InputTooLarge`]
/// or [`crate::error::ProcessError::ScratchExhausted`].
pub const MAX_ARR_SIZE: usize = 100_000_000;

/// Tag marking a top-level word span emitted by the lexical tokenizer.
pub const WORD_TAG: i32 = 1;

/// Tag marking a span the caller should skip (unmatched input advanced by one position).
pub const IGNORE_TAG: i32 = 4;

/// SentencePiece word-initial marker, "LOWER ONE EIGHTH BLOCK".
pub const SP_DELIMITER: i32 = 0x2581;

/// Returns whether the given code point belongs to the whitespace class used throughout
/// sentence/word breaking and space normalization.
#[inline]
#[must_use]
pub const fn is_whitespace(c: i32) -> bool {
    c <= 0x20
        || c == 0xa0
        || (c >= 0x2000 && c <= 0x200f)
        || c == 0x202f
        || c == 0x205f
        || c == 0x2060
        || c == 0x2420
        || c == 0x2424
        || c == 0x3000
        || c == 0xfeff
}
