//! UTF-8 <-> UTF-32 codec with parallel offset tracking.
//!
//! Every decode/encode keeps an index alongside each code point/byte recording where it came from
//! in the other representation, so that spans computed over UTF-32 buffers (lexing, segmentation)
//! can be projected back to byte offsets in the original UTF-8 input without re-scanning it.
//!
//! Grounded on `blingfiretokdll.cpp`'s offset-carrying conversion helpers: every public operation
//! there returns both the transformed text and an array mapping each output unit back to an input
//! byte offset.

use alloc::vec::Vec;

use crate::error::ProcessError;

/// Decodes `input` into UTF-32 code points, appending them to `out` and, for each code point, the
/// byte offset in `input` it started at to `offsets`.
pub fn utf8_to_utf32(
    input: &str, out: &mut Vec<i32>, offsets: &mut Vec<usize>,
) -> Result<(), ProcessError> {
    for (byte_offset, ch) in input.char_indices() {
        out.push(ch as i32);
        offsets.push(byte_offset);
    }
    Ok(())
}

/// Encodes `input` (UTF-32 code points) back to UTF-8, appending bytes to `out` and, for each
/// output byte, the code-point index in `input` it came from to `offsets`.
///
/// Fails with [`ProcessError::InvalidUtf8`] if a value is not a valid Unicode scalar value.
pub fn utf32_to_utf8(
    input: &[i32], out: &mut alloc::string::String, offsets: &mut Vec<usize>,
) -> Result<(), ProcessError> {
    for (i, &cp) in input.iter().enumerate() {
        let ch = char::from_u32(cp as u32).ok_or(ProcessError::InvalidUtf8(i))?;
        let start = out.len();
        out.push(ch);
        for _ in start..out.len() {
            offsets.push(i);
        }
    }
    Ok(())
}

/// Returns the byte length of the UTF-8 encoding of a single code point.
#[inline]
#[must_use]
pub fn utf8_char_size(cp: i32) -> usize {
    match cp as u32 {
        0x0000..=0x007F => 1,
        0x0080..=0x07FF => 2,
        0x0800..=0xFFFF => 3,
        _ => 4,
    }
}

/// Projects a span `(from, to)` over a UTF-32 buffer (code-point indices, `to` exclusive) to a
/// byte span over the original UTF-8 input, using the offset vector produced by
/// [`utf8_to_utf32`]. `to == offsets.len()` (end of buffer) projects to the end of `input`.
#[must_use]
pub fn project_span(offsets: &[usize], input: &str, from: usize, to: usize) -> (usize, usize) {
    let start = offsets.get(from).copied().unwrap_or(input.len());
    let end = offsets.get(to).copied().unwrap_or(input.len());
    (start, end)
}
