//! Packed model image and section directory.
//!
//! The image is a contiguous immutable byte blob with a header mapping section ids to byte
//! ranges. Every reader in [`crate::automaton`] borrows directly from this image; nothing here
//! ever copies section payloads.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::error::LoadError;

/// Enumerated section ids understood by this crate.
///
/// Mirrors `FAFsmConst::FUNC_WBD` / `FUNC_POS_DICT` in the reference implementation. Unknown ids
/// encountered in a directory are preserved as [`SectionId::Unknown`] so that models carrying
/// sections this crate does not interpret can still be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    /// Word-breaking configuration (a lexical DFA plus `State2Ow`).
    Wbd,
    /// Sentence-breaking configuration (a lexical DFA plus `State2Ow`).
    Sbd,
    /// Dictionary configuration for subword segmentation (`pos-dict`).
    PosDict,
    /// A section id not understood by this crate.
    Unknown(u32),
}
impl SectionId {
    const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Wbd,
            1 => Self::PosDict,
            2 => Self::Sbd,
            other => Self::Unknown(other),
        }
    }

    const fn to_raw(self) -> u32 {
        match self {
            Self::Wbd => 0,
            Self::PosDict => 1,
            Self::Sbd => 2,
            Self::Unknown(raw) => raw,
        }
    }
}

const HEADER_MAGIC: &[u8; 4] = b"PFSM";
/// Bytes per directory entry: section id, offset, size (`u32::MAX` as size means absent).
const HEADER_ENTRY_SIZE_BYTES: usize = 4 + 4 + 4;

/// A single directory entry: a section id and its byte range within the image, if present.
#[derive(Debug, Clone, Copy)]
struct DirectoryEntry {
    id:     SectionId,
    offset: usize,
    size:   Option<usize>,
}

/// A contiguous immutable byte blob with a header mapping section ids to byte ranges.
///
/// Constructed once by [`Image::from_bytes`] or [`Image::load`] (file-backed, `std` only); every
/// accessor borrows from the image for its lifetime and never writes to it.
#[derive(Debug)]
pub struct Image<'a> {
    bytes:     Cow<'a, [u8]>,
    directory: Vec<DirectoryEntry>,
}
impl<'a> Image<'a> {
    /// Parses an image from an in-memory byte slice, borrowing it for the image's lifetime.
    ///
    /// Layout: 4-byte magic `"PFSM"`, `u32` entry count, then that many directory entries of
    /// `(section id: u32, offset: u32, size: u32 where `u32::MAX` denotes an absent section)`,
    /// followed by the concatenated section payloads.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, LoadError> {
        Self::parse(Cow::Borrowed(bytes))
    }

    /// Parses an image from an owned byte buffer.
    pub fn from_owned(bytes: Vec<u8>) -> Result<Self, LoadError> {
        Self::parse(Cow::Owned(bytes))
    }

    /// Loads an image from a file on disk.
    ///
    /// The reference implementation's loader memory-maps the file; we read it into memory
    /// instead, since memory-mapping is an external collaborator concern out of scope for this
    /// crate (see `DESIGN.md`). Callers that need zero-copy loading can mmap themselves and pass
    /// the resulting slice to [`Image::from_bytes`].
    #[cfg(feature = "std")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::from_owned(bytes)
    }

    fn parse(bytes: Cow<'a, [u8]>) -> Result<Self, LoadError> {
        if bytes.len() < 4 + 4 {
            return Err(LoadError::ImageTooShort(bytes.len()));
        }
        if &bytes[0..4] != HEADER_MAGIC {
            return Err(LoadError::MalformedDirectory("bad magic".into()));
        }
        let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let header_len = 8 + count * HEADER_ENTRY_SIZE_BYTES;
        if bytes.len() < header_len {
            return Err(LoadError::ImageTooShort(bytes.len()));
        }
        let mut directory = Vec::with_capacity(count);
        for i in 0..count {
            let base = 8 + i * HEADER_ENTRY_SIZE_BYTES;
            let raw_id = u32::from_le_bytes(bytes[base..base + 4].try_into().unwrap());
            let raw_off = u32::from_le_bytes(bytes[base + 4..base + 8].try_into().unwrap());
            let raw_size = u32::from_le_bytes(bytes[base + 8..base + 12].try_into().unwrap());
            let size = if raw_size == u32::MAX { None } else { Some(raw_size as usize) };
            if let Some(size) = size {
                let end = raw_off as usize + size;
                if end > bytes.len() {
                    return Err(LoadError::MalformedDirectory(alloc::format!(
                        "section {raw_id} out of bounds ({end} > {})",
                        bytes.len()
                    )));
                }
            }
            directory.push(DirectoryEntry {
                id: SectionId::from_raw(raw_id),
                offset: raw_off as usize,
                size,
            });
        }
        Ok(Self { bytes, directory })
    }

    /// Returns the byte range of `id`, or `None` if the section is absent from this image.
    #[must_use]
    pub fn get_section(&self, id: SectionId) -> Option<&[u8]> {
        self.directory.iter().find(|entry| entry.id.to_raw() == id.to_raw()).and_then(|entry| {
            entry.size.map(|size| &self.bytes[entry.offset..entry.offset + size])
        })
    }

    /// Returns whether `id` is present in this image.
    #[must_use]
    pub fn has_section(&self, id: SectionId) -> bool {
        self.get_section(id).is_some()
    }
}
