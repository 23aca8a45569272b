//! Error types for every fallible boundary in the crate.

use alloc::string::String;

/// Errors encountered while loading a model image.
#[non_exhaustive]
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum LoadError {
    /// The image is shorter than a valid header requires.
    #[cfg_attr(feature = "std", error("image too short: {0} bytes"))]
    ImageTooShort(usize),
    /// The section directory is malformed (overlapping or out-of-bounds ranges).
    #[cfg_attr(feature = "std", error("malformed section directory: {0}"))]
    MalformedDirectory(String),
    /// A required section is absent from the image.
    #[cfg_attr(feature = "std", error("required section absent: {0:?}"))]
    SectionAbsent(crate::image::SectionId),
    /// A section's payload failed to parse as the expected packed structure.
    #[cfg_attr(feature = "std", error("malformed section {0:?}: {1}"))]
    MalformedSection(crate::image::SectionId, String),
    /// The configuration derived from the image failed to validate.
    #[cfg_attr(feature = "std", error("invalid config: {0}"))]
    InvalidConfig(#[cfg_attr(feature = "std", from)] ConfigError),
    /// Reading the model file failed.
    #[cfg(feature = "std")]
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered while validating a [`crate::config::DictConfig`].
#[non_exhaustive]
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ConfigError {
    /// `tok_algo` requires a dictionary section that is not present.
    #[cfg_attr(feature = "std", error("tok_algo {0:?} requires a dictionary automaton"))]
    MissingDictionary(crate::config::TokAlgo),
    /// The encoder and scores have mismatched lengths (unigram-LM dictionaries only).
    #[cfg_attr(feature = "std", error("score count does not match dictionary output count"))]
    InvalidScores,
}

/// Errors encountered while running one of the public operations.
#[non_exhaustive]
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ProcessError {
    /// The input is empty where a non-empty input is required, or its length is otherwise invalid.
    #[cfg_attr(feature = "std", error("invalid input length"))]
    InvalidLength,
    /// The input exceeds [`crate::limits::MAX_ARR_SIZE`].
    #[cfg_attr(feature = "std", error("input too large"))]
    InputTooLarge,
    /// The input is not valid UTF-8.
    #[cfg_attr(feature = "std", error("invalid utf-8 at byte {0}"))]
    InvalidUtf8(usize),
    /// An intermediate buffer would have to exceed its pre-sized bound.
    #[cfg_attr(feature = "std", error("scratch buffer exhausted"))]
    ScratchExhausted,
    /// The model does not have the section required for this operation.
    #[cfg_attr(feature = "std", error("model has no {0:?} section"))]
    SectionAbsent(crate::image::SectionId),
    /// The DFA walk produced an inconsistent span count (not a multiple of 3).
    #[cfg_attr(feature = "std", error("malformed span output"))]
    MalformedOutput,
}
