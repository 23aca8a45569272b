//! **Finite-state tokenizer for packed DFA models.**
//!
//! Supports sentence/word breaking and WordPiece/Unigram-LM/BPE subword segmentation over models
//! distributed as packed, read-only automata. Usable in `no_std` environments with `alloc`.
//!
//! # Overview
//!
//! `packfsm` loads a model from a packed byte image ([`Image`]) and exposes it through [`Model`],
//! a typed facade over the word breaker, sentence breaker, and subword dictionary a given image
//! may carry. Every operation tracks offsets through each transformation layer (UTF-8 decode,
//! normalization, segmentation) so that results are always reported as byte spans into the
//! caller's original input, never into an internal UTF-32 buffer.
//!
//! See [`Model`] for the main entry point.
//!
//! # Examples
//!
//! ### Building a model in memory and tokenizing
//! ```
//! # fn main() {
//! use packfsm::automaton::builder::{multi_map, rs_dfa};
//! use packfsm::config::{Direction, LexConfig};
//! use packfsm::limits::WORD_TAG;
//! use packfsm::Model;
//!
//! let mut edges = Vec::new();
//! for c in b'a'..=b'z' {
//!     edges.push((0u32, c as i32, 1u32));
//!     edges.push((1u32, c as i32, 1u32));
//! }
//! let dfa = rs_dfa(2, 0, edges, &[1]);
//! let tags = multi_map(2, vec![(1, vec![WORD_TAG])]);
//! let word_breaker = LexConfig::new(dfa, tags, None, false, Direction::LeftToRight);
//!
//! let model = Model::empty().with_word_breaker(word_breaker);
//! let words = model.text_to_words("hello world").unwrap();
//! assert_eq!(words.len(), 2);
//! # }
//! ```
//!
//! # Cargo features
//!
//! ### Default features
//!
//! - `std`: Enables standard library features, including loading model images from files.
//! - `serialization`: Enables `serde`/`postcard`-based (de)serialization of the packed structures
//!   and the human-editable [`serialization::Definition`] format.
//!
//! ### Optional features
//!
//! - `build`: Enables [`build::assemble`], the in-memory assembler that turns a `Definition` into
//!   a packed [`Image`]. Used by tests and by tooling that produces model images; never needed by
//!   the hot-path readers.
//! - `unstable`: Reserved for features without a stability guarantee yet.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod automaton;
#[cfg(feature = "build")]
pub mod build;
pub mod charsmap;
pub mod config;
pub mod error;
mod facade;
pub mod hashing;
pub mod image;
pub mod lexer;
pub mod limits;
#[cfg(feature = "serialization")]
pub mod serialization;
pub mod segment;
pub mod utf;

pub use crate::error::{ConfigError, LoadError, ProcessError};
pub use crate::facade::Model;
pub use crate::image::{Image, SectionId};
