//! Public facade: the operations an embedding application calls.
//!
//! Mirrors the dispatch functions in `blingfiretokdll.cpp` — `TextToSentencesWithOffsetsWithModel`,
//! `TextToWordsWithOffsetsWithModel`, `TextToIdsWithOffsets` (`wp`/`sp`/unigram variants),
//! `NormalizeSpaces`, `TextToHashes` — behind one typed `Model` instead of a C ABI with raw
//! pointers and an explicit `LoadModel`/`FreeModel` pair. Each span-producing operation returns
//! byte offsets into the original UTF-8 input, having internally walked UTF-32 and projected back.

use alloc::string::String;
use alloc::vec::Vec;

use crate::charsmap::PackedCharMap;
use crate::config::{DictConfig, LexConfig, TokAlgo};
use crate::error::{LoadError, ProcessError};
use crate::hashing;
use crate::image::{Image, SectionId};
use crate::lexer::{self, Span};
use crate::limits::{MAX_ARR_SIZE, SP_DELIMITER, WORD_TAG};
use crate::segment::{bpe, unigram};
use crate::utf::{self, project_span};

/// A loaded model: any combination of a word breaker, a sentence breaker, and a subword
/// dictionary, each optional since a given packed image may carry only the sections its use case
/// needs (mirrors `FADictConfKeeper`'s all-optional accessors).
#[derive(Debug, Clone, Default)]
pub struct Model {
    word_breaker:     Option<LexConfig>,
    sentence_breaker: Option<LexConfig>,
    dictionary:       Option<DictConfig>,
}
impl Model {
    /// Returns the crate's version string, mirroring `GetBlingFireTokVersion`.
    #[must_use]
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Constructs an empty model with no sections loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every section present in a packed [`Image`] this crate understands.
    ///
    /// Unlike the reference implementation's `LoadModel`, which takes a raw byte pointer and
    /// length and returns an opaque handle, this returns an owned, typed `Model` with no lifetime
    /// tied to the input buffer beyond this call.
    #[cfg(feature = "serialization")]
    pub fn load(image: &Image<'_>) -> Result<Self, LoadError> {
        let word_breaker = image.get_section(SectionId::Wbd).map(LexConfig::from_bytes).transpose()?;
        let sentence_breaker =
            image.get_section(SectionId::Sbd).map(LexConfig::from_bytes).transpose()?;
        let dictionary = image.get_section(SectionId::PosDict).map(DictConfig::from_bytes).transpose()?;
        Ok(Self { word_breaker, sentence_breaker, dictionary })
    }

    #[must_use]
    pub fn with_word_breaker(mut self, config: LexConfig) -> Self {
        self.word_breaker = Some(config);
        self
    }

    #[must_use]
    pub fn with_sentence_breaker(mut self, config: LexConfig) -> Self {
        self.sentence_breaker = Some(config);
        self
    }

    #[must_use]
    pub fn with_dictionary(mut self, config: DictConfig) -> Self {
        self.dictionary = Some(config);
        self
    }

    fn decode(text: &str) -> (Vec<i32>, Vec<usize>) {
        let mut cps = Vec::new();
        let mut offs = Vec::new();
        // utf8_to_utf32 never fails on a `&str`, which is already guaranteed valid UTF-8.
        let _ = utf::utf8_to_utf32(text, &mut cps, &mut offs);
        (cps, offs)
    }

    /// Decodes `text` to code points with byte offsets and, if `char_map` is configured, runs
    /// normalization and composes the two offset vectors into one mapping normalized code-point
    /// index back to original byte offset — the "D then optional C" stage of the pipeline.
    fn decode_and_normalize(
        text: &str, char_map: Option<&PackedCharMap>,
    ) -> Result<(Vec<i32>, Vec<usize>), ProcessError> {
        let (cps, offs) = Self::decode(text);
        match char_map {
            Some(map) if !map.is_empty() => {
                let mut normalized = Vec::new();
                let mut norm_offs = Vec::new();
                map.normalize(&cps, &mut normalized, &mut norm_offs)?;
                let composed = norm_offs.iter().map(|&i| offs[i]).collect();
                Ok((normalized, composed))
            }
            _ => Ok((cps, offs)),
        }
    }

    fn check_len(text: &str) -> Result<(), ProcessError> {
        if text.len() > MAX_ARR_SIZE {
            return Err(ProcessError::InputTooLarge);
        }
        Ok(())
    }

    /// Splits `text` into sentences, returning one `(start, end)` byte span per sentence.
    pub fn text_to_sentences(&self, text: &str) -> Result<Vec<(usize, usize)>, ProcessError> {
        Self::check_len(text)?;
        let config = self
            .sentence_breaker
            .as_ref()
            .ok_or(ProcessError::SectionAbsent(SectionId::Sbd))?;
        let (cps, offs) = Self::decode_and_normalize(text, config.char_map())?;
        let spans = lexer::scan(&cps, config);
        Ok(word_spans_to_byte_ranges(&spans, &offs, text, WORD_TAG))
    }

    /// Splits `text` into words, returning one `(start, end)` byte span per word (spans tagged
    /// [`IGNORE_TAG`] — unmatched input — are dropped).
    pub fn text_to_words(&self, text: &str) -> Result<Vec<(usize, usize)>, ProcessError> {
        Self::check_len(text)?;
        let config =
            self.word_breaker.as_ref().ok_or(ProcessError::SectionAbsent(SectionId::Wbd))?;
        let (cps, offs) = Self::decode_and_normalize(text, config.char_map())?;
        let spans = lexer::scan(&cps, config);
        Ok(word_spans_to_byte_ranges(&spans, &offs, text, WORD_TAG))
    }

    /// Segments `text` into dictionary ids, with byte offsets, dispatching on the dictionary's
    /// configured [`TokAlgo`] the way `TextToIdsWithOffsets` dispatches on `GetTokAlgo()`:
    /// `TokAlgo::None` runs the word breaker directly and reads WordPiece-style subtoken coverage
    /// off its spans (`TextToIdsWithOffsets_wp`); every other variant prepends `U+2581`, collapses
    /// whitespace, and runs the matching segmentation engine (`TextToIdsWithOffsets_sp`).
    pub fn text_to_ids(
        &self, text: &str,
    ) -> Result<Vec<(i32, usize, usize)>, ProcessError> {
        Self::check_len(text)?;
        let dict =
            self.dictionary.as_ref().ok_or(ProcessError::SectionAbsent(SectionId::PosDict))?;
        let (cps, offs) = Self::decode_and_normalize(text, dict.char_map())?;

        match dict.tok_algo() {
            TokAlgo::None => word_piece_ids(self, dict, &cps, &offs, text),
            TokAlgo::UnigramLm => segmented_ids(dict, &cps, &offs, text, unigram::segment, |p| {
                (p.id, p.from, p.to)
            }),
            TokAlgo::Bpe => {
                segmented_ids(dict, &cps, &offs, text, bpe::encode_linear, |p| (p.id, p.from, p.to))
            }
            TokAlgo::BpeOpt => {
                segmented_ids(dict, &cps, &offs, text, bpe::encode_heap, |p| (p.id, p.from, p.to))
            }
        }
    }

    /// Collapses runs of whitespace to single ASCII spaces and trims the ends, mirroring
    /// `NormalizeSpaces`.
    #[must_use]
    pub fn normalize_spaces(text: &str) -> String {
        let (cps, _offs) = Self::decode(text);
        let (normalized, _norm_offsets) = hashing::normalize_spaces(&cps);
        let mut out = String::with_capacity(normalized.len());
        for &cp in &normalized {
            if let Some(ch) = char::from_u32(cp as u32) {
                out.push(ch);
            }
        }
        out
    }

    /// Computes fastText-compatible hashes over the words in `text`, mirroring `TextToHashes`.
    pub fn text_to_hashes(
        &self, text: &str, word_ngrams: u32, bucket: u32,
    ) -> Result<Vec<i32>, ProcessError> {
        Self::check_len(text)?;
        let config =
            self.word_breaker.as_ref().ok_or(ProcessError::SectionAbsent(SectionId::Wbd))?;
        let (cps, _offs) = Self::decode_and_normalize(text, config.char_map())?;
        Ok(hashing::text_to_hashes(&cps, config, word_ngrams, bucket))
    }
}

fn word_spans_to_byte_ranges(
    spans: &[Span], offsets: &[usize], text: &str, tag: i32,
) -> Vec<(usize, usize)> {
    spans
        .iter()
        .filter(|s| s.has_tag(tag))
        .map(|s| project_span(offsets, text, s.from, s.to))
        .collect()
}

/// WordPiece (`tok_algo = NONE`): words are found with the word breaker, and each WORD span's
/// subtoken coverage is read directly off the spans the word breaker already emitted (a state with
/// multiple outputs tiles its match with dictionary-id subtokens, per the "subtoken emission" rule
/// in `DESIGN.md`) — no POS_DICT automaton walk happens in this mode. A word whose subtokens don't
/// tile it exactly (gaps, or no subtoken output at all) falls back to a single
/// [`DictConfig::unk_id`] piece for the whole word, matching `TextToIdsWithOffsets_wp`.
fn word_piece_ids(
    model: &Model, dict: &DictConfig, cps: &[i32], offs: &[usize], text: &str,
) -> Result<Vec<(i32, usize, usize)>, ProcessError> {
    let word_breaker =
        model.word_breaker.as_ref().ok_or(ProcessError::SectionAbsent(SectionId::Wbd))?;
    let spans = lexer::scan(cps, word_breaker);
    let mut out = Vec::new();
    for span in spans.iter().filter(|s| s.has_tag(WORD_TAG)) {
        let covers_exactly = !span.subtokens.is_empty()
            && span.subtokens[0].from == span.from
            && span.subtokens.last().is_some_and(|s| s.to == span.to)
            && span.subtokens.windows(2).all(|w| w[0].to == w[1].from);
        if covers_exactly {
            for sub in &span.subtokens {
                let (s, e) = project_span(offs, text, sub.from, sub.to);
                out.push((sub.id, s, e));
            }
        } else {
            let (s, e) = project_span(offs, text, span.from, span.to);
            out.push((dict.unk_id(), s, e));
        }
    }
    Ok(out)
}

/// Prepends `U+2581` to every word-initial position and collapses whitespace runs to a single
/// marker, matching the preprocessing `TextToIdsWithOffsets_sp` runs ahead of both the unigram-LM
/// and BPE engines. Returns the marked buffer plus, for each marked position, the `cps` index it
/// was derived from.
fn mark_word_starts(cps: &[i32]) -> (Vec<i32>, Vec<usize>) {
    let (normalized, norm_offsets) = hashing::normalize_spaces(cps);
    let mut marked = Vec::with_capacity(normalized.len() + 8);
    let mut marked_offsets = Vec::with_capacity(normalized.len() + 8);
    let mut at_word_start = true;
    for (i, &cp) in normalized.iter().enumerate() {
        if cp == ' ' as i32 {
            at_word_start = true;
            continue;
        }
        if at_word_start {
            marked.push(SP_DELIMITER);
            marked_offsets.push(norm_offsets[i]);
            at_word_start = false;
        }
        marked.push(cp);
        marked_offsets.push(norm_offsets[i]);
    }
    (marked, marked_offsets)
}

/// Unigram-LM/BPE/BPE_OPT (`tok_algo != NONE`): applies [`mark_word_starts`]'s preprocessing, runs
/// `segment` over the marked buffer, and projects each resulting piece's marked-buffer span back
/// to a byte range in the original text. `project` extracts `(id, from, to)` from whichever
/// concrete piece type `segment` returns (`unigram::Piece` or `bpe::Piece`), so this one function
/// serves all three algorithms.
fn segmented_ids<P>(
    dict: &DictConfig, cps: &[i32], offs: &[usize], text: &str,
    segment: impl Fn(&DictConfig, &[i32]) -> Result<Vec<P>, ProcessError>,
    project: impl Fn(P) -> (i32, usize, usize),
) -> Result<Vec<(i32, usize, usize)>, ProcessError> {
    let (marked, marked_offsets) = mark_word_starts(cps);
    let pieces = segment(dict, &marked)?;
    Ok(pieces
        .into_iter()
        .map(|p| {
            let (id, from, to) = project(p);
            let mfrom = marked_offsets.get(from).copied().unwrap_or(0);
            let mto = marked_offsets.get(to.saturating_sub(1)).map_or(mfrom, |&i| i + 1);
            let (s, e) = project_span(offs, text, mfrom, mto);
            (id, s, e)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::builder::{array, mealy_dfa, multi_map, rs_dfa};
    use crate::config::{Direction, FsmType};

    fn word_breaker_letters() -> LexConfig {
        // accepts one-or-more ASCII letters.
        let mut edges = Vec::new();
        for c in b'a'..=b'z' {
            edges.push((0u32, c as i32, 1u32));
            edges.push((1u32, c as i32, 1u32));
        }
        let dfa = rs_dfa(2, 0, edges, &[1]);
        let tags = multi_map(2, alloc::vec![(1, alloc::vec![WORD_TAG])]);
        LexConfig::new(dfa, tags, None, false, Direction::LeftToRight)
    }

    #[test]
    fn text_to_words_skips_punctuation() {
        let model = Model::empty().with_word_breaker(word_breaker_letters());
        let words = model.text_to_words("hi, there").unwrap();
        let texts: Vec<&str> = words.iter().map(|&(s, e)| &"hi, there"[s..e]).collect();
        assert_eq!(texts, alloc::vec!["hi", "there"]);
    }

    #[test]
    fn text_to_ids_without_dictionary_errors() {
        let model = Model::empty();
        assert!(matches!(
            model.text_to_ids("hi"),
            Err(ProcessError::SectionAbsent(SectionId::PosDict))
        ));
    }

    #[test]
    fn normalize_spaces_public_api() {
        assert_eq!(Model::normalize_spaces("  a   b  "), "a b");
    }

    #[test]
    fn word_breaker_char_map_runs_before_lexing() {
        use crate::charsmap::builder::char_map;

        // normalizes "ß" to "ss" before the word breaker (which only knows plain ASCII letters)
        // ever sees the text; offsets must still project back to the original "ß" byte span.
        let map = char_map(alloc::vec![(alloc::vec!['ß' as i32], alloc::vec!['s' as i32, 's' as i32])]);
        let dfa = {
            let mut edges = Vec::new();
            for c in b'a'..=b'z' {
                edges.push((0u32, c as i32, 1u32));
                edges.push((1u32, c as i32, 1u32));
            }
            rs_dfa(2, 0, edges, &[1])
        };
        let tags = multi_map(2, alloc::vec![(1, alloc::vec![WORD_TAG])]);
        let word_breaker = LexConfig::new(dfa, tags, Some(map), false, Direction::LeftToRight);
        let model = Model::empty().with_word_breaker(word_breaker);

        let text = "gro\u{00df}e stra\u{00df}e";
        let words = model.text_to_words(text).unwrap();
        let texts: Vec<&str> = words.iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(texts, alloc::vec!["gro\u{00df}e", "stra\u{00df}e"]);
    }

    #[test]
    fn unigram_dispatch_end_to_end() {
        // the dictionary must match the `U+2581`-prefixed marked buffer `text_to_ids` builds for
        // every tok_algo other than `None`, not the raw input.
        use crate::limits::SP_DELIMITER;
        let dfa = mealy_dfa(
            4,
            0,
            alloc::vec![(0, SP_DELIMITER, 1, 0), (1, 'h' as i32, 2, 0), (2, 'i' as i32, 3, 5)],
            &[3],
        );
        let k2i = array(alloc::vec![0]);
        let i2info = multi_map(1, alloc::vec![(0, alloc::vec![10, 3, 0])]);
        let dict = DictConfig::new(
            FsmType::MealyDfa,
            None,
            Some(dfa),
            k2i,
            i2info,
            None,
            TokAlgo::UnigramLm,
            -1,
        )
        .unwrap();
        let model = Model::empty().with_dictionary(dict);
        let ids = model.text_to_ids("hi").unwrap();
        assert_eq!(ids, alloc::vec![(0, 0, 2)]);
    }

    #[test]
    fn none_mode_reads_subtoken_spans_from_word_breaker() {
        // state 2 is the final state for "hi", tagged WORD_TAG plus two one-codepoint subtokens
        // tiling it — the WBD-embedded-subtoken mechanism `tok_algo = NONE` relies on.
        let dfa = rs_dfa(3, 0, alloc::vec![(0, 'h' as i32, 1), (1, 'i' as i32, 2)], &[2]);
        let tags = multi_map(3, alloc::vec![(2, alloc::vec![WORD_TAG, 7, 1, 8, 1])]);
        let word_breaker = LexConfig::new(dfa, tags, None, false, Direction::LeftToRight);
        let dict = DictConfig::new(
            FsmType::RsDfa,
            Some(rs_dfa(1, 0, alloc::vec![], &[])),
            None,
            array(alloc::vec![]),
            multi_map(0, alloc::vec![]),
            None,
            TokAlgo::None,
            -1,
        )
        .unwrap();
        let model = Model::empty().with_word_breaker(word_breaker).with_dictionary(dict);
        let ids = model.text_to_ids("hi").unwrap();
        assert_eq!(ids, alloc::vec![(7, 0, 1), (8, 1, 2)]);
    }

    #[test]
    fn none_mode_falls_back_to_unk_on_gapped_coverage() {
        // only one subtoken is declared for a two-codepoint match: the coverage has a gap, so
        // the whole word must fall back to a single `unk_id` piece.
        let dfa = rs_dfa(3, 0, alloc::vec![(0, 'h' as i32, 1), (1, 'i' as i32, 2)], &[2]);
        let tags = multi_map(3, alloc::vec![(2, alloc::vec![WORD_TAG, 7, 1])]);
        let word_breaker = LexConfig::new(dfa, tags, None, false, Direction::LeftToRight);
        let dict = DictConfig::new(
            FsmType::RsDfa,
            Some(rs_dfa(1, 0, alloc::vec![], &[])),
            None,
            array(alloc::vec![]),
            multi_map(0, alloc::vec![]),
            None,
            TokAlgo::None,
            -1,
        )
        .unwrap();
        let model = Model::empty().with_word_breaker(word_breaker).with_dictionary(dict);
        let ids = model.text_to_ids("hi").unwrap();
        assert_eq!(ids, alloc::vec![(-1, 0, 2)]);
    }

    #[test]
    fn bpe_and_bpe_opt_agree_through_the_public_api() {
        // the dictionary has no entry for the `U+2581` marker `text_to_ids` prepends; it just
        // rides along as its own UNK part and doesn't affect the "abc" merges below.
        let dfa = mealy_dfa(
            6,
            0,
            alloc::vec![
                (0, 'a' as i32, 1, 10),
                (0, 'b' as i32, 2, 11),
                (0, 'c' as i32, 3, 12),
                (1, 'b' as i32, 4, 0),
                (4, 'c' as i32, 5, 1),
            ],
            &[1, 2, 3, 4, 5],
        );
        let k2i = array(alloc::vec![0, 1, 2, 3, 4]);
        let i2info = multi_map(5, alloc::vec![
            (0, alloc::vec![100, 1, 0]),
            (1, alloc::vec![100, 1, 0]),
            (2, alloc::vec![100, 1, 0]),
            (3, alloc::vec![0, 2, 0]),
            (4, alloc::vec![1, 3, 0]),
        ]);
        let bpe_dict = DictConfig::new(
            FsmType::MealyDfa, None, Some(dfa.clone()), k2i.clone(), i2info.clone(), None,
            TokAlgo::Bpe, -1,
        )
        .unwrap();
        let bpe_opt_dict = DictConfig::new(
            FsmType::MealyDfa, None, Some(dfa), k2i, i2info, None, TokAlgo::BpeOpt, -1,
        )
        .unwrap();
        let bpe_ids = Model::empty().with_dictionary(bpe_dict).text_to_ids("abc").unwrap();
        let bpe_opt_ids = Model::empty().with_dictionary(bpe_opt_dict).text_to_ids("abc").unwrap();
        assert_eq!(bpe_ids, bpe_opt_ids);
    }
}
