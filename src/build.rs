//! In-memory assembler: turns a [`Definition`](crate::serialization::Definition) into a packed
//! [`Image`] byte buffer. Used only by tests and by tooling that produces model images; never by
//! the hot-path readers, which is why this whole module sits behind the `build` feature.
//!
//! Grounded on `kitoken`'s `src/serialization.rs`, which performs the analogous "plain
//! description -> packed runtime structure" conversion for its vocab/merges definitions.

use alloc::vec::Vec;

use crate::automaton::builder::{array, mealy_dfa, multi_map, rs_dfa};
use crate::charsmap::builder::char_map;
use crate::config::{DictConfig, Direction, FsmType, LexConfig, TokAlgo};
use crate::error::LoadError;
use crate::image::SectionId;
use crate::serialization::{DictDefinition, Definition, LexDefinition};

fn build_lex_config(def: &LexDefinition) -> LexConfig {
    let dfa = rs_dfa(def.state_count, def.initial, def.edges.clone(), &def.finals);
    let state_to_ow = multi_map(def.state_count, def.tags.clone());
    let charmap = def.char_map.clone().map(char_map);
    LexConfig::new(dfa, state_to_ow, charmap, def.ignore_case, def.direction)
}

fn build_dict_config(def: &DictDefinition) -> Result<DictConfig, LoadError> {
    let (rs, mealy) = match def.fsm_type {
        FsmType::RsDfa => {
            let edges = def.rs_edges.clone().unwrap_or_default();
            (Some(rs_dfa(def.state_count, def.initial, edges, &def.finals)), None)
        }
        FsmType::MealyDfa => {
            let edges = def.mealy_edges.clone().unwrap_or_default();
            (None, Some(mealy_dfa(def.state_count, def.initial, edges, &def.finals)))
        }
    };
    let k2i = array(def.k2i.clone());
    let i2info = multi_map(def.k2i.len() as u32, def.i2info.clone());
    let charmap = def.char_map.clone().map(char_map);
    DictConfig::new(def.fsm_type, rs, mealy, k2i, i2info, charmap, def.tok_algo, def.unk_id)
        .map_err(LoadError::InvalidConfig)
}

/// One section to be written into the image, as its id and already-encoded payload bytes.
struct Section {
    id:      SectionId,
    payload: Vec<u8>,
}

/// Builds the runtime [`LexConfig`]/[`DictConfig`] for every section present in `definition`, and
/// the packed image bytes that would reload them via [`crate::image::Image::from_bytes`] plus a
/// loader (see `DESIGN.md`'s note that the packed encode/decode round trip is exercised directly
/// through these in-memory structures in tests, rather than through a real on-disk format).
pub struct Built {
    pub word_breaker:     Option<LexConfig>,
    pub sentence_breaker: Option<LexConfig>,
    pub dictionary:       Option<DictConfig>,
    pub image:            Vec<u8>,
}

/// Assembles a [`Built`] model from a [`Definition`].
pub fn assemble(definition: &Definition) -> Result<Built, LoadError> {
    let word_breaker = definition.word_breaker.as_ref().map(build_lex_config);
    let sentence_breaker = definition.sentence_breaker.as_ref().map(build_lex_config);
    let dictionary = definition.dictionary.as_ref().map(build_dict_config).transpose()?;

    // The image stores the already-assembled packed structures, not the authoring-time
    // `Definition` — loading a section is then a plain deserialize with no rebuild step.
    let mut sections = Vec::new();
    if let Some(config) = &word_breaker {
        sections.push(Section {
            id:      SectionId::Wbd,
            payload: postcard::to_allocvec(config)
                .map_err(|e| LoadError::MalformedSection(SectionId::Wbd, alloc::format!("{e}")))?,
        });
    }
    if let Some(config) = &sentence_breaker {
        sections.push(Section {
            id:      SectionId::Sbd,
            payload: postcard::to_allocvec(config)
                .map_err(|e| LoadError::MalformedSection(SectionId::Sbd, alloc::format!("{e}")))?,
        });
    }
    if let Some(config) = &dictionary {
        sections.push(Section {
            id:      SectionId::PosDict,
            payload: postcard::to_allocvec(config).map_err(|e| {
                LoadError::MalformedSection(SectionId::PosDict, alloc::format!("{e}"))
            })?,
        });
    }

    let image = encode_image(&sections);
    Ok(Built { word_breaker, sentence_breaker, dictionary, image })
}

/// Encodes sections into the `"PFSM"` directory format read by [`crate::image::Image`].
fn encode_image(sections: &[Section]) -> Vec<u8> {
    let header_len = 8 + sections.len() * 12;
    let mut out = Vec::with_capacity(header_len + sections.iter().map(|s| s.payload.len()).sum::<usize>());
    out.extend_from_slice(b"PFSM");
    out.extend_from_slice(&(sections.len() as u32).to_le_bytes());
    let mut offset = header_len;
    for section in sections {
        out.extend_from_slice(&section_raw_id(section.id).to_le_bytes());
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        out.extend_from_slice(&(section.payload.len() as u32).to_le_bytes());
        offset += section.payload.len();
    }
    for section in sections {
        out.extend_from_slice(&section.payload);
    }
    out
}

fn section_raw_id(id: SectionId) -> u32 {
    match id {
        SectionId::Wbd => 0,
        SectionId::PosDict => 1,
        SectionId::Sbd => 2,
        SectionId::Unknown(raw) => raw,
    }
}

/// Convenience constructor for a single-rule, identity-direction [`LexDefinition`] with no
/// character map, for ad hoc tests.
#[must_use]
pub fn simple_lex_definition(
    state_count: u32, initial: u32, edges: Vec<(u32, i32, u32)>, finals: Vec<u32>,
    tags: Vec<(u32, Vec<i32>)>,
) -> LexDefinition {
    LexDefinition {
        state_count,
        initial,
        edges,
        finals,
        tags,
        char_map: None,
        ignore_case: false,
        direction: Direction::LeftToRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_word_breaker_and_round_trips_spans() {
        let def = Definition {
            word_breaker: Some(simple_lex_definition(
                2,
                0,
                alloc::vec![(0, 'a' as i32, 1), (1, 'a' as i32, 1)],
                alloc::vec![1],
                alloc::vec![(1, alloc::vec![crate::limits::WORD_TAG])],
            )),
            sentence_breaker: None,
            dictionary: None,
        };
        let built = assemble(&def).unwrap();
        let config = built.word_breaker.unwrap();
        let input = alloc::vec!['a' as i32, 'a' as i32];
        let spans = crate::lexer::scan(&input, &config);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].from, 0);
        assert_eq!(spans[0].to, 2);

        let image = crate::image::Image::from_bytes(&built.image).unwrap();
        assert!(image.has_section(SectionId::Wbd));
        assert!(!image.has_section(SectionId::PosDict));
    }
}
