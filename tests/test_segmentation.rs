mod common;

use common::unigram_dictionary;
use packfsm::segment::unigram;

// These exercise the unigram-LM DP directly (rather than through `Model::text_to_ids`, which
// prepends `U+2581` ahead of this engine) since `unigram_dictionary`'s toy model matches raw
// letters, not a marked buffer.

#[test]
fn unigram_best_segmentation_prefers_lower_total_score() {
    let dict = unigram_dictionary();
    let input = vec!['a' as i32, 'b' as i32];
    let pieces = unigram::segment(&dict, &input).unwrap();
    assert_eq!(pieces, vec![unigram::Piece { from: 0, to: 2, id: 1 }]);
}

#[test]
fn unigram_falls_back_on_uncovered_input() {
    let dict = unigram_dictionary();
    let input = vec!['a' as i32, 'z' as i32];
    let pieces = unigram::segment(&dict, &input).unwrap();
    // "z" matches nothing, so the DP never reaches the end of input: one fallback span for the
    // whole input, not a patched-together partial cover.
    assert_eq!(pieces, vec![unigram::Piece { from: 0, to: 2, id: -1 }]);
}

#[test]
fn bpe_linear_and_heap_variants_agree_on_real_input() {
    use packfsm::automaton::builder::{array, mealy_dfa, multi_map};
    use packfsm::config::{DictConfig, FsmType, TokAlgo};
    use packfsm::segment::bpe;

    let dfa = mealy_dfa(
        6,
        0,
        vec![
            (0, 'a' as i32, 1, 10),
            (0, 'b' as i32, 2, 11),
            (0, 'c' as i32, 3, 12),
            (1, 'b' as i32, 4, 0),
            (4, 'c' as i32, 5, 1),
        ],
        &[1, 2, 3, 4, 5],
    );
    let k2i = array(vec![0, 1, 2, 3, 4]);
    let i2info = multi_map(5, vec![
        (0, vec![100, 1, 0]),
        (1, vec![100, 1, 0]),
        (2, vec![100, 1, 0]),
        (3, vec![0, 2, 0]),
        (4, vec![1, 3, 0]),
    ]);
    let dict =
        DictConfig::new(FsmType::MealyDfa, None, Some(dfa), k2i, i2info, None, TokAlgo::Bpe, -1)
            .unwrap();
    let input = vec!['a' as i32, 'b' as i32, 'c' as i32];
    assert_eq!(bpe::encode_linear(&dict, &input).unwrap(), bpe::encode_heap(&dict, &input).unwrap());
}
