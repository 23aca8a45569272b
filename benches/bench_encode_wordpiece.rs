use criterion::{black_box, criterion_group, criterion_main, Criterion};
use packfsm::automaton::builder::{array, multi_map, rs_dfa};
use packfsm::config::{DictConfig, Direction, FsmType, LexConfig, TokAlgo};
use packfsm::limits::WORD_TAG;
use packfsm::Model;

const MAX_WORD_LEN: u32 = 16;

/// A word breaker whose final states double as `tok_algo = NONE`'s subtoken source: state `i`
/// (reached after `i` letters) is final and tagged `WORD_TAG` plus `i` one-codepoint subtokens,
/// so every matched word is fully covered letter-by-letter without a separate dictionary walk.
fn word_breaker_with_embedded_subtokens() -> LexConfig {
    let mut edges = Vec::new();
    for state in 0..MAX_WORD_LEN {
        for c in b'a'..=b'z' {
            edges.push((state, c as i32, state + 1));
        }
    }
    let dfa = rs_dfa(MAX_WORD_LEN + 1, 0, edges, &(1..=MAX_WORD_LEN).collect::<Vec<_>>());
    let tags = multi_map(
        MAX_WORD_LEN + 1,
        (1..=MAX_WORD_LEN)
            .map(|state| {
                let mut out = vec![WORD_TAG];
                for _ in 0..state {
                    out.push(0);
                    out.push(1);
                }
                (state, out)
            })
            .collect(),
    );
    LexConfig::new(dfa, tags, None, false, Direction::LeftToRight)
}

fn empty_none_dict() -> DictConfig {
    DictConfig::new(
        FsmType::RsDfa,
        Some(rs_dfa(1, 0, vec![], &[])),
        None,
        array(vec![]),
        multi_map(0, vec![]),
        None,
        TokAlgo::None,
        -1,
    )
    .unwrap()
}

fn bench(c: &mut Criterion) {
    let model = Model::empty()
        .with_word_breaker(word_breaker_with_embedded_subtokens())
        .with_dictionary(empty_none_dict());
    let text = "the quick brown fox jumps over the lazy dog repeatedly and again and again";
    c.bench_function("encode_wordpiece", |b| {
        b.iter(|| model.text_to_ids(black_box(text)).unwrap());
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
