//! Combination generation and the streaming emission pipeline.

use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam::channel::{bounded, Sender};
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;

use super::perm::Permutations;

/// Remove from `augmented` every element already present in `base`, and
/// drop duplicates within `augmented` itself, preserving first-seen order.
///
/// This is what `--partial-deduplicate` requests (§4.3.4): without the
/// flag, a rule-augmented word that happens to equal an original target
/// word is allowed to reach the pipeline a second time through the
/// augmented slot, so [`dedupe_augmented`] is used instead.
pub fn prepare_augmented(base: &[Vec<u8>], augmented: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let base_set: HashSet<&Vec<u8>> = base.iter().collect();
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut out = Vec::new();
    for word in augmented {
        if base_set.contains(word) {
            continue;
        }
        if seen.insert(word.clone()) {
            out.push(word.clone());
        }
    }
    out
}

/// Drop duplicates within `augmented`, without removing overlap with
/// `base` (the §4.3.1 generator still requires an internally-deduplicated
/// `B`; only the base-overlap removal is gated by `--partial-deduplicate`).
pub fn dedupe_augmented(augmented: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut out = Vec::new();
    for word in augmented {
        if seen.insert(word.clone()) {
            out.push(word.clone());
        }
    }
    out
}

fn position_subsets(l: usize, k: usize) -> Vec<Vec<usize>> {
    fn backtrack(start: usize, l: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..l {
            current.push(i);
            backtrack(i + 1, l, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    backtrack(0, l, k, &mut current, &mut out);
    out
}

fn place(positions: &[usize], bperm: &[Vec<u8>], aperm: &[Vec<u8>], l: usize) -> Vec<Vec<u8>> {
    let mut slots: Vec<Option<Vec<u8>>> = vec![None; l];
    for (i, &p) in positions.iter().enumerate() {
        slots[p] = Some(bperm[i].clone());
    }
    let mut ai = 0;
    for slot in slots.iter_mut() {
        if slot.is_none() {
            slot.replace(aperm[ai].clone());
            ai += 1;
        }
    }
    slots.into_iter().map(|s| s.unwrap()).collect()
}

/// The combination generator for one output length `l`.
///
/// When `augmented` is non-empty, every combination draws at least one
/// element from it (ruled combinations, §4.3.1). Otherwise plain ordered
/// subsets of `base` are produced.
pub fn combinations_for_length<'a>(
    base: &'a [Vec<u8>],
    augmented: &'a [Vec<u8>],
    l: usize,
) -> Box<dyn Iterator<Item = Vec<Vec<u8>>> + 'a> {
    if augmented.is_empty() {
        return Box::new(Permutations::new(base, l));
    }

    let na = base.len();
    let nb = augmented.len();
    let max_k = l.min(nb);

    let iter = (1..=max_k)
        .filter(move |&k| l.saturating_sub(k) <= na)
        .flat_map(move |k| {
            let positions = position_subsets(l, k);
            positions.into_iter().flat_map(move |pos| {
                let pos_for_inner = pos.clone();
                Permutations::new(augmented, k).flat_map(move |bperm| {
                    let pos2 = pos_for_inner.clone();
                    let bperm2 = bperm.clone();
                    complement_perms(base, l - k)
                        .map(move |aperm| place(&pos2, &bperm2, &aperm, l))
                })
            })
        });

    Box::new(iter)
}

/// The `l - k` elements of `base` filling the positions not claimed by the
/// augmented permutation. Unlike the top-level ordered-subset generator
/// (where a request for length 0 is meaningless and yields nothing), a
/// remainder of 0 here is the ordinary "no base elements needed" case and
/// must contribute exactly one (empty) arrangement, or combinations that
/// are entirely drawn from the augmented side would be silently dropped.
fn complement_perms(base: &[Vec<u8>], k: usize) -> Box<dyn Iterator<Item = Vec<Vec<u8>>> + '_> {
    if k == 0 {
        Box::new(std::iter::once(Vec::new()))
    } else {
        Box::new(Permutations::new(base, k))
    }
}

/// Join a combination's fields with `separator`.
pub fn join_combination(combo: &[Vec<u8>], separator: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, field) in combo.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(separator);
        }
        out.extend_from_slice(field);
    }
    out
}

/// Insert `word` at every position `0..=combo.len()` of `combo`, joining
/// each resulting line with `separator` and a trailing `\n`.
pub fn emit_insertions(combo: &[Vec<u8>], word: &[u8], separator: &[u8], out: &mut Vec<u8>) {
    for pos in 0..=combo.len() {
        let mut line = Vec::with_capacity(word.len() + combo.iter().map(|f| f.len()).sum::<usize>() + 8);
        for (i, field) in combo[..pos].iter().enumerate() {
            if i > 0 {
                line.extend_from_slice(separator);
            }
            line.extend_from_slice(field);
        }
        if pos > 0 {
            line.extend_from_slice(separator);
        }
        line.extend_from_slice(word);
        if pos < combo.len() {
            line.extend_from_slice(separator);
        }
        for (i, field) in combo[pos..].iter().enumerate() {
            if i > 0 {
                line.extend_from_slice(separator);
            }
            line.extend_from_slice(field);
        }
        line.push(b'\n');
        out.extend_from_slice(&line);
    }
}

/// Parameters controlling one pipeline run.
pub struct PipelineArgs<'a> {
    pub base: &'a [Vec<u8>],
    pub augmented: &'a [Vec<u8>],
    pub min_target: usize,
    pub max_target: usize,
    pub self_combination: bool,
    pub separator: &'a [u8],
    pub wordlists: &'a [Vec<Vec<u8>>],
    pub skip: u64,
    pub limit: Option<u64>,
    pub workers: usize,
}

/// Run the combinator pipeline, writing formatted lines to `writer`.
///
/// Producer work (building lines for one word x one combination-length)
/// is fanned out across a rayon thread pool sized to `workers`; a single
/// consumer drains a bounded channel and owns the buffered writer, so
/// output ordering per (length, word, combination, position) quadruple is
/// deterministic even though interleaving across producer tasks is not.
pub fn run_pipeline<W: Write + Send>(args: PipelineArgs<'_>, writer: &mut W) -> Result<()> {
    let emitted = Arc::new(AtomicU64::new(0));
    let skipped = Arc::new(AtomicU64::new(0));

    let (tx, rx) = bounded::<Vec<u8>>(4096);

    let writer_handle = std::thread::scope(|scope| {
        let consumer = scope.spawn(move || -> Result<()> {
            let mut buffered = std::io::BufWriter::with_capacity(1 << 20, writer);
            for line in rx {
                buffered.write_all(&line)?;
            }
            buffered.flush()?;
            Ok(())
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers.max(1))
            .build()
            .expect("failed to build worker pool");

        pool.install(|| -> Result<()> {
            for l in args.min_target..=args.max_target {
                debug!(length = l, "entering target-subset length");

                if args.self_combination {
                    for combo in combinations_for_length(args.base, args.augmented, l) {
                        if should_skip(&skipped, args.skip) {
                            continue;
                        }
                        if limit_reached(&emitted, args.limit) {
                            break;
                        }
                        let mut line = join_combination(&combo, args.separator);
                        line.push(b'\n');
                        emitted.fetch_add(1, Ordering::Relaxed);
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                }

                for (wi, wordlist) in args.wordlists.iter().enumerate() {
                    debug!(length = l, wordlist_index = wi, "processing wordlist");
                    let limit = args.limit;
                    let skip = args.skip;
                    let tx = tx.clone();
                    let skipped = skipped.clone();
                    wordlist.par_iter().for_each(|word| {
                        if limit_reached(&emitted, limit) {
                            return;
                        }
                        for combo in combinations_for_length(args.base, args.augmented, l) {
                            if should_skip(&skipped, skip) {
                                continue;
                            }
                            if limit_reached(&emitted, limit) {
                                break;
                            }
                            let mut out = Vec::new();
                            emit_insertions(&combo, word, args.separator, &mut out);
                            emitted.fetch_add((l + 1) as u64, Ordering::Relaxed);
                            let _ = tx.send(out);
                        }
                    });
                }
            }
            Ok(())
        })?;

        drop(tx);
        consumer.join().expect("writer thread panicked")
    });

    writer_handle
}

fn limit_reached(emitted: &Arc<AtomicU64>, limit: Option<u64>) -> bool {
    match limit {
        Some(l) => emitted.load(Ordering::Relaxed) >= l,
        None => false,
    }
}

fn should_skip(skipped: &Arc<AtomicU64>, skip: u64) -> bool {
    if skip == 0 {
        return false;
    }
    let prev = skipped.fetch_add(1, Ordering::Relaxed);
    prev < skip
}
