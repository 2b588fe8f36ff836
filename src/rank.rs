//! # Rank — Lexicographic Unranking and Ranking
//!
//! Maps a zero-based rank to the row at that position of the lexicographic
//! enumeration without visiting its predecessors, and back. This is what
//! lets a caller resume generation mid-stream or split a space into
//! independent contiguous rank ranges for parallel workers.
//!
//! One construction covers every `(order, repetition)` mode: walk the row
//! left to right, and at each position scan candidate elements in
//! lexicographic order, subtracting the exact count of completions each
//! candidate roots until the residual rank falls inside one. For plain
//! combinations the completion counts collapse to binomial coefficients
//! (the combinatorial number system), for permutations to falling
//! factorials (the Lehmer code), for unlimited repetition to multichoose /
//! base-n digits, and for frequency mode to the bounded multiset counts.
//!
//! Everything is iterative: worst-case state is the row itself plus a
//! capacity vector, never a call stack proportional to `m`.

use rug::Integer;

use crate::count;
use crate::error::{Error, Result};
use crate::params::{self, GenerationSpec, Order, Repetition, ValueSet};

/// Per-element usage ceilings implied by the repetition mode. For unlimited
/// repetition the row length itself is the only bound.
fn capacities(vs: &ValueSet, spec: &GenerationSpec) -> Vec<u32> {
    match spec.repetition {
        Repetition::None => vec![1; vs.len()],
        Repetition::Unlimited => vec![spec.m.max(1) as u32; vs.len()],
        Repetition::Frequency => vs.freqs.clone().unwrap_or_default(),
    }
}

/// Lowest candidate index admissible at the next position, given the
/// prefix: combinations are non-decreasing (strictly increasing without
/// repetition), permutations restart at zero.
fn start_index(spec: &GenerationSpec, prefix: &[usize]) -> usize {
    match (spec.order, spec.repetition) {
        (Order::Permutation, _) => 0,
        (Order::Combination, Repetition::None) => prefix.last().map_or(0, |&p| p + 1),
        (Order::Combination, _) => prefix.last().copied().unwrap_or(0),
    }
}

/// Exact number of completions rooted at `chosen` (already recorded in
/// `usage`) with `slots` positions still open.
fn completions(
    spec: &GenerationSpec,
    caps: &[u32],
    usage: &[u32],
    chosen: usize,
    slots: usize,
) -> Integer {
    let n = caps.len();
    match (spec.order, spec.repetition) {
        // Strictly increasing suffix from the elements above `chosen`.
        (Order::Combination, Repetition::None) => {
            count::binomial((n - 1 - chosen) as u64, slots as u64)
        }
        // Non-decreasing suffix over the elements at or above `chosen`.
        (Order::Combination, Repetition::Unlimited) => {
            count::multichoose((n - chosen) as u64, slots as u64)
        }
        (Order::Combination, Repetition::Frequency) => {
            let rem: Vec<u32> = (chosen..n).map(|i| caps[i] - usage[i]).collect();
            count::multiset_combinations(&rem, slots)
        }
        (Order::Permutation, Repetition::None) => {
            let avail = caps
                .iter()
                .zip(usage)
                .filter(|&(&c, &u)| u < c)
                .count() as u64;
            count::permutations(avail, slots as u64)
        }
        (Order::Permutation, Repetition::Unlimited) => count::power(n as u64, slots as u64),
        (Order::Permutation, Repetition::Frequency) => {
            let rem: Vec<u32> = caps.iter().zip(usage).map(|(&c, &u)| c - u).collect();
            count::multiset_permutations(&rem, slots)
        }
    }
}

/// The index row at zero-based `rank` of the lexicographic enumeration.
///
/// Fails with `InvalidArgument` if `rank` is at or beyond the total count.
pub fn unrank(vs: &ValueSet, spec: &GenerationSpec, rank: u64) -> Result<Vec<usize>> {
    params::validate(vs, spec, None)?;
    let total = count::total(vs, spec);
    if total <= rank {
        return Err(Error::arg(format!(
            "rank {} out of range for a space of {} rows",
            rank, total
        )));
    }

    let n = vs.len();
    let m = spec.m;
    let caps = capacities(vs, spec);
    let mut usage = vec![0u32; n];
    let mut remaining = rank;
    let mut row = Vec::with_capacity(m);

    for pos in 0..m {
        let slots = m - pos - 1;
        let start = start_index(spec, &row);
        let mut placed = false;
        for c in start..n {
            if usage[c] >= caps[c] {
                continue;
            }
            usage[c] += 1;
            let below = completions(spec, &caps, &usage, c, slots);
            // A subtree bigger than u64::MAX can never be stepped over by a
            // u64 rank, so the residual necessarily lands inside it.
            match below.to_u64() {
                Some(cnt) if cnt <= remaining => {
                    remaining -= cnt;
                    usage[c] -= 1;
                }
                _ => {
                    row.push(c);
                    placed = true;
                    break;
                }
            }
        }
        if !placed {
            // Unreachable once rank < total, kept as a hard error rather
            // than a panic at the library boundary.
            return Err(Error::arg("rank walk exhausted candidates"));
        }
    }
    Ok(row)
}

/// Zero-based lexicographic rank of an index row, the inverse of `unrank`.
/// Returned as an exact integer: ranks of representable rows can exceed the
/// materializable row-count range.
pub fn rank(vs: &ValueSet, spec: &GenerationSpec, row: &[usize]) -> Result<Integer> {
    params::validate(vs, spec, None)?;
    validate_row(vs, spec, row)?;

    let caps = capacities(vs, spec);
    let mut usage = vec![0u32; vs.len()];
    let mut r = Integer::new();

    for (pos, &chosen) in row.iter().enumerate() {
        let slots = row.len() - pos - 1;
        let start = start_index(spec, &row[..pos]);
        for c in start..chosen {
            if usage[c] >= caps[c] {
                continue;
            }
            usage[c] += 1;
            r += completions(spec, &caps, &usage, c, slots);
            usage[c] -= 1;
        }
        usage[chosen] += 1;
    }
    Ok(r)
}

/// Structural checks on a caller-supplied row: arity, index range, the
/// ordering discipline of combinations, and per-element capacities.
fn validate_row(vs: &ValueSet, spec: &GenerationSpec, row: &[usize]) -> Result<()> {
    if row.len() != spec.m {
        return Err(Error::arg(format!(
            "row length {} does not match arity {}",
            row.len(),
            spec.m
        )));
    }
    if let Some(&bad) = row.iter().find(|&&i| i >= vs.len()) {
        return Err(Error::arg(format!(
            "row index {} out of bounds for {} values",
            bad,
            vs.len()
        )));
    }
    if spec.order == Order::Combination {
        let ordered = match spec.repetition {
            Repetition::None => row.windows(2).all(|w| w[0] < w[1]),
            _ => row.windows(2).all(|w| w[0] <= w[1]),
        };
        if !ordered {
            return Err(Error::arg("combination row must be ordered"));
        }
    }
    let caps = capacities(vs, spec);
    let mut usage = vec![0u32; vs.len()];
    for &i in row {
        usage[i] += 1;
        if usage[i] > caps[i] {
            return Err(Error::arg(format!(
                "row uses element {} beyond its multiplicity",
                i
            )));
        }
    }
    Ok(())
}
