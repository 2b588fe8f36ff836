//! # Count — Exact Combinatorial Totals
//!
//! Exact row counts for every `(order, repetition)` mode: `C(n, m)`,
//! `P(n, m)`, their unlimited-repetition analogues, and the
//! frequency-bounded multiset analogues. All arithmetic is `rug::Integer`
//! (GMP), never floating point, so totals stay exact no matter how large the
//! space is. Narrowing to the `u64` row-count type happens only at the
//! materialization boundary and fails with `Overflow`, which is what governs
//! how large a row cap can legally be requested.
//!
//! The multiset counts use the standard bounded-composition recurrences:
//!
//! - combinations: `ways[j] += ways[j - t]` for `t ≤ min(f_i, j)` over items,
//! - permutations: `A[j] = Σ_t C(j, t) · A[j - t]`, the arrangement analogue
//!   (each item contributes `t` interchangeable copies into `j` slots).

use rug::ops::Pow;
use rug::Integer;

use crate::error::{Error, Result};
use crate::params::{GenerationSpec, Order, Repetition, ValueSet};

/// Binomial coefficient C(n, m), built incrementally so each intermediate
/// division is exact: C(n, i+1) = C(n, i) · (n - i) / (i + 1).
pub fn binomial(n: u64, m: u64) -> Integer {
    if m > n {
        return Integer::ZERO;
    }
    let m = m.min(n - m);
    let mut acc = Integer::from(1);
    for i in 0..m {
        acc *= n - i;
        acc /= i + 1;
    }
    acc
}

/// Falling factorial P(n, m) = n · (n-1) · … · (n-m+1).
pub fn permutations(n: u64, m: u64) -> Integer {
    if m > n {
        return Integer::ZERO;
    }
    let mut acc = Integer::from(1);
    for i in 0..m {
        acc *= n - i;
    }
    acc
}

/// Combinations with unlimited repetition: C(n + m - 1, m).
pub fn multichoose(n: u64, m: u64) -> Integer {
    if m == 0 {
        return Integer::from(1);
    }
    if n == 0 {
        return Integer::ZERO;
    }
    binomial(n + m - 1, m)
}

/// Permutations with unlimited repetition: n^m.
pub fn power(n: u64, m: u64) -> Integer {
    if m == 0 {
        return Integer::from(1);
    }
    Integer::from(n).pow(m as u32)
}

/// Number of size-`m` multisets drawable from items with capacities `caps`.
pub fn multiset_combinations(caps: &[u32], m: usize) -> Integer {
    let mut ways = vec![Integer::ZERO; m + 1];
    ways[0] = Integer::from(1);
    for &cap in caps {
        // The in-place descending-j trick only works for 0/1 items; a
        // capacity of `cap` contributes up to `cap` copies, so build fresh.
        let mut next = vec![Integer::ZERO; m + 1];
        for j in 0..=m {
            let take_max = (cap as usize).min(j);
            for t in 0..=take_max {
                next[j] += &ways[j - t];
            }
        }
        ways = next;
    }
    ways.pop().unwrap_or(Integer::ZERO)
}

/// Number of length-`m` ordered sequences drawable from items with
/// capacities `caps` (multiset permutations of partial length).
pub fn multiset_permutations(caps: &[u32], m: usize) -> Integer {
    let mut arr = vec![Integer::ZERO; m + 1];
    arr[0] = Integer::from(1);
    for &cap in caps {
        let mut next = vec![Integer::ZERO; m + 1];
        for j in 0..=m {
            let take_max = (cap as usize).min(j);
            for t in 0..=take_max {
                // C(j, t) ways to place this item's t copies among j slots.
                next[j] += binomial(j as u64, t as u64) * &arr[j - t];
            }
        }
        arr = next;
    }
    arr.pop().unwrap_or(Integer::ZERO)
}

/// Exact total row count for a (value set, spec) pair. `m = 0` is one empty
/// row; an empty value set with `m > 0` is zero rows.
pub fn total(vs: &ValueSet, spec: &GenerationSpec) -> Integer {
    let n = vs.len() as u64;
    let m = spec.m as u64;
    if m == 0 {
        return Integer::from(1);
    }
    if n == 0 {
        return Integer::ZERO;
    }
    match (spec.order, spec.repetition) {
        (Order::Combination, Repetition::None) => binomial(n, m),
        (Order::Combination, Repetition::Unlimited) => multichoose(n, m),
        (Order::Combination, Repetition::Frequency) => {
            multiset_combinations(vs.freqs.as_deref().unwrap_or(&[]), spec.m)
        }
        (Order::Permutation, Repetition::None) => permutations(n, m),
        (Order::Permutation, Repetition::Unlimited) => power(n, m),
        (Order::Permutation, Repetition::Frequency) => {
            multiset_permutations(vs.freqs.as_deref().unwrap_or(&[]), spec.m)
        }
    }
}

/// Narrow an exact total to the representable row-count type.
pub fn to_row_count(total: &Integer) -> Result<u64> {
    total.to_u64().ok_or_else(|| {
        Error::Overflow(format!(
            "combinatorial count {} exceeds the u64 row-count type",
            total
        ))
    })
}
