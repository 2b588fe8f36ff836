//! # Divisors — Counts and Full Divisor Lists
//!
//! `count_divisors` answers d(n) via one linear-pass sieve array;
//! `list_divisors` materializes the full ascending divisor list by expanding
//! the prime-power sub-combinations of n's factorization. Batched forms
//! build exactly ONE sieve sized to the maximum input, the amortization
//! that justifies a sieve over per-value trial division.

use rayon::prelude::*;

use crate::error::Result;
use crate::sieve::SieveTable;
use crate::validate_oracle_inputs;

/// d(n): the number of divisors of `n ≥ 1`.
pub fn count_divisors(n: u64) -> Result<u64> {
    Ok(count_divisors_batch(&[n])?[0])
}

/// d(n) for every input, one shared sieve sized to the maximum.
pub fn count_divisors_batch(ns: &[u64]) -> Result<Vec<u64>> {
    let bound = validate_oracle_inputs(ns)?;
    if ns.is_empty() {
        return Ok(Vec::new());
    }
    let table = SieveTable::build(bound)?;
    let d = table.divisor_counts();
    Ok(ns.iter().map(|&n| d[n as usize] as u64).collect())
}

/// All divisors of `n ≥ 1`, ascending. Always contains 1 and n.
pub fn list_divisors(n: u64) -> Result<Vec<u64>> {
    Ok(list_divisors_batch(&[n])?.pop().unwrap_or_default())
}

/// Divisor lists for every input, one shared sieve sized to the maximum;
/// per-element expansion is independent, so it runs on the rayon pool with
/// input order preserved.
pub fn list_divisors_batch(ns: &[u64]) -> Result<Vec<Vec<u64>>> {
    let bound = validate_oracle_inputs(ns)?;
    if ns.is_empty() {
        return Ok(Vec::new());
    }
    let table = SieveTable::build(bound)?;
    Ok(ns
        .par_iter()
        .map(|&n| divisors_from_factors(&table.factorize(n)))
        .collect())
}

/// Expand a `(prime, exponent)` factorization into the sorted divisor list:
/// every product of prime-power sub-combinations.
fn divisors_from_factors(factors: &[(u64, u32)]) -> Vec<u64> {
    let mut divisors = vec![1u64];
    for &(p, e) in factors {
        let prior = divisors.len();
        let mut pk = 1u64;
        for _ in 0..e {
            pk *= p;
            for i in 0..prior {
                divisors.push(divisors[i] * pk);
            }
        }
    }
    divisors.sort_unstable();
    divisors
}
