//! # Factorize — Prime Factorizations from the SPF Table
//!
//! Repeated division by the smallest-prime-factor entry resolves any n up to
//! the sieve bound in O(log n) divisions, yielding `(prime, exponent)` pairs
//! ascending by prime. The batched form builds one sieve for the whole
//! input, then factors each element independently on the rayon pool.

use rayon::prelude::*;

use crate::error::Result;
use crate::sieve::SieveTable;
use crate::validate_oracle_inputs;

/// Ordered prime factorization of `n ≥ 1`. `prime_factorization(1)` is empty.
pub fn prime_factorization(n: u64) -> Result<Vec<(u64, u32)>> {
    Ok(prime_factorization_batch(&[n])?.pop().unwrap_or_default())
}

/// Factorizations for every input, one shared sieve sized to the maximum.
pub fn prime_factorization_batch(ns: &[u64]) -> Result<Vec<Vec<(u64, u32)>>> {
    let bound = validate_oracle_inputs(ns)?;
    if ns.is_empty() {
        return Ok(Vec::new());
    }
    let table = SieveTable::build(bound)?;
    Ok(ns.par_iter().map(|&n| table.factorize(n)).collect())
}
