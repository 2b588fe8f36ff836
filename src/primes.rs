//! # Primes — Ranged Prime Enumeration
//!
//! `primes_in_range(lo, hi)` returns every prime in `[lo, hi]`, ascending.
//! Built on the segmented sieve: base primes up to sqrt(hi) are generated
//! once, then the target range is swept in fixed-width segments. Wide ranges
//! are split across the rayon pool: each worker owns a disjoint segment and
//! the per-segment results are concatenated in range order, so the output is
//! identical to a single-threaded sweep.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::sieve;

/// Width of one parallel work unit. Two million bits per segment keeps each
/// unit's bitmap well inside L2 while leaving enough units to occupy the
/// pool on 100M-wide spans.
const SEGMENT_WIDTH: u64 = 1 << 21;

/// All primes in `[lo, hi]`, ascending. `lo ≥ 1`, `lo ≤ hi`, and `hi` and
/// the span must sit below the configured ceilings.
pub fn primes_in_range(lo: u64, hi: u64) -> Result<Vec<u64>> {
    sieve::validate_range(lo, hi)?;
    let base = sieve::base_primes(sieve::isqrt(hi));

    if hi - lo < SEGMENT_WIDTH {
        return Ok(sieve::sieve_segment(&base, lo, hi));
    }

    let mut bounds = Vec::new();
    let mut start = lo;
    while start <= hi {
        let end = hi.min(start + SEGMENT_WIDTH - 1);
        bounds.push((start, end));
        start = end + 1;
    }
    debug!(lo, hi, segments = bounds.len(), "parallel segmented sweep");

    let per_segment: Vec<Vec<u64>> = bounds
        .par_iter()
        .map(|&(a, b)| sieve::sieve_segment(&base, a, b))
        .collect();
    Ok(per_segment.into_iter().flatten().collect())
}
