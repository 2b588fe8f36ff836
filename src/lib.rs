//! # combinatrix — Constrained Enumeration and Sieve Oracles
//!
//! Two engines behind one crate:
//!
//! - **Constrained combinatorial generation** (`generate`, `rank`, `count`,
//!   `params`): combinations and permutations over a value set, with or
//!   without repetition, with per-element multiplicities, optionally
//!   filtered by an aggregate constraint. Rows arrive in strict
//!   lexicographic order under a row cap with an explicit
//!   complete/truncated flag.
//! - **Number-theory oracles** (`primes`, `divisors`, `factorize`,
//!   `totient` over `sieve`): divisor counts and lists, prime
//!   factorizations, Euler's totient, and ranged prime enumeration, each
//!   call building exactly one sieve and owning all of its buffers.
//!
//! Every entry point is synchronous, deterministic, and side-effect-free
//! beyond its own output; independent callers can run concurrently without
//! coordination. Validation is eager: bad inputs fail before any sieve is
//! allocated or any row is walked.

pub mod count;
pub mod divisors;
pub mod error;
pub mod factorize;
pub mod generate;
pub mod params;
pub mod primes;
pub mod rank;
pub mod sieve;
pub mod totient;

pub use error::{Error, Result};
pub use generate::{generate, generate_with, GenerateOptions, RowSet};
pub use params::{
    Aggregate, Comparator, ConstraintSpec, GenerationSpec, Limit, Order, Repetition, ValueSet,
};

/// Check a batched oracle input (every element must be positive) and
/// return the sieve bound implied by the largest element (0 for an empty
/// batch, which every oracle short-circuits).
pub(crate) fn validate_oracle_inputs(ns: &[u64]) -> Result<u64> {
    if ns.contains(&0) {
        return Err(Error::InvalidArgument(
            "number-theory inputs must be positive".into(),
        ));
    }
    Ok(ns.iter().copied().max().unwrap_or(0))
}
