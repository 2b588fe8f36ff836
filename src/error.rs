//! # Error — Typed Failure Conditions at the Library Boundary
//!
//! Every fallible entry point returns `Result<T>` with one of a closed set of
//! error kinds. All validation is eager: a call either fails here before any
//! sieve allocation or enumeration starts, or it runs to completion. The one
//! partial-success state in the crate (row-cap truncation during generation)
//! is reported through `RowSet::complete`, not through an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input: bad arity, frequency vector mismatch, non-positive
    /// oracle input, unsupported constraint shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Range query with `lo > hi`.
    #[error("invalid range: lo {lo} > hi {hi}")]
    InvalidRange { lo: u64, hi: u64 },

    /// A combinatorial count or index does not fit the representable
    /// row-count type.
    #[error("overflow: {0}")]
    Overflow(String),

    /// The request would exceed the configured memory ceiling.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl Error {
    /// Shorthand used by the validators.
    pub(crate) fn arg(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
