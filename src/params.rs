//! # Params — Typed Generation and Constraint Specifications
//!
//! Defines the value-owned inputs to the combinatorial generator: the source
//! `ValueSet` (with optional per-position frequencies), the `GenerationSpec`
//! (arity, repetition rule, combination vs. permutation), and the optional
//! `ConstraintSpec` (one aggregate, one comparator, a scalar or pair limit).
//! Serialized as tagged JSON for the CLI surface.
//!
//! Validation is eager and total: `validate()` checks every structural
//! invariant before any counting or enumeration work begins, so generation
//! never starts against ultimately-invalid input.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered source values, each an addressable slot. Two equal values at
/// different positions are distinguishable unless frequency mode collapses
/// them by construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValueSet {
    pub values: Vec<f64>,
    /// Per-position multiplicities for frequency mode. `None` everywhere else.
    pub freqs: Option<Vec<u32>>,
}

impl ValueSet {
    pub fn new(values: Vec<f64>) -> Self {
        ValueSet {
            values,
            freqs: None,
        }
    }

    pub fn with_freqs(values: Vec<f64>, freqs: Vec<u32>) -> Self {
        ValueSet {
            values,
            freqs: Some(freqs),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Repetition rule for the generated tuples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repetition {
    /// Each source position used at most once.
    None,
    /// Each source position may repeat without bound.
    Unlimited,
    /// Each source position may repeat up to its entry in `ValueSet::freqs`.
    Frequency,
}

/// Whether tuples are order-insensitive (combinations, emitted as
/// non-decreasing position sequences) or order-sensitive (permutations).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Combination,
    Permutation,
}

/// Arity + repetition + order. Together with a `ValueSet` this pins down the
/// full enumeration space and its lexicographic order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub m: usize,
    pub repetition: Repetition,
    pub order: Order,
}

impl GenerationSpec {
    pub fn new(m: usize, repetition: Repetition, order: Order) -> Self {
        GenerationSpec {
            m,
            repetition,
            order,
        }
    }
}

/// Aggregate functions in the closed constraint vocabulary. Dispatch is a
/// match at the row-evaluation site; monotonicity for pruning is established
/// once per variant, never per arbitrary user function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Sum,
    Prod,
    Mean,
    Max,
    Min,
}

impl Aggregate {
    /// Evaluate over a complete row.
    pub fn apply(self, row: &[f64]) -> f64 {
        match self {
            Aggregate::Sum => row.iter().sum(),
            Aggregate::Prod => row.iter().product(),
            Aggregate::Mean => {
                if row.is_empty() {
                    f64::NAN
                } else {
                    row.iter().sum::<f64>() / row.len() as f64
                }
            }
            Aggregate::Max => row.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Min => row.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// Comparators in the closed constraint vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Between,
}

/// Scalar limit for single-sided comparators, pair for `Between`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Scalar(f64),
    Pair(f64, f64),
}

/// One aggregate, one comparator, one limit. A row is emitted only if
/// `aggregate(row) comparator limit` holds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub aggregate: Aggregate,
    pub comparator: Comparator,
    pub limit: Limit,
}

impl ConstraintSpec {
    pub fn new(aggregate: Aggregate, comparator: Comparator, limit: Limit) -> Self {
        ConstraintSpec {
            aggregate,
            comparator,
            limit,
        }
    }

    /// The satisfied interval `[lo, hi]` of aggregate values, used both for
    /// final row acceptance and for interval-overlap pruning. `Lt`/`Gt` use
    /// half-open endpoints, tracked via `strict_lo`/`strict_hi`.
    pub(crate) fn interval(&self) -> Result<SatisfiedInterval> {
        let (lo, hi, strict_lo, strict_hi) = match (self.comparator, self.limit) {
            (Comparator::Lt, Limit::Scalar(l)) => (f64::NEG_INFINITY, l, false, true),
            (Comparator::Le, Limit::Scalar(l)) => (f64::NEG_INFINITY, l, false, false),
            (Comparator::Gt, Limit::Scalar(l)) => (l, f64::INFINITY, true, false),
            (Comparator::Ge, Limit::Scalar(l)) => (l, f64::INFINITY, false, false),
            (Comparator::Eq, Limit::Scalar(l)) => (l, l, false, false),
            (Comparator::Between, Limit::Pair(a, b)) => {
                if a > b {
                    return Err(Error::arg(format!(
                        "between limits out of order: {} > {}",
                        a, b
                    )));
                }
                (a, b, false, false)
            }
            (Comparator::Between, Limit::Scalar(_)) => {
                return Err(Error::arg("comparator 'between' requires a pair limit"))
            }
            (_, Limit::Pair(..)) => {
                return Err(Error::arg(
                    "pair limit is only valid with comparator 'between'",
                ))
            }
        };
        Ok(SatisfiedInterval {
            lo,
            hi,
            strict_lo,
            strict_hi,
        })
    }

    /// Does a complete row's aggregate value satisfy the constraint?
    pub fn accepts(&self, agg: f64) -> bool {
        match (self.comparator, self.limit) {
            (Comparator::Lt, Limit::Scalar(l)) => agg < l,
            (Comparator::Gt, Limit::Scalar(l)) => agg > l,
            (Comparator::Le, Limit::Scalar(l)) => agg <= l,
            (Comparator::Ge, Limit::Scalar(l)) => agg >= l,
            (Comparator::Eq, Limit::Scalar(l)) => agg == l,
            (Comparator::Between, Limit::Pair(a, b)) => agg >= a && agg <= b,
            // Shape mismatches are rejected by validate() before generation.
            _ => false,
        }
    }
}

/// Closed interval (possibly with strict endpoints) of accepted aggregate
/// values. Pruning asks whether the reachable aggregate interval of a
/// subtree intersects this at all.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SatisfiedInterval {
    pub lo: f64,
    pub hi: f64,
    pub strict_lo: bool,
    pub strict_hi: bool,
}

impl SatisfiedInterval {
    /// True if `[reach_lo, reach_hi]` cannot intersect the satisfied set, so
    /// every completion of the current prefix would be rejected.
    pub fn disjoint_from(&self, reach_lo: f64, reach_hi: f64) -> bool {
        if self.strict_hi {
            if reach_lo >= self.hi {
                return true;
            }
        } else if reach_lo > self.hi {
            return true;
        }
        if self.strict_lo {
            if reach_hi <= self.lo {
                return true;
            }
        } else if reach_hi < self.lo {
            return true;
        }
        false
    }
}

/// Validate a (value set, spec, constraint) triple. Everything structural is
/// checked here, before any sieve allocation or enumeration work.
pub fn validate(
    vs: &ValueSet,
    spec: &GenerationSpec,
    constraint: Option<&ConstraintSpec>,
) -> Result<()> {
    match spec.repetition {
        Repetition::Frequency => {
            let freqs = vs
                .freqs
                .as_ref()
                .ok_or_else(|| Error::arg("frequency mode requires a frequency vector"))?;
            if freqs.len() != vs.values.len() {
                return Err(Error::arg(format!(
                    "frequency vector length {} does not match value set length {}",
                    freqs.len(),
                    vs.values.len()
                )));
            }
            if freqs.iter().any(|&f| f == 0) {
                return Err(Error::arg("every frequency must be at least 1"));
            }
        }
        Repetition::None => {
            // An empty value set short-circuits to zero rows in the
            // generator, regardless of m.
            if !vs.is_empty() && spec.m > vs.len() {
                return Err(Error::arg(format!(
                    "arity {} exceeds source size {} without repetition",
                    spec.m,
                    vs.len()
                )));
            }
            if vs.freqs.is_some() {
                return Err(Error::arg(
                    "frequency vector is only valid in frequency mode",
                ));
            }
        }
        Repetition::Unlimited => {
            if vs.freqs.is_some() {
                return Err(Error::arg(
                    "frequency vector is only valid in frequency mode",
                ));
            }
        }
    }

    if let Some(c) = constraint {
        // Surfaces vocabulary mismatches (pair limit with a scalar
        // comparator and vice versa) before generation starts.
        c.interval()?;
    }
    Ok(())
}
