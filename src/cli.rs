//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: constraint
//! parsing, engine dispatch, JSON serialization of results, and rayon pool
//! configuration. Results go to stdout as one JSON document; logs go to
//! stderr via `tracing`.

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{info, warn};

use combinatrix::generate::count_rows;
use combinatrix::{
    divisors, factorize, primes, totient, Aggregate, Comparator, ConstraintSpec, GenerateOptions,
    GenerationSpec, Limit, Order, Repetition, ValueSet,
};

use super::ComboArgs;

// ── Rayon Pool ──────────────────────────────────────────────────────────

/// Size the global rayon pool. Zero leaves rayon's default (all logical
/// cores) in place.
pub fn configure_rayon(threads: usize) {
    if threads == 0 {
        return;
    }
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        Ok(()) => info!(threads, "rayon pool configured"),
        Err(e) => warn!(error = %e, "could not configure rayon thread pool"),
    }
}

// ── Output Shapes ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct RowsOut {
    rows: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aggregates: Option<Vec<f64>>,
    complete: bool,
}

#[derive(Serialize)]
struct CountOut {
    /// Exact count, as a decimal string; totals routinely exceed u64.
    count: String,
}

#[derive(Serialize)]
struct PrimesOut {
    primes: Vec<u64>,
}

#[derive(Serialize)]
struct DivisorCountOut {
    divisor_counts: Vec<u64>,
}

#[derive(Serialize)]
struct DivisorsOut {
    divisors: Vec<Vec<u64>>,
}

#[derive(Serialize)]
struct FactorizeOut {
    factorizations: Vec<Vec<(u64, u32)>>,
}

#[derive(Serialize)]
struct TotientOut {
    totients: Vec<u64>,
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

// ── Combinatorics ───────────────────────────────────────────────────────

fn parse_aggregate(name: &str) -> Result<Aggregate> {
    Ok(match name {
        "sum" => Aggregate::Sum,
        "prod" => Aggregate::Prod,
        "mean" => Aggregate::Mean,
        "max" => Aggregate::Max,
        "min" => Aggregate::Min,
        other => bail!("unknown aggregate '{}' (sum, prod, mean, max, min)", other),
    })
}

fn parse_comparator(name: &str) -> Result<Comparator> {
    Ok(match name {
        "lt" => Comparator::Lt,
        "gt" => Comparator::Gt,
        "le" => Comparator::Le,
        "ge" => Comparator::Ge,
        "eq" => Comparator::Eq,
        "between" => Comparator::Between,
        other => bail!("unknown comparator '{}' (lt, gt, le, ge, eq, between)", other),
    })
}

fn parse_constraint(args: &ComboArgs) -> Result<Option<ConstraintSpec>> {
    match (args.aggregate.as_deref(), args.comparator.as_deref()) {
        (None, None) => {
            if args.limit.is_some() || args.limit2.is_some() {
                bail!("--limit requires --aggregate and --comparator");
            }
            Ok(None)
        }
        (Some(a), Some(c)) => {
            let aggregate = parse_aggregate(a)?;
            let comparator = parse_comparator(c)?;
            let limit = match (comparator, args.limit, args.limit2) {
                (Comparator::Between, Some(lo), Some(hi)) => Limit::Pair(lo, hi),
                (Comparator::Between, _, _) => {
                    bail!("comparator 'between' requires --limit and --limit2")
                }
                (_, Some(l), None) => Limit::Scalar(l),
                (_, _, Some(_)) => bail!("--limit2 is only valid with comparator 'between'"),
                (_, None, None) => bail!("a constraint requires --limit"),
            };
            Ok(Some(ConstraintSpec::new(aggregate, comparator, limit)))
        }
        _ => bail!("a constraint requires both --aggregate and --comparator"),
    }
}

pub fn run_combinatorics(args: &ComboArgs, order: Order, pretty: bool) -> Result<()> {
    let (value_set, repetition) = match (&args.freqs, args.repetition) {
        (Some(_), true) => bail!("--freqs and --repetition are mutually exclusive"),
        (Some(freqs), false) => (
            ValueSet::with_freqs(args.values.clone(), freqs.clone()),
            Repetition::Frequency,
        ),
        (None, true) => (ValueSet::new(args.values.clone()), Repetition::Unlimited),
        (None, false) => (ValueSet::new(args.values.clone()), Repetition::None),
    };
    let spec = GenerationSpec::new(args.arity, repetition, order);
    let constraint = parse_constraint(args)?;

    if args.count_only {
        if constraint.is_some() {
            bail!("--count-only reports the unconstrained total; drop the constraint");
        }
        let total = count_rows(&value_set, &spec)?;
        return emit(
            &CountOut {
                count: total.to_string(),
            },
            pretty,
        );
    }

    let out = combinatrix::generate_with(
        &value_set,
        &spec,
        constraint.as_ref(),
        args.max_rows,
        GenerateOptions {
            keep_aggregate: args.keep_aggregate,
            start_rank: args.start_rank,
        },
    )?;
    info!(
        rows = out.rows.len(),
        complete = out.complete,
        "generation finished"
    );
    emit(
        &RowsOut {
            rows: out.rows,
            aggregates: out.aggregates,
            complete: out.complete,
        },
        pretty,
    )
}

// ── Number-Theory Oracles ───────────────────────────────────────────────

pub fn run_primes(lo: u64, hi: u64, pretty: bool) -> Result<()> {
    let primes = primes::primes_in_range(lo, hi)?;
    info!(lo, hi, count = primes.len(), "prime sweep finished");
    emit(&PrimesOut { primes }, pretty)
}

pub fn run_divisor_count(values: &[u64], pretty: bool) -> Result<()> {
    let divisor_counts = divisors::count_divisors_batch(values)?;
    emit(&DivisorCountOut { divisor_counts }, pretty)
}

pub fn run_divisors(values: &[u64], pretty: bool) -> Result<()> {
    let divisors = divisors::list_divisors_batch(values)?;
    emit(&DivisorsOut { divisors }, pretty)
}

pub fn run_factorize(values: &[u64], pretty: bool) -> Result<()> {
    let factorizations = factorize::prime_factorization_batch(values)?;
    emit(&FactorizeOut { factorizations }, pretty)
}

pub fn run_totient(values: &[u64], pretty: bool) -> Result<()> {
    let totients = totient::euler_phi_batch(values)?;
    emit(&TotientOut { totients }, pretty)
}
