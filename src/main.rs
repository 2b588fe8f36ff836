//! # Main — CLI Entry Point
//!
//! Routes subcommands to the two engines and prints results as JSON on
//! stdout (logs go to stderr, so output stays pipeable). One subcommand per
//! operation:
//!
//! - `combinations` / `permutations`: constrained lexicographic
//!   enumeration, with optional aggregate constraint, row cap, frequency
//!   vector, mid-stream resumption, and count-only mode.
//! - `primes`: segmented prime enumeration over `[lo, hi]`.
//! - `divisor-count`, `divisors`, `factorize`, `totient`: batched
//!   sieve-backed oracles.
//!
//! ## Global Options
//!
//! - `--threads`: rayon pool size (0 = all logical cores).
//! - `--pretty`: indent the JSON output.
//! - `LOG_FORMAT=json`: structured JSON logs instead of human-readable.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "combinatrix",
    about = "Constrained combinatorial enumeration and sieve-based number theory"
)]
struct Cli {
    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long, global = true, default_value_t = 0)]
    threads: usize,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::Args)]
struct ComboArgs {
    /// Source values, comma-separated
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    values: Vec<f64>,

    /// Row arity m
    #[arg(long)]
    arity: usize,

    /// Allow unlimited repetition of each value
    #[arg(long)]
    repetition: bool,

    /// Per-value multiplicities (frequency mode), comma-separated
    #[arg(long, value_delimiter = ',')]
    freqs: Option<Vec<u32>>,

    /// Constraint aggregate: sum, prod, mean, max, min
    #[arg(long)]
    aggregate: Option<String>,

    /// Constraint comparator: lt, gt, le, ge, eq, between
    #[arg(long)]
    comparator: Option<String>,

    /// Constraint limit (lower bound of the pair for `between`)
    #[arg(long, allow_hyphen_values = true)]
    limit: Option<f64>,

    /// Upper bound of the pair for `between`
    #[arg(long, allow_hyphen_values = true)]
    limit2: Option<f64>,

    /// Maximum number of rows to emit
    #[arg(long, default_value_t = 100_000)]
    max_rows: u64,

    /// Zero-based rank to resume from (unconstrained only)
    #[arg(long, default_value_t = 0)]
    start_rank: u64,

    /// Emit the aggregate value as an extra column per row
    #[arg(long)]
    keep_aggregate: bool,

    /// Report the exact total row count instead of generating
    #[arg(long)]
    count_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate combinations in lexicographic order
    Combinations(ComboArgs),
    /// Enumerate permutations in lexicographic order
    Permutations(ComboArgs),
    /// List all primes in [lo, hi]
    Primes {
        /// Lower endpoint (inclusive, >= 1)
        #[arg(long)]
        lo: u64,
        /// Upper endpoint (inclusive)
        #[arg(long)]
        hi: u64,
    },
    /// Divisor counts d(n) for each input
    DivisorCount {
        /// Positive integers
        #[arg(required = true)]
        values: Vec<u64>,
    },
    /// Full ascending divisor lists for each input
    Divisors {
        /// Positive integers
        #[arg(required = true)]
        values: Vec<u64>,
    },
    /// Prime factorizations (prime, exponent) for each input
    Factorize {
        /// Positive integers
        #[arg(required = true)]
        values: Vec<u64>,
    },
    /// Euler's totient phi(n) for each input
    Totient {
        /// Positive integers
        #[arg(required = true)]
        values: Vec<u64>,
    },
}

fn main() -> Result<()> {
    // Structured logging on stderr: LOG_FORMAT=json for machines,
    // human-readable otherwise. RUST_LOG controls verbosity.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if std::env::var("LOG_FORMAT").unwrap_or_default() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Combinations(args) => {
            cli::run_combinatorics(args, combinatrix::Order::Combination, cli.pretty)
        }
        Commands::Permutations(args) => {
            cli::run_combinatorics(args, combinatrix::Order::Permutation, cli.pretty)
        }
        Commands::Primes { lo, hi } => cli::run_primes(*lo, *hi, cli.pretty),
        Commands::DivisorCount { values } => cli::run_divisor_count(values, cli.pretty),
        Commands::Divisors { values } => cli::run_divisors(values, cli.pretty),
        Commands::Factorize { values } => cli::run_factorize(values, cli.pretty),
        Commands::Totient { values } => cli::run_totient(values, cli.pretty),
    }
}
