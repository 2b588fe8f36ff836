//! # Generate — Constrained Lexicographic Enumeration
//!
//! Walks the combinatorial space of a `(ValueSet, GenerationSpec)` pair in
//! strict lexicographic order over positions, emitting rows up to a cap.
//! Without a constraint the walk is direct next-tuple advancement. With a
//! constraint, the walker exploits the monotone boundability of the closed
//! aggregate vocabulary: at every partial prefix it computes the interval of
//! aggregate values reachable by any completion, and skips the whole
//! subtree when that interval cannot intersect the satisfied set. This
//! turns worst-case exhaustive filtering into output-sensitive search:
//! cost proportional to the prefixes explored, not the full space.
//!
//! Boundability per aggregate, with `r` slots open and future values
//! confined to `[fmin, fmax]`:
//!
//! - `sum`:  `partial + r·fmin ..= partial + r·fmax`
//! - `mean`: the sum interval, with the satisfied set pre-scaled by `m`
//! - `prod`: `partial·fmin^r ..= partial·fmax^r`; sound only when every
//!   value is non-negative; with a negative value present pruning is
//!   disabled and the walk degrades to full filtering (see DESIGN.md)
//! - `max`/`min`: clamp of the partial extremum against `[fmin, fmax]`
//!
//! For combinations the future values come from positions at or above the
//! current index, so per-index suffix extrema give tight bounds; for
//! permutations the global extrema are used.
//!
//! The cap bounds *emitted* rows. Truncation is reported through
//! `RowSet::complete = false`, never as an error.

use rug::Integer;
use tracing::debug;

use crate::count;
use crate::error::{Error, Result};
use crate::params::{
    self, Aggregate, ConstraintSpec, GenerationSpec, Order, Repetition, SatisfiedInterval,
    ValueSet,
};
use crate::rank;

/// Ceiling on materialized cells (rows × arity). 2^28 f64 cells is ~2 GB,
/// validated before any row buffer is allocated.
pub const MAX_ROW_CELLS: u64 = 1 << 28;

/// Optional knobs beyond the core contract: the per-row aggregate column
/// and mid-stream resumption at a given rank.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenerateOptions {
    /// Emit the aggregate function value alongside each row. Requires a
    /// constraint (the aggregate comes from its vocabulary).
    pub keep_aggregate: bool,
    /// Zero-based rank to resume from. Unconstrained generation only;
    /// ranks are not defined over the filtered sequence.
    pub start_rank: u64,
}

/// Generation output: rows in lexicographic order, the optional aggregate
/// column, and whether the result is the full solution set or a truncated
/// prefix.
#[derive(Clone, Debug)]
pub struct RowSet {
    pub rows: Vec<Vec<f64>>,
    pub aggregates: Option<Vec<f64>>,
    pub complete: bool,
}

/// Enumerate rows under the default options.
pub fn generate(
    vs: &ValueSet,
    spec: &GenerationSpec,
    constraint: Option<&ConstraintSpec>,
    row_cap: u64,
) -> Result<RowSet> {
    generate_with(vs, spec, constraint, row_cap, GenerateOptions::default())
}

/// Enumerate rows. All validation (structural, vocabulary, implied
/// materialization size) happens before any enumeration work begins.
pub fn generate_with(
    vs: &ValueSet,
    spec: &GenerationSpec,
    constraint: Option<&ConstraintSpec>,
    row_cap: u64,
    opts: GenerateOptions,
) -> Result<RowSet> {
    params::validate(vs, spec, constraint)?;
    if opts.start_rank > 0 && constraint.is_some() {
        return Err(Error::arg(
            "start_rank is only defined for unconstrained generation",
        ));
    }
    if opts.keep_aggregate && constraint.is_none() {
        return Err(Error::arg("keep_aggregate requires a constraint"));
    }

    let total = count::total(vs, spec);
    validate_materialization(&total, spec.m, row_cap, opts.start_rank)?;

    match constraint {
        None => walk_unconstrained(vs, spec, row_cap, opts.start_rank),
        Some(c) => walk_constrained(vs, spec, c, row_cap, opts.keep_aggregate),
    }
}

/// Exact total row count for a request, without generating anything.
pub fn count_rows(vs: &ValueSet, spec: &GenerationSpec) -> Result<Integer> {
    params::validate(vs, spec, None)?;
    Ok(count::total(vs, spec))
}

/// Fail fast if the worst-case materialized buffer exceeds the cell
/// ceiling: emitted rows can never exceed min(total − start, cap).
fn validate_materialization(
    total: &Integer,
    m: usize,
    row_cap: u64,
    start_rank: u64,
) -> Result<()> {
    let remaining = Integer::from(total - start_rank);
    let max_rows = if remaining < 0 {
        0
    } else {
        remaining.to_u64().unwrap_or(u64::MAX).min(row_cap)
    };
    let cells = (max_rows as u128) * (m.max(1) as u128);
    if cells > MAX_ROW_CELLS as u128 {
        return Err(Error::ResourceLimit(format!(
            "{} rows of arity {} exceed the {}-cell ceiling; lower the row cap",
            max_rows, m, MAX_ROW_CELLS
        )));
    }
    Ok(())
}

// ── Walk state ──────────────────────────────────────────────────────────

/// Iterative DFS over index tuples. `cursor[d]` is the next candidate to
/// try at depth `d`; `partial[d]` is the aggregate accumulator after the
/// first `d + 1` placements. No recursion: state is the row itself.
struct Walker<'a> {
    values: &'a [f64],
    spec: GenerationSpec,
    caps: Vec<u32>,
    usage: Vec<u32>,
    /// Static capacity of the index suffix `j ≥ i` (combination modes).
    suffix_cap: Vec<u64>,
    /// Total unused capacity (permutation modes).
    free_capacity: u64,
    idx: Vec<usize>,
    cursor: Vec<usize>,
    partial: Vec<f64>,
}

impl<'a> Walker<'a> {
    fn new(vs: &'a ValueSet, spec: &GenerationSpec) -> Self {
        let n = vs.len();
        let caps: Vec<u32> = match spec.repetition {
            Repetition::None => vec![1; n],
            Repetition::Unlimited => vec![spec.m.max(1) as u32; n],
            Repetition::Frequency => vs.freqs.clone().unwrap_or_default(),
        };
        let mut suffix_cap = vec![0u64; n + 1];
        for i in (0..n).rev() {
            suffix_cap[i] = suffix_cap[i + 1] + caps[i] as u64;
        }
        let free_capacity = suffix_cap.first().copied().unwrap_or(0);
        Walker {
            values: &vs.values,
            spec: *spec,
            caps,
            usage: vec![0; n],
            suffix_cap,
            free_capacity,
            idx: Vec::with_capacity(spec.m),
            cursor: vec![0; spec.m + 1],
            partial: Vec::with_capacity(spec.m),
        }
    }

    fn n(&self) -> usize {
        self.values.len()
    }

    fn depth(&self) -> usize {
        self.idx.len()
    }

    /// Lowest admissible candidate at the current depth given the prefix.
    fn lex_floor(&self) -> usize {
        match (self.spec.order, self.spec.repetition) {
            (Order::Permutation, _) => 0,
            (Order::Combination, Repetition::None) => self.idx.last().map_or(0, |&p| p + 1),
            (Order::Combination, _) => self.idx.last().copied().unwrap_or(0),
        }
    }

    /// Can the suffix still be filled if `c` is placed at the current depth?
    fn suffix_feasible(&self, c: usize) -> bool {
        let slots = (self.spec.m - self.depth() - 1) as u64;
        match self.spec.order {
            Order::Combination => {
                // Non-decreasing rows only ever hold usage at index c among
                // the suffix, so the dynamic capacity is one subtraction.
                self.suffix_cap[c] - self.usage[c] as u64 - 1 >= slots
            }
            Order::Permutation => self.free_capacity - 1 >= slots,
        }
    }

    fn place(&mut self, c: usize, agg: Option<Aggregate>) {
        self.usage[c] += 1;
        self.free_capacity -= 1;
        let v = self.values[c];
        if let Some(a) = agg {
            let prev = self.partial.last().copied();
            self.partial.push(accumulate(a, prev, v));
        }
        self.idx.push(c);
        let d = self.depth();
        if d < self.spec.m {
            self.cursor[d] = self.lex_floor();
        }
    }

    /// Pop the deepest placement and aim its depth's cursor past it.
    /// Returns false when the stack is empty (space exhausted).
    fn backtrack(&mut self) -> bool {
        match self.idx.pop() {
            Some(last) => {
                self.usage[last] -= 1;
                self.free_capacity += 1;
                self.partial.pop();
                let depth = self.depth();
                self.cursor[depth] = last + 1;
                true
            }
            None => false,
        }
    }

    /// Seed the walker at an unranked row (mid-stream resumption). The
    /// cursor state is reconstructed lazily by backtracking.
    fn seed(&mut self, row: &[usize], agg: Option<Aggregate>) {
        for &c in row {
            self.place(c, agg);
        }
    }

    fn value_row(&self) -> Vec<f64> {
        self.idx.iter().map(|&i| self.values[i]).collect()
    }
}

/// Fold one more value into a running partial aggregate.
fn accumulate(agg: Aggregate, prev: Option<f64>, v: f64) -> f64 {
    match (agg, prev) {
        (Aggregate::Sum | Aggregate::Mean, None) => v,
        (Aggregate::Sum | Aggregate::Mean, Some(p)) => p + v,
        (Aggregate::Prod, None) => v,
        (Aggregate::Prod, Some(p)) => p * v,
        (Aggregate::Max, None) => v,
        (Aggregate::Max, Some(p)) => p.max(v),
        (Aggregate::Min, None) => v,
        (Aggregate::Min, Some(p)) => p.min(v),
    }
}

// ── Unconstrained walk ──────────────────────────────────────────────────

fn walk_unconstrained(
    vs: &ValueSet,
    spec: &GenerationSpec,
    row_cap: u64,
    start_rank: u64,
) -> Result<RowSet> {
    let total = count::total(vs, spec);
    let remaining = Integer::from(&total - start_rank);
    let remaining = if remaining < 0 {
        Integer::new()
    } else {
        remaining
    };
    let complete = remaining <= row_cap;
    let emit_target = if complete {
        // complete ⇒ remaining ≤ cap ≤ u64::MAX, so this narrowing is exact.
        remaining.to_u64().unwrap_or(0)
    } else {
        row_cap
    };
    if emit_target == 0 {
        return Ok(RowSet {
            rows: Vec::new(),
            aggregates: None,
            complete,
        });
    }
    if spec.m == 0 {
        return Ok(RowSet {
            rows: vec![Vec::new()],
            aggregates: None,
            complete,
        });
    }

    let mut walker = Walker::new(vs, spec);
    walker.seed(&rank::unrank(vs, spec, start_rank)?, None);

    let mut rows = Vec::with_capacity(emit_target as usize);
    rows.push(walker.value_row());

    // Classic next-tuple advancement: retreat to the rightmost position
    // that can move, then refill the suffix with the lexicographic minimum.
    'emit: while (rows.len() as u64) < emit_target {
        while walker.backtrack() {
            let d = walker.depth();
            let mut c = walker.cursor[d];
            while c < walker.n() {
                if walker.usage[c] < walker.caps[c] && walker.suffix_feasible(c) {
                    walker.place(c, None);
                    // Suffix refill cannot fail once feasibility held.
                    while walker.depth() < spec.m {
                        let d2 = walker.depth();
                        let mut c2 = walker.cursor[d2];
                        while walker.usage[c2] >= walker.caps[c2] {
                            c2 += 1;
                        }
                        walker.place(c2, None);
                    }
                    rows.push(walker.value_row());
                    continue 'emit;
                }
                c += 1;
            }
        }
        // Exhausted with emit_target unmet: impossible given exact counts.
        return Err(Error::arg("enumeration ended before the computed count"));
    }

    Ok(RowSet {
        rows,
        aggregates: None,
        complete,
    })
}

// ── Constrained walk ────────────────────────────────────────────────────

struct PruneCtx {
    interval: SatisfiedInterval,
    aggregate: Aggregate,
    enabled: bool,
    /// Per-index suffix extrema (combination) or global extrema broadcast
    /// (permutation), with sentinel entries at index n.
    future_min: Vec<f64>,
    future_max: Vec<f64>,
    m: usize,
}

impl PruneCtx {
    fn new(vs: &ValueSet, spec: &GenerationSpec, constraint: &ConstraintSpec) -> Result<Self> {
        let mut interval = constraint.interval()?;
        if constraint.aggregate == Aggregate::Mean && spec.m > 0 {
            // A mean constraint is a sum constraint scaled by the fixed row
            // length; pruning then reuses the sum machinery unchanged.
            interval.lo *= spec.m as f64;
            interval.hi *= spec.m as f64;
        }
        let n = vs.len();
        let (mut future_min, mut future_max) = (vec![f64::INFINITY; n + 1], vec![f64::NEG_INFINITY; n + 1]);
        match spec.order {
            Order::Combination => {
                for i in (0..n).rev() {
                    future_min[i] = future_min[i + 1].min(vs.values[i]);
                    future_max[i] = future_max[i + 1].max(vs.values[i]);
                }
            }
            Order::Permutation => {
                let lo = vs.values.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = vs.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                for i in 0..n {
                    future_min[i] = lo;
                    future_max[i] = hi;
                }
            }
        }
        // Product intervals flip under sign changes, so pruning is only
        // sound over non-negative value sets (DESIGN.md, open questions).
        let enabled = constraint.aggregate != Aggregate::Prod
            || vs.values.iter().all(|&v| v >= 0.0);
        Ok(PruneCtx {
            interval,
            aggregate: constraint.aggregate,
            enabled,
            future_min,
            future_max,
            m: spec.m,
        })
    }

    /// Would every completion of the prefix ending in `partial_next` (at
    /// depth `d`, future values drawn from index `c` onward) be rejected?
    fn subtree_dead(&self, spec: &GenerationSpec, d: usize, c: usize, partial_next: f64) -> bool {
        if !self.enabled {
            return false;
        }
        let slots = (self.m - d - 1) as f64;
        if slots == 0.0 {
            return self.interval.disjoint_from(partial_next, partial_next);
        }
        // Future candidates sit at or above c for repeating combinations,
        // strictly above for distinct ones; permutations roam the full set.
        let fi = match (spec.order, spec.repetition) {
            (Order::Combination, Repetition::None) => c + 1,
            _ => c,
        };
        let (fmin, fmax) = (self.future_min[fi], self.future_max[fi]);
        let (lo, hi) = match self.aggregate {
            Aggregate::Sum | Aggregate::Mean => {
                (partial_next + slots * fmin, partial_next + slots * fmax)
            }
            Aggregate::Prod => {
                // partial_next ≥ 0 here (non-negative set), so scaling
                // preserves order; overflow to ±inf stays conservative.
                (partial_next * fmin.powf(slots), partial_next * fmax.powf(slots))
            }
            Aggregate::Max => (partial_next.max(fmin), partial_next.max(fmax)),
            Aggregate::Min => (partial_next.min(fmin), partial_next.min(fmax)),
        };
        self.interval.disjoint_from(lo, hi)
    }
}

fn walk_constrained(
    vs: &ValueSet,
    spec: &GenerationSpec,
    constraint: &ConstraintSpec,
    row_cap: u64,
    keep_aggregate: bool,
) -> Result<RowSet> {
    let ctx = PruneCtx::new(vs, spec, constraint)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut aggs: Vec<f64> = Vec::new();

    // Arity zero: the space is the single empty row, run through the same
    // filter as everything else.
    if spec.m == 0 {
        let agg = constraint.aggregate.apply(&[]);
        let accepted = constraint.accepts(agg);
        if accepted && row_cap >= 1 {
            rows.push(Vec::new());
            aggs.push(agg);
        }
        let complete = !accepted || row_cap >= 1;
        return Ok(finish(rows, aggs, keep_aggregate, complete));
    }
    if vs.is_empty() {
        return Ok(finish(rows, aggs, keep_aggregate, true));
    }
    if row_cap == 0 {
        return Ok(finish(rows, aggs, keep_aggregate, total_is_zero(vs, spec)));
    }

    let mut walker = Walker::new(vs, spec);
    let agg = Some(constraint.aggregate);
    let mut pruned: u64 = 0;
    let mut complete = true;

    'walk: loop {
        let d = walker.depth();
        if d == spec.m {
            // Full row: the final filter is always exact, pruning only ever
            // skips subtrees it has proven empty.
            let partial = walker.partial.last().copied().unwrap_or(f64::NAN);
            let value = match constraint.aggregate {
                Aggregate::Mean => partial / spec.m as f64,
                _ => partial,
            };
            if constraint.accepts(value) {
                rows.push(walker.value_row());
                aggs.push(value);
                if rows.len() as u64 >= row_cap {
                    complete = false;
                    break 'walk;
                }
            }
            if !walker.backtrack() {
                break 'walk;
            }
            continue;
        }

        let mut c = walker.cursor[d];
        let mut descended = false;
        while c < walker.n() {
            if walker.usage[c] < walker.caps[c] && walker.suffix_feasible(c) {
                let next = accumulate(
                    constraint.aggregate,
                    walker.partial.last().copied(),
                    walker.values[c],
                );
                if ctx.subtree_dead(spec, d, c, next) {
                    pruned += 1;
                } else {
                    walker.place(c, agg);
                    descended = true;
                    break;
                }
            }
            c += 1;
        }
        if !descended {
            if !walker.backtrack() {
                break 'walk;
            }
        } else {
            continue;
        }
    }

    debug!(
        emitted = rows.len(),
        pruned, complete, "constrained walk finished"
    );
    Ok(finish(rows, aggs, keep_aggregate, complete))
}

fn total_is_zero(vs: &ValueSet, spec: &GenerationSpec) -> bool {
    count::total(vs, spec) == 0
}

fn finish(rows: Vec<Vec<f64>>, aggs: Vec<f64>, keep: bool, complete: bool) -> RowSet {
    RowSet {
        rows,
        aggregates: if keep { Some(aggs) } else { None },
        complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Comparator, Limit};

    fn comb(m: usize) -> GenerationSpec {
        GenerationSpec::new(m, Repetition::None, Order::Combination)
    }

    fn constraint(a: Aggregate, c: Comparator, l: Limit) -> ConstraintSpec {
        ConstraintSpec::new(a, c, l)
    }

    /// Brute-force referent: unconstrained enumeration plus a manual
    /// filter. Pruning must never drop a valid row nor emit an invalid one.
    fn filtered_by_hand(
        vs: &ValueSet,
        spec: &GenerationSpec,
        cs: &ConstraintSpec,
    ) -> Vec<Vec<f64>> {
        generate(vs, spec, None, u64::MAX >> 32)
            .unwrap()
            .rows
            .into_iter()
            .filter(|row| cs.accepts(cs.aggregate.apply(row)))
            .collect()
    }

    // ── Unconstrained Walks ─────────────────────────────────────────────

    #[test]
    fn combinations_of_three_choose_two() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0]);
        let out = generate(&vs, &comb(2), None, 100).unwrap();
        assert_eq!(out.rows, vec![vec![1.0, 2.0], vec![1.0, 3.0], vec![2.0, 3.0]]);
        assert!(out.complete);
    }

    #[test]
    fn permutations_of_three_choose_two() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0]);
        let spec = GenerationSpec::new(2, Repetition::None, Order::Permutation);
        let out = generate(&vs, &spec, None, 100).unwrap();
        assert_eq!(out.rows.len(), 6);
        assert_eq!(out.rows[0], vec![1.0, 2.0]);
        assert_eq!(out.rows[2], vec![2.0, 1.0]);
        assert_eq!(out.rows[5], vec![3.0, 2.0]);
    }

    /// Equal values at different positions stay distinguishable slots.
    #[test]
    fn duplicate_values_are_distinct_slots() {
        let vs = ValueSet::new(vec![2.0, 2.0]);
        let out = generate(&vs, &comb(2), None, 10).unwrap();
        assert_eq!(out.rows, vec![vec![2.0, 2.0]]);
        let spec = GenerationSpec::new(2, Repetition::None, Order::Permutation);
        let out = generate(&vs, &spec, None, 10).unwrap();
        assert_eq!(out.rows, vec![vec![2.0, 2.0], vec![2.0, 2.0]]);
    }

    #[test]
    fn frequency_mode_walk() {
        let vs = ValueSet::with_freqs(vec![1.0, 2.0, 3.0], vec![2, 1, 1]);
        let spec = GenerationSpec::new(2, Repetition::Frequency, Order::Combination);
        let out = generate(&vs, &spec, None, 100).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![1.0, 1.0],
                vec![1.0, 2.0],
                vec![1.0, 3.0],
                vec![2.0, 3.0]
            ]
        );
        assert!(out.complete);
    }

    #[test]
    fn unlimited_repetition_walk() {
        let vs = ValueSet::new(vec![0.0, 1.0]);
        let spec = GenerationSpec::new(2, Repetition::Unlimited, Order::Permutation);
        let out = generate(&vs, &spec, None, 100).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0]
            ]
        );
    }

    /// Emitted row count must equal the exact algebraic count whenever the
    /// cap is not the binding limit.
    #[test]
    fn walk_length_matches_count_all_modes() {
        let plain = ValueSet::new(vec![1.0, 2.0, 3.0, 4.0]);
        let freq = ValueSet::with_freqs(vec![1.0, 2.0, 3.0], vec![2, 2, 1]);
        let cases = vec![
            (plain.clone(), GenerationSpec::new(2, Repetition::None, Order::Combination)),
            (plain.clone(), GenerationSpec::new(3, Repetition::None, Order::Permutation)),
            (plain.clone(), GenerationSpec::new(3, Repetition::Unlimited, Order::Combination)),
            (plain, GenerationSpec::new(2, Repetition::Unlimited, Order::Permutation)),
            (freq.clone(), GenerationSpec::new(3, Repetition::Frequency, Order::Combination)),
            (freq, GenerationSpec::new(3, Repetition::Frequency, Order::Permutation)),
        ];
        for (vs, spec) in cases {
            let out = generate(&vs, &spec, None, 1_000_000).unwrap();
            let expect = count::total(&vs, &spec);
            assert_eq!(out.rows.len() as u64, expect, "{:?}", spec);
            assert!(out.complete);
        }
    }

    // ── Row Cap and Resumption ──────────────────────────────────────────

    #[test]
    fn row_cap_truncates_and_flags() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0]);
        let out = generate(&vs, &comb(2), None, 2).unwrap();
        assert_eq!(out.rows, vec![vec![1.0, 2.0], vec![1.0, 3.0]]);
        assert!(!out.complete);
        let out = generate(&vs, &comb(2), None, 3).unwrap();
        assert!(out.complete);
    }

    /// Resuming at rank k must reproduce the suffix of the full run.
    #[test]
    fn start_rank_resumes_mid_stream() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let spec = GenerationSpec::new(3, Repetition::Unlimited, Order::Combination);
        let full = generate(&vs, &spec, None, 10_000).unwrap();
        for k in [0u64, 1, 7, 20, 34] {
            let resumed = generate_with(
                &vs,
                &spec,
                None,
                10_000,
                GenerateOptions {
                    start_rank: k,
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(resumed.rows, full.rows[k as usize..], "start_rank {}", k);
            assert!(resumed.complete);
        }
    }

    #[test]
    fn start_rank_beyond_total_is_empty_and_complete() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0]);
        let out = generate_with(
            &vs,
            &comb(2),
            None,
            10,
            GenerateOptions {
                start_rank: 99,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(out.rows.is_empty());
        assert!(out.complete);
    }

    // ── Degenerate Inputs ───────────────────────────────────────────────

    #[test]
    fn arity_zero_yields_one_empty_row() {
        let vs = ValueSet::new(vec![1.0, 2.0]);
        let out = generate(&vs, &comb(0), None, 5).unwrap();
        assert_eq!(out.rows, vec![Vec::<f64>::new()]);
        assert!(out.complete);
        let out = generate(&vs, &comb(0), None, 0).unwrap();
        assert!(out.rows.is_empty());
        assert!(!out.complete);
    }

    #[test]
    fn empty_value_set_yields_zero_rows_complete() {
        let vs = ValueSet::new(vec![]);
        let out = generate(&vs, &comb(3), None, 5).unwrap();
        assert!(out.rows.is_empty());
        assert!(out.complete);
    }

    // ── Constrained Walks ───────────────────────────────────────────────

    /// Worked example: sum ≤ 5 over C([1,2,3,4], 2) keeps exactly the four
    /// pairs whose sum stays within the bound, in lexicographic order.
    #[test]
    fn sum_upper_bound_worked_example() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0, 4.0]);
        let cs = constraint(Aggregate::Sum, Comparator::Le, Limit::Scalar(5.0));
        let out = generate(&vs, &comb(2), Some(&cs), 100).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![1.0, 2.0],
                vec![1.0, 3.0],
                vec![1.0, 4.0],
                vec![2.0, 3.0]
            ]
        );
        assert!(out.complete);
    }

    /// Pruning equivalence across aggregates, comparators, orders, and
    /// repetition modes, against enumerate-then-filter.
    #[test]
    fn pruning_matches_exhaustive_filter() {
        let sets = vec![
            ValueSet::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ValueSet::new(vec![0.5, 2.0, 2.0, 7.5]),
            ValueSet::with_freqs(vec![1.0, 3.0, 6.0], vec![2, 2, 1]),
        ];
        let limits = [
            (Comparator::Le, Limit::Scalar(6.0)),
            (Comparator::Ge, Limit::Scalar(9.0)),
            (Comparator::Lt, Limit::Scalar(4.5)),
            (Comparator::Gt, Limit::Scalar(10.0)),
            (Comparator::Eq, Limit::Scalar(8.0)),
            (Comparator::Between, Limit::Pair(5.0, 9.0)),
        ];
        for vs in &sets {
            let specs: Vec<GenerationSpec> = if vs.freqs.is_some() {
                vec![
                    GenerationSpec::new(3, Repetition::Frequency, Order::Combination),
                    GenerationSpec::new(3, Repetition::Frequency, Order::Permutation),
                ]
            } else {
                vec![
                    GenerationSpec::new(3, Repetition::None, Order::Combination),
                    GenerationSpec::new(3, Repetition::None, Order::Permutation),
                    GenerationSpec::new(3, Repetition::Unlimited, Order::Combination),
                    GenerationSpec::new(2, Repetition::Unlimited, Order::Permutation),
                ]
            };
            for spec in &specs {
                for agg in [
                    Aggregate::Sum,
                    Aggregate::Prod,
                    Aggregate::Mean,
                    Aggregate::Max,
                    Aggregate::Min,
                ] {
                    for (cmp, lim) in limits {
                        let cs = constraint(agg, cmp, lim);
                        let got = generate(vs, spec, Some(&cs), 1_000_000).unwrap();
                        let want = filtered_by_hand(vs, spec, &cs);
                        assert_eq!(
                            got.rows, want,
                            "mismatch: {:?} {:?} {:?} {:?}",
                            spec, agg, cmp, lim
                        );
                        assert!(got.complete);
                    }
                }
            }
        }
    }

    /// Negative values disable prod pruning; results must still be exact.
    #[test]
    fn prod_with_negatives_falls_back_to_filtering() {
        let vs = ValueSet::new(vec![-3.0, -1.0, 2.0, 4.0]);
        let spec = GenerationSpec::new(2, Repetition::None, Order::Combination);
        let cs = constraint(Aggregate::Prod, Comparator::Ge, Limit::Scalar(0.0));
        let got = generate(&vs, &spec, Some(&cs), 100).unwrap();
        let want = filtered_by_hand(&vs, &spec, &cs);
        assert_eq!(got.rows, want);
    }

    #[test]
    fn constrained_row_cap_truncates() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0, 4.0]);
        let cs = constraint(Aggregate::Sum, Comparator::Le, Limit::Scalar(5.0));
        let out = generate(&vs, &comb(2), Some(&cs), 2).unwrap();
        assert_eq!(out.rows, vec![vec![1.0, 2.0], vec![1.0, 3.0]]);
        assert!(!out.complete);
    }

    #[test]
    fn keep_aggregate_emits_column() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0, 4.0]);
        let cs = constraint(Aggregate::Sum, Comparator::Le, Limit::Scalar(5.0));
        let out = generate_with(
            &vs,
            &comb(2),
            Some(&cs),
            100,
            GenerateOptions {
                keep_aggregate: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(out.aggregates, Some(vec![3.0, 4.0, 5.0, 5.0]));
    }

    #[test]
    fn keep_aggregate_without_constraint_rejected() {
        let vs = ValueSet::new(vec![1.0, 2.0]);
        let err = generate_with(
            &vs,
            &comb(2),
            None,
            10,
            GenerateOptions {
                keep_aggregate: true,
                ..Default::default()
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn start_rank_with_constraint_rejected() {
        let vs = ValueSet::new(vec![1.0, 2.0, 3.0]);
        let cs = constraint(Aggregate::Sum, Comparator::Le, Limit::Scalar(4.0));
        let err = generate_with(
            &vs,
            &comb(2),
            Some(&cs),
            10,
            GenerateOptions {
                start_rank: 1,
                ..Default::default()
            },
        );
        assert!(err.is_err());
    }

    /// A selective constraint over a space too large to enumerate: pruning
    /// must find the sparse solutions without walking the bulk.
    #[test]
    fn pruning_scales_past_enumerable_spaces() {
        // C(40, 5) = 658,008 rows; sum ≤ 16 admits only prefixes near the
        // lexicographic start (minimum possible sum is 1+2+3+4+5 = 15).
        let vs = ValueSet::new((1..=40).map(f64::from).collect());
        let spec = GenerationSpec::new(5, Repetition::None, Order::Combination);
        let cs = constraint(Aggregate::Sum, Comparator::Le, Limit::Scalar(16.0));
        let out = generate(&vs, &spec, Some(&cs), 1_000).unwrap();
        // sum 15: {1,2,3,4,5}; sum 16: {1,2,3,4,6}.
        assert_eq!(
            out.rows,
            vec![
                vec![1.0, 2.0, 3.0, 4.0, 5.0],
                vec![1.0, 2.0, 3.0, 4.0, 6.0]
            ]
        );
        assert!(out.complete);
    }

    // ── Resource Ceilings ───────────────────────────────────────────────

    #[test]
    fn materialization_ceiling_enforced_before_walking() {
        let vs = ValueSet::new((0..64).map(f64::from).collect());
        let spec = GenerationSpec::new(20, Repetition::Unlimited, Order::Permutation);
        // 64^20 rows with an effectively unbounded cap: must fail fast.
        let err = generate(&vs, &spec, None, u64::MAX);
        assert!(matches!(err, Err(Error::ResourceLimit(_))));
        // A sane cap keeps the same request legal.
        assert!(generate(&vs, &spec, None, 10).is_ok());
    }
}
