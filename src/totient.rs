//! # Totient — Euler's phi via the Linear Sieve
//!
//! phi(n) counts the integers in [1, n] coprime to n. Values come from the
//! linear-pass totient array over the SPF table; the batched form shares a
//! single sieve sized to the maximum input.

use crate::error::Result;
use crate::sieve::SieveTable;
use crate::validate_oracle_inputs;

/// phi(n) for `n ≥ 1`. `euler_phi(1) == 1`.
pub fn euler_phi(n: u64) -> Result<u64> {
    Ok(euler_phi_batch(&[n])?[0])
}

/// phi(n) for every input, one shared sieve sized to the maximum.
pub fn euler_phi_batch(ns: &[u64]) -> Result<Vec<u64>> {
    let bound = validate_oracle_inputs(ns)?;
    if ns.is_empty() {
        return Ok(Vec::new());
    }
    let table = SieveTable::build(bound)?;
    let phi = table.totients();
    Ok(ns.iter().map(|&n| phi[n as usize]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_totients() {
        assert_eq!(euler_phi(1).unwrap(), 1);
        assert_eq!(euler_phi(2).unwrap(), 1);
        assert_eq!(euler_phi(9).unwrap(), 6);
        assert_eq!(euler_phi(10).unwrap(), 4);
        assert_eq!(euler_phi(97).unwrap(), 96);
        assert_eq!(euler_phi(360).unwrap(), 96);
    }

    /// Multiplicativity on coprime pairs: phi(mn) = phi(m)·phi(n).
    #[test]
    fn multiplicative_on_coprime_pairs() {
        let pairs = [(3u64, 8u64), (5, 9), (7, 16), (11, 25)];
        for (a, b) in pairs {
            let out = euler_phi_batch(&[a, b, a * b]).unwrap();
            assert_eq!(out[0] * out[1], out[2], "phi({}·{})", a, b);
        }
    }

    #[test]
    fn batch_preserves_input_order() {
        assert_eq!(euler_phi_batch(&[10, 1, 7]).unwrap(), vec![4, 1, 6]);
    }

    #[test]
    fn zero_input_rejected() {
        assert!(euler_phi(0).is_err());
        assert!(euler_phi_batch(&[1, 0]).is_err());
    }

    #[test]
    fn empty_batch_is_empty() {
        assert_eq!(euler_phi_batch(&[]).unwrap(), Vec::<u64>::new());
    }
}
