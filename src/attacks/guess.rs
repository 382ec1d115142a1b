//! Guessing strategies shared by the hybrid attacks.

use tracing::trace;

use super::log2_binomial;
use crate::cost::{CostRecord, CostValue, Rop};
use crate::distribution::NoiseDistribution;
use crate::error::Result;
use crate::params::LweParameters;

/// Guessed-coordinate counts tried by the hybrid attacks, `0..=max` at a
/// stride of at most 32 points.
pub(crate) fn zeta_candidates(max: usize) -> Vec<usize> {
    let step = (max / 32).max(1);
    let mut out: Vec<usize> = (0..=max).step_by(step).collect();
    if out.last() != Some(&max) {
        out.push(max);
    }
    out
}

/// Size of the search space for `zeta` guessed secret coordinates and the
/// probability the guessed block lies inside it, both in log2.
///
/// Dense secrets are enumerated exhaustively. Sparse secrets enumerate only
/// patterns of the expected weight, which covers the block about half the
/// time.
pub(crate) fn guessing_space(xs: &NoiseDistribution, n: usize, zeta: usize) -> (f64, f64) {
    if zeta == 0 {
        return (0.0, 0.0);
    }
    if !xs.is_sparse(n) {
        return (zeta as f64 * xs.log2_support(n), 0.0);
    }
    let h = xs.hamming_weight(n);
    let w = ((h as f64) * zeta as f64 / n as f64).ceil() as u64;
    let nonzero_values = (xs.log2_support(n).exp2() - 1.0).max(1.0);
    let size = log2_binomial(zeta as u64, w.min(zeta as u64)) + w as f64 * nonzero_values.log2();
    (size, -1.0)
}

/// Guess `ζ` secret coordinates to be zero and run `inner` on the remaining
/// `n - ζ` dimensional instance, repeating until a guess is right.
///
/// Only sparse secrets benefit; dense secrets are passed straight through.
pub fn guess_composition<F>(params: &LweParameters, inner: F) -> Result<CostRecord>
where
    F: Fn(&LweParameters) -> Result<CostRecord>,
{
    params.validate()?;
    if !params.secret_is_sparse() {
        return inner(params);
    }

    let n = params.n as u64;
    let h = params.xs.hamming_weight(params.n).min(n);
    let mut best: Option<CostRecord> = None;

    for zeta in zeta_candidates((n - h) as usize) {
        if zeta as u64 >= n {
            break;
        }
        // P[ζ chosen coordinates are all zero] = C(n-h, ζ) / C(n, ζ)
        let log2_prob = log2_binomial(n - h, zeta as u64) - log2_binomial(n, zeta as u64);
        let repetitions = -log2_prob;
        if let Some(b) = &best {
            if Rop::bits(repetitions) >= b.rop() {
                break;
            }
        }

        let reduced = params.with_dimension(params.n - zeta);
        let record = inner(&reduced)?;
        let rop = record.rop().repeated(repetitions);
        trace!(zeta, rop = %rop, "guess composition step");

        if best.as_ref().map_or(true, |b| rop < b.rop()) {
            let mut composed = record.with("rop", rop);
            composed.set("↻", CostValue::Log2(repetitions));
            composed.set("ζ", zeta);
            best = Some(composed);
        }
    }

    match best {
        Some(record) => Ok(record),
        None => inner(params),
    }
}
