//! Dual attacks: find short vectors in the dual lattice and use them to
//! distinguish LWE samples from uniform.

use std::f64::consts::{LOG2_E, PI};

use tracing::trace;

use super::guess::{guessing_space, zeta_candidates};
use super::{minimize_over, sample_candidates};
use crate::cost::{CostRecord, CostValue, Rop};
use crate::error::Result;
use crate::params::LweParameters;
use crate::reduction::{delta, CostModel, MIN_BLOCK_SIZE};

#[derive(Clone, Copy, Debug)]
struct DualPoint {
    beta: usize,
    m: usize,
    d: usize,
    red: Rop,
    /// log2 number of short vectors needed to distinguish
    log2_vectors: f64,
    /// log2 number of BKZ runs to produce them
    log2_runs: f64,
    mem: f64,
}

// log2(1/ε²) for a dual vector whose inner product has stddev 2^log2_sigma
fn log2_samples_needed(log2_sigma: f64, log2_q: f64) -> f64 {
    let x = 2.0 * (log2_sigma - log2_q);
    if x > 60.0 {
        return f64::INFINITY;
    }
    // ε = exp(-2π²(σ/q)²)
    (4.0 * PI * PI * x.exp2() * LOG2_E).max(0.0)
}

fn dual_search(params: &LweParameters, red_cost_model: CostModel) -> Option<DualPoint> {
    let n = params.n;
    let log2_q = params.log2_q();
    let log2_sigma_e = params.error_stddev().log2();
    // shrink the secret part of the dual lattice when the secret is small
    let log2_c = (params.secret_stddev().log2() - log2_sigma_e).min(0.0);
    let log2_vol = n as f64 * (log2_q + log2_c);
    let candidates = sample_candidates(params.samples_up_to(2 * n));
    let d_max = n + candidates.last().copied().unwrap_or(0);

    let best = minimize_over(MIN_BLOCK_SIZE.min(d_max), d_max, |beta| {
        let log2_delta = delta(beta).log2();
        let mem = red_cost_model.sieve_memory(beta);
        candidates
            .iter()
            .map(|&m| (m, m + n))
            .filter(|&(_, d)| beta <= d)
            .filter_map(|(m, d)| {
                let log2_len = (d as f64 - 1.0) * log2_delta + log2_vol / d as f64;
                let log2_vectors = log2_samples_needed(log2_len + log2_sigma_e, log2_q);
                if !log2_vectors.is_finite() {
                    return None;
                }
                let log2_runs = (log2_vectors - mem).max(0.0);
                let red = red_cost_model.bkz(beta, d);
                let rop = red.repeated(log2_runs) + Rop::bits(log2_vectors + (d as f64).log2());
                Some((
                    rop,
                    DualPoint {
                        beta,
                        m,
                        d,
                        red,
                        log2_vectors,
                        log2_runs,
                        mem,
                    },
                ))
            })
            .min_by(|a, b| a.0.cmp(&b.0))
    });
    best.map(|(_, _, point)| point)
}

/// Plain dual attack.
pub fn dual(params: &LweParameters, red_cost_model: CostModel) -> Result<CostRecord> {
    params.validate()?;
    let point = match dual_search(params, red_cost_model) {
        Some(point) => point,
        None => return Ok(CostRecord::infeasible("dual")),
    };
    let rop = point.red.repeated(point.log2_runs)
        + Rop::bits(point.log2_vectors + (point.d as f64).log2());
    Ok(CostRecord::new(rop)
        .with("mem", CostValue::Log2(point.mem))
        .with("m", point.m)
        .with("β", point.beta)
        .with("d", point.d)
        .with("↻", CostValue::Log2(point.log2_runs))
        .with("tag", "dual"))
}

/// Dual hybrid: guess `ζ` secret coordinates exhaustively and run the dual
/// attack on the rest; every guess is scored against all short vectors.
/// `mitm_optimization` halves the guessing exponent.
pub fn dual_hybrid(
    params: &LweParameters,
    mitm_optimization: bool,
    red_cost_model: CostModel,
) -> Result<CostRecord> {
    params.validate()?;
    let tag = if mitm_optimization {
        "dual_mitm_hybrid"
    } else {
        "dual_hybrid"
    };
    let mut best: Option<CostRecord> = None;

    for zeta in zeta_candidates(params.n / 2) {
        let reduced = params.with_dimension(params.n - zeta);
        let point = match dual_search(&reduced, red_cost_model) {
            Some(point) => point,
            None => continue,
        };
        let (log2_size, log2_prob) = guessing_space(&params.xs, params.n, zeta);
        let search = if mitm_optimization {
            log2_size / 2.0
        } else {
            log2_size
        };
        let lattice = point.red.repeated(point.log2_runs);
        let scoring = Rop::bits(search + point.log2_vectors + (point.d as f64).log2());
        let rop = (lattice + scoring).repeated(-log2_prob);
        trace!(zeta, rop = %rop, tag, "dual hybrid step");

        if best.as_ref().map_or(false, |b| rop >= b.rop()) {
            continue;
        }
        best = Some(
            CostRecord::new(rop)
                .with("mem", CostValue::Log2(point.mem.max(search)))
                .with("m", point.m)
                .with("β", point.beta)
                .with("d", point.d)
                .with("↻", CostValue::Log2(point.log2_runs))
                .with("ζ", zeta)
                .with("tag", tag),
        );
    }

    Ok(best.unwrap_or_else(|| CostRecord::infeasible(tag)))
}
