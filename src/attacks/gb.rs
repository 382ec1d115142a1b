//! Arora-GB: turn each sample with bounded error into a polynomial equation
//! of degree D (the error support size) and solve the system by
//! linearisation or Gröbner bases.

use std::f64::consts::SQRT_2;

use tracing::trace;

use super::log2_binomial;
use crate::cost::{CostRecord, CostValue, Rop};
use crate::error::Result;
use crate::params::{LweParameters, UNLIMITED_SAMPLES};

/// Linear algebra exponent
const OMEGA: f64 = 2.0;

/// Largest Gaussian tail cut tried, in multiples of σ
const MAX_TAIL_CUT: f64 = 6.0;

/// Equations of higher degree are not modelled; the attack is infeasible.
const MAX_DEGREE: usize = 1 << 16;

#[derive(Clone, Copy, Debug)]
struct GbCost {
    rop: f64,
    dreg: usize,
    mem: f64,
    log2_m: f64,
}

/// First degree where the Hilbert series of `m` semi-regular equations of
/// degree `degree` in `n` variables is non-positive.
fn degree_of_regularity(n: usize, degree: usize, m: f64) -> Option<usize> {
    let d_max = n.saturating_add(degree).min(512);
    let mut series = vec![0.0f64; d_max + 1];
    // (1 - z^D)^m
    let mut coeff = 1.0f64;
    let mut k = 0usize;
    while k * degree <= d_max {
        series[k * degree] = coeff;
        coeff *= -(m - k as f64) / (k as f64 + 1.0);
        k += 1;
    }
    // divide by (1 - z)^n
    for _ in 0..n {
        for i in 1..=d_max {
            series[i] += series[i - 1];
        }
    }
    for (d, c) in series.iter().enumerate() {
        if !c.is_finite() {
            return None;
        }
        if *c <= 0.0 {
            return Some(d);
        }
    }
    None
}

fn gb_cost(n: usize, degree: usize, log2_m: f64) -> Option<GbCost> {
    if degree == 0 || degree > MAX_DEGREE {
        return None;
    }
    let log2_monomials = log2_binomial(n.checked_add(degree)? as u64, degree as u64);
    if log2_m >= log2_monomials {
        return Some(GbCost {
            rop: OMEGA * log2_monomials,
            dreg: degree,
            mem: 2.0 * log2_monomials,
            log2_m: log2_monomials,
        });
    }
    let dreg = degree_of_regularity(n, degree, log2_m.exp2())?;
    let log2_size = log2_binomial(n.checked_add(dreg)? as u64, dreg as u64);
    Some(GbCost {
        rop: OMEGA * log2_size,
        dreg,
        mem: 2.0 * log2_size,
        log2_m,
    })
}

fn log2_samples(params: &LweParameters) -> f64 {
    if params.m == UNLIMITED_SAMPLES {
        f64::INFINITY
    } else {
        (params.m as f64).log2()
    }
}

fn record(cost: GbCost, t: u64) -> CostRecord {
    CostRecord::new(Rop::bits(cost.rop))
        .with("dreg", cost.dreg)
        .with("mem", CostValue::Log2(cost.mem))
        .with("t", t)
        .with("m", CostValue::Log2(cost.log2_m))
        .with("tag", "arora-gb")
}

/// Arora-GB on bounded errors only.
pub fn cost_bounded(params: &LweParameters) -> Result<CostRecord> {
    params.validate()?;
    let (lo, hi) = match params.xe.bounds() {
        Some(bounds) => bounds,
        None => return Ok(CostRecord::infeasible("arora-gb")),
    };
    let width = hi - lo + 1.0;
    if !width.is_finite() || width > MAX_DEGREE as f64 {
        trace!(width, "arora-gb degree out of range");
        return Ok(CostRecord::infeasible("arora-gb"));
    }
    let degree = width as usize;
    let t = ((hi - lo) / 2.0).ceil() as u64;
    Ok(match gb_cost(params.n, degree, log2_samples(params)) {
        Some(cost) => record(cost, t),
        None => CostRecord::infeasible("arora-gb"),
    })
}

/// Arora-GB. Unbounded (Gaussian) errors are cut at `t·σ` and the attack is
/// repeated until every used sample falls inside the cut, unless
/// `bounded_only` is set.
pub fn arora_gb(params: &LweParameters, bounded_only: bool) -> Result<CostRecord> {
    if params.error_is_bounded() || bounded_only {
        return cost_bounded(params);
    }
    params.validate()?;
    let sigma = params.error_stddev();
    let max_b = ((MAX_TAIL_CUT * sigma).ceil() as u64).clamp(1, 64);

    let mut best: Option<CostRecord> = None;
    for b in 1..=max_b {
        let degree = (2 * b + 1) as usize;
        let log2_in_bounds = erf(b as f64 / (sigma * SQRT_2)).log2().min(0.0);
        let cost = match gb_cost(params.n, degree, log2_samples(params)) {
            Some(cost) => cost,
            None => continue,
        };
        let repetitions = -(cost.log2_m.exp2() * log2_in_bounds);
        let rop = Rop::bits(cost.rop).repeated(repetitions);
        trace!(b, rop = %rop, "arora-gb tail cut");
        if best.as_ref().map_or(false, |r| rop >= r.rop()) {
            continue;
        }
        best = Some(record(cost, b).with("rop", rop).with("↻", CostValue::Log2(repetitions)));
    }
    Ok(best.unwrap_or_else(|| CostRecord::infeasible("arora-gb")))
}

// Abramowitz & Stegun 7.1.26, |error| < 1.5e-7
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}
