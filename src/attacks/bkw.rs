//! Blockwise (coded) BKW.
//!
//! Reduces `b` coordinates per step by colliding samples, `t = ⌈n/b⌉`
//! steps in total, then distinguishes the remaining noise. Each step doubles
//! the noise variance.

use std::f64::consts::{LOG2_E, PI};

use crate::cost::{CostRecord, CostValue, Rop};
use crate::error::Result;
use crate::params::LweParameters;

pub fn coded_bkw(params: &LweParameters) -> Result<CostRecord> {
    params.validate()?;
    let n = params.n;
    let log2_q = params.log2_q();
    let log2_sigma = params.error_stddev().log2();

    let mut best: Option<CostRecord> = None;
    for b in 1..=n {
        let t = (n + b - 1) / b;
        // one table of (q^b - 1)/2 entries per step
        let log2_table = b as f64 * log2_q - 1.0;
        // noise stddev after t steps: σ·2^(t/2)
        let x = 2.0 * (log2_sigma + t as f64 / 2.0 - log2_q);
        if x > 60.0 {
            continue;
        }
        let log2_distinguish = (4.0 * PI * PI * x.exp2() * LOG2_E).max(0.0);
        let log2_samples =
            (Rop::bits(log2_table + (t as f64).log2()) + Rop::bits(log2_distinguish)).log2();
        let rop = Rop::bits(log2_samples + ((n * t) as f64).log2());

        if best.as_ref().map_or(false, |r| rop >= r.rop()) {
            continue;
        }
        best = Some(
            CostRecord::new(rop)
                .with("m", CostValue::Log2(log2_samples))
                .with("mem", CostValue::Log2(log2_table + (t as f64).log2() + (n as f64).log2()))
                .with("b", b)
                .with("t1", t)
                .with("tag", "coded-bkw"),
        );
    }

    Ok(best.unwrap_or_else(|| CostRecord::infeasible("coded-bkw")))
}
