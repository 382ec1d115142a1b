//! Lattice attack on SIS: reduce a basis of the q-ary lattice
//! Λ⊥(A) = {x ∈ Z^d : A x = 0 mod q} built from `d <= m` columns until its
//! first vector meets the length bound.

use super::{first_satisfying, sample_candidates};
use crate::cost::{CostRecord, CostValue, Rop};
use crate::error::Result;
use crate::params::{Norm, SisParameters};
use crate::reduction::{delta, CostModel, ShapeModel, MIN_BLOCK_SIZE};

pub fn sis_lattice(
    params: &SisParameters,
    red_cost_model: CostModel,
    red_shape_model: ShapeModel,
) -> Result<CostRecord> {
    params.validate()?;
    let tag = match params.norm {
        Norm::L2 => "euclidean",
        Norm::Linf => "infinity",
    };
    let log2_q = params.log2_q();
    let log2_bound = params.length_bound.log2();

    // q·e_1 is always a solution
    if log2_q <= log2_bound {
        return Ok(CostRecord::new(Rop::ONE)
            .with("β", 1u64)
            .with("d", 1u64)
            .with("tag", tag));
    }

    let dims = sample_candidates(params.m);
    let first_length = |beta: usize, d: usize| {
        let log2_vol = params.n.min(d) as f64 * log2_q;
        let log2_len = red_shape_model.log2_norm(0, beta, d, log2_vol, log2_q);
        match params.norm {
            Norm::L2 => log2_len,
            // a random-looking vector of ℓ2 norm ℓ has entries of size ℓ/√d
            Norm::Linf => log2_len - 0.5 * (d as f64).log2(),
        }
    };
    let solving = |beta: usize| {
        dims.iter()
            .copied()
            .filter(|&d| beta <= d)
            .find(|&d| first_length(beta, d) <= log2_bound)
    };

    let d_max = params.m;
    let beta = first_satisfying(MIN_BLOCK_SIZE.min(d_max), d_max, |b| solving(b).is_some());
    let (beta, d) = match beta.and_then(|b| solving(b).map(|d| (b, d))) {
        Some(found) => found,
        None => return Ok(CostRecord::infeasible(tag)),
    };

    let red = red_cost_model.bkz(beta, d);
    Ok(CostRecord::new(red)
        .with("red", red)
        .with("δ", CostValue::Real(delta(beta)))
        .with("β", beta)
        .with("d", d)
        .with("tag", tag))
}
