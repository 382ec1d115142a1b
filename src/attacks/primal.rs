//! Primal attacks: embed the LWE instance into a lattice and reduce it.
//!
//! The secret is rescaled so that every coordinate of the target vector has
//! the error's standard deviation σe. A block size β recovers the target
//! when σe·√β fits under the reduced basis profile at index d - β (uSVP), or
//! when an SVP call in dimension η on the last projected block does (BDD).

use tracing::trace;

use super::guess::{guessing_space, zeta_candidates};
use super::{first_satisfying, minimize_over, sample_candidates};
use crate::cost::{CostRecord, CostValue, Rop};
use crate::error::Result;
use crate::params::LweParameters;
use crate::reduction::{delta, CostModel, ShapeModel, MIN_BLOCK_SIZE};

/// Kannan embedding using `m` samples.
#[derive(Clone, Copy, Debug)]
struct Embedding {
    m: usize,
    d: usize,
    log2_vol: f64,
}

fn embeddings(params: &LweParameters) -> Vec<Embedding> {
    let log2_q = params.log2_q();
    // scale small secrets up to the error size
    let log2_nu = (params.error_stddev().log2() - params.secret_stddev().log2()).max(0.0);
    let cap = params.samples_up_to(4 * params.n);
    sample_candidates(cap)
        .into_iter()
        .map(|m| Embedding {
            m,
            d: m + params.n + 1,
            log2_vol: m as f64 * log2_q + params.n as f64 * log2_nu,
        })
        .collect()
}

struct Profile<'a> {
    shape: ShapeModel,
    log2_q: f64,
    log2_sigma: f64,
    embedding: &'a Embedding,
}

impl Profile<'_> {
    fn norm(&self, i: usize, beta: usize) -> f64 {
        let e = self.embedding;
        self.shape.log2_norm(i, beta, e.d, e.log2_vol, self.log2_q)
    }

    /// Projected target of dimension `k` is shorter than ‖b*_{d-k}‖.
    fn decodes(&self, beta: usize, k: usize) -> bool {
        let d = self.embedding.d;
        k <= d && self.log2_sigma + 0.5 * (k as f64).log2() <= self.norm(d - k, beta)
    }

    /// Every Gram-Schmidt vector is longer than the error, so Babai's
    /// nearest plane succeeds.
    fn babai_decodes(&self, beta: usize) -> bool {
        self.log2_sigma + 1.0 <= self.norm(self.embedding.d - 1, beta)
    }
}

fn profile<'a>(params: &LweParameters, shape: ShapeModel, e: &'a Embedding) -> Profile<'a> {
    Profile {
        shape,
        log2_q: params.log2_q(),
        log2_sigma: params.error_stddev().log2(),
        embedding: e,
    }
}

/// Primal attack via unique-SVP.
pub fn primal_usvp(
    params: &LweParameters,
    red_cost_model: CostModel,
    red_shape_model: ShapeModel,
) -> Result<CostRecord> {
    params.validate()?;
    let embeddings = embeddings(params);
    let d_max = embeddings.iter().map(|e| e.d).max().unwrap_or(params.n + 1);

    let solving = |beta: usize| {
        embeddings
            .iter()
            .find(|e| beta <= e.d && profile(params, red_shape_model, e).decodes(beta, beta))
    };

    let beta = first_satisfying(MIN_BLOCK_SIZE.min(d_max), d_max, |beta| solving(beta).is_some());
    let (beta, e) = match beta.and_then(|beta| solving(beta).map(|e| (beta, *e))) {
        Some(found) => found,
        None => return Ok(CostRecord::infeasible("usvp")),
    };

    let red = red_cost_model.bkz(beta, e.d);
    trace!(beta, d = e.d, m = e.m, "usvp solution");
    Ok(CostRecord::new(red)
        .with("red", red)
        .with("δ", CostValue::Real(delta(beta)))
        .with("β", beta)
        .with("d", e.d)
        .with("tag", "usvp"))
}

/// Result of a reduction + decoding search.
#[derive(Clone, Copy, Debug)]
struct Decoding {
    beta: usize,
    eta: usize,
    d: usize,
    red: Rop,
    /// log2 cost of one decoding step (SVP-η or Babai)
    decode: f64,
}

/// Cheapest BKZ-β + decoding combination. With `babai` the decoding step is
/// nearest-plane at cost d², otherwise one SVP call in dimension η.
fn decoding_search(
    params: &LweParameters,
    babai: bool,
    red_cost_model: CostModel,
    red_shape_model: ShapeModel,
) -> Option<Decoding> {
    let embeddings = embeddings(params);
    let d_max = embeddings.iter().map(|e| e.d).max()?;
    let lo = MIN_BLOCK_SIZE.min(d_max);

    let best = minimize_over(lo, d_max, |beta| {
        embeddings
            .iter()
            .filter(|e| beta <= e.d)
            .filter_map(|e| {
                let p = profile(params, red_shape_model, e);
                let (eta, decode) = if babai {
                    if !p.babai_decodes(beta) {
                        return None;
                    }
                    (e.d, 2.0 * (e.d as f64).log2())
                } else {
                    let eta = first_satisfying(lo.min(e.d), e.d, |eta| p.decodes(beta, eta))?;
                    (eta, red_cost_model.svp(eta))
                };
                let red = red_cost_model.bkz(beta, e.d);
                Some((red + Rop::bits(decode), Decoding { beta, eta, d: e.d, red, decode }))
            })
            .min_by(|a, b| a.0.cmp(&b.0))
    });
    best.map(|(_, _, decoding)| decoding)
}

/// Primal attack via bounded distance decoding: BKZ-β followed by one
/// SVP-η call on the last block.
pub fn primal_bdd(
    params: &LweParameters,
    red_cost_model: CostModel,
    red_shape_model: ShapeModel,
) -> Result<CostRecord> {
    params.validate()?;
    let found = match decoding_search(params, false, red_cost_model, red_shape_model) {
        Some(found) => found,
        None => return Ok(CostRecord::infeasible("bdd")),
    };
    Ok(CostRecord::new(found.red + Rop::bits(found.decode))
        .with("red", found.red)
        .with("svp", CostValue::Log2(found.decode))
        .with("β", found.beta)
        .with("η", found.eta)
        .with("d", found.d)
        .with("tag", "bdd"))
}

/// Primal hybrid: guess `ζ` secret coordinates, decode the rest.
///
/// `mitm` searches the guessed block by meet-in-the-middle (square root of
/// the search space); `babai` decodes each guess with nearest-plane instead
/// of an SVP call.
pub fn primal_hybrid(
    params: &LweParameters,
    mitm: bool,
    babai: bool,
    red_cost_model: CostModel,
    red_shape_model: ShapeModel,
) -> Result<CostRecord> {
    params.validate()?;
    let mut best: Option<CostRecord> = None;

    for zeta in zeta_candidates(params.n / 2) {
        let reduced = params.with_dimension(params.n - zeta);
        let found = match decoding_search(&reduced, babai, red_cost_model, red_shape_model) {
            Some(found) => found,
            None => continue,
        };
        let (log2_size, log2_prob) = guessing_space(&params.xs, params.n, zeta);
        let search = if mitm { log2_size / 2.0 } else { log2_size };
        let repetitions = -log2_prob;
        let rop = (found.red + Rop::bits(search + found.decode)).repeated(repetitions);

        if best.as_ref().map_or(false, |b| rop >= b.rop()) {
            continue;
        }
        best = Some(
            CostRecord::new(rop)
                .with("red", found.red)
                .with("svp", CostValue::Log2(found.decode))
                .with("β", found.beta)
                .with("η", found.eta)
                .with("ζ", zeta)
                .with("|S|", CostValue::Log2(log2_size))
                .with("d", found.d)
                .with("prob", CostValue::Log2(log2_prob))
                .with("↻", CostValue::Log2(repetitions))
                .with("tag", "hybrid"),
        );
    }

    Ok(best.unwrap_or_else(|| CostRecord::infeasible("hybrid")))
}
