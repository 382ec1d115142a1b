//! Attack cost models and their dispatch table.
//!
//! Each problem family has a closed set of attack variants ([`LweAttack`],
//! [`SisAttack`]) plus a `Custom` escape hatch for caller-supplied attacks.
//! The variant together with its bound options determines a canonical
//! identity string; the batch layer keys raw results by that string.
//!
//! LWE Attacks:
//! - **Primal** ([`primal`]): uSVP, BDD and the primal hybrid on the Kannan embedding
//! - **Dual** ([`dual`]): short dual vectors distinguish samples; the hybrid guesses part of the secret
//! - **Coded-BKW** ([`bkw`]): blockwise sample combination with lattice-code quantisation
//! - **Arora-GB** ([`gb`]): bounded errors as polynomial equations, solved by linearisation or Gröbner bases
//! - **Guess composition** ([`guess`]): guess zero coordinates of a sparse secret, then run the inner attack
//!
//! SIS Attacks:
//! - **Lattice** ([`sis`]): BKZ on the q-ary SIS lattice, for ℓ2 and ℓ∞ bounds
//!
//! Search Helpers:
//! - **Binary search** for the smallest block size meeting a monotone condition (`first_satisfying`)
//! - **Coarse/fine minimisation** of non-monotone block-size costs (`minimize_over`)
//! - **Log binomials** for guessing-space sizes (`log2_binomial`)
//!
//! Every cost model returns `rop = +inf` for parameter sets it cannot
//! attack rather than an error; errors are reserved for invalid input.

pub mod bkw;
pub mod dual;
pub mod gb;
pub mod guess;
pub mod primal;
pub mod sis;

use std::fmt;
use std::sync::Arc;

use crate::cost::{CostRecord, Rop};
use crate::error::Result;
use crate::params::{LweParameters, SisParameters};
use crate::reduction::{CostModel, ShapeModel};

/// An attack that can be costed against parameter sets of type `P`.
pub trait Attack<P>: Send + Sync + fmt::Debug {
    /// Stable identifier, equal for equally-configured attacks.
    fn identity(&self) -> String;

    fn estimate(&self, params: &P) -> Result<CostRecord>;
}

/// Attacks against LWE.
#[derive(Clone, Debug)]
pub enum LweAttack {
    PrimalUsvp {
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    },
    PrimalBdd {
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    },
    PrimalHybrid {
        mitm: bool,
        babai: bool,
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    },
    Dual {
        red_cost_model: CostModel,
    },
    DualHybrid {
        mitm_optimization: bool,
        red_cost_model: CostModel,
    },
    CodedBkw,
    /// Arora-GB; `bounded_only` skips the Gaussian-to-bounded reduction
    AroraGb {
        bounded_only: bool,
    },
    /// Guess zero coordinates of a sparse secret, then run the inner attack
    GuessComposition(Box<LweAttack>),
    Custom(Arc<dyn Attack<LweParameters>>),
}

impl LweAttack {
    pub fn guess_composed(self) -> Self {
        LweAttack::GuessComposition(Box::new(self))
    }
}

impl Attack<LweParameters> for LweAttack {
    fn identity(&self) -> String {
        match self {
            LweAttack::PrimalUsvp {
                red_cost_model,
                red_shape_model,
            } => format!(
                "primal_usvp(red_cost_model={}, red_shape_model={})",
                red_cost_model, red_shape_model
            ),
            LweAttack::PrimalBdd {
                red_cost_model,
                red_shape_model,
            } => format!(
                "primal_bdd(red_cost_model={}, red_shape_model={})",
                red_cost_model, red_shape_model
            ),
            LweAttack::PrimalHybrid {
                mitm,
                babai,
                red_cost_model,
                red_shape_model,
            } => format!(
                "primal_hybrid(mitm={}, babai={}, red_cost_model={}, red_shape_model={})",
                mitm, babai, red_cost_model, red_shape_model
            ),
            LweAttack::Dual { red_cost_model } => {
                format!("dual(red_cost_model={})", red_cost_model)
            }
            LweAttack::DualHybrid {
                mitm_optimization,
                red_cost_model,
            } => format!(
                "dual_hybrid(mitm_optimization={}, red_cost_model={})",
                mitm_optimization, red_cost_model
            ),
            LweAttack::CodedBkw => "coded_bkw".to_string(),
            LweAttack::AroraGb { bounded_only: true } => "arora_gb.cost_bounded".to_string(),
            LweAttack::AroraGb { bounded_only: false } => "arora_gb".to_string(),
            LweAttack::GuessComposition(inner) => {
                format!("guess_composition({})", inner.identity())
            }
            LweAttack::Custom(attack) => format!("custom:{}", attack.identity()),
        }
    }

    fn estimate(&self, params: &LweParameters) -> Result<CostRecord> {
        match self {
            LweAttack::PrimalUsvp {
                red_cost_model,
                red_shape_model,
            } => primal::primal_usvp(params, *red_cost_model, *red_shape_model),
            LweAttack::PrimalBdd {
                red_cost_model,
                red_shape_model,
            } => primal::primal_bdd(params, *red_cost_model, *red_shape_model),
            LweAttack::PrimalHybrid {
                mitm,
                babai,
                red_cost_model,
                red_shape_model,
            } => primal::primal_hybrid(params, *mitm, *babai, *red_cost_model, *red_shape_model),
            LweAttack::Dual { red_cost_model } => dual::dual(params, *red_cost_model),
            LweAttack::DualHybrid {
                mitm_optimization,
                red_cost_model,
            } => dual::dual_hybrid(params, *mitm_optimization, *red_cost_model),
            LweAttack::CodedBkw => bkw::coded_bkw(params),
            LweAttack::AroraGb { bounded_only } => gb::arora_gb(params, *bounded_only),
            LweAttack::GuessComposition(inner) => {
                guess::guess_composition(params, |reduced| inner.estimate(reduced))
            }
            LweAttack::Custom(attack) => attack.estimate(params),
        }
    }
}

/// Attacks against SIS / NTRU-style instances.
#[derive(Clone, Debug)]
pub enum SisAttack {
    Lattice {
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    },
    Custom(Arc<dyn Attack<SisParameters>>),
}

impl Attack<SisParameters> for SisAttack {
    fn identity(&self) -> String {
        match self {
            SisAttack::Lattice {
                red_cost_model,
                red_shape_model,
            } => format!(
                "sis_lattice(red_cost_model={}, red_shape_model={})",
                red_cost_model, red_shape_model
            ),
            SisAttack::Custom(attack) => format!("custom:{}", attack.identity()),
        }
    }

    fn estimate(&self, params: &SisParameters) -> Result<CostRecord> {
        match self {
            SisAttack::Lattice {
                red_cost_model,
                red_shape_model,
            } => sis::sis_lattice(params, *red_cost_model, *red_shape_model),
            SisAttack::Custom(attack) => attack.estimate(params),
        }
    }
}

/// Smallest `x` in `lo..=hi` with `ok(x)`, assuming `ok` is monotone.
pub(crate) fn first_satisfying(lo: usize, hi: usize, ok: impl Fn(usize) -> bool) -> Option<usize> {
    if lo > hi || !ok(hi) {
        return None;
    }
    let (mut lo, mut hi) = (lo, hi);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if ok(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(lo)
}

/// Minimises `eval` over `lo..=hi`: a coarse scan followed by a unit-step
/// scan around the best coarse point.
pub(crate) fn minimize_over<T>(
    lo: usize,
    hi: usize,
    eval: impl Fn(usize) -> Option<(Rop, T)>,
) -> Option<(usize, Rop, T)> {
    if lo > hi {
        return None;
    }
    let step = ((hi - lo) / 64).max(1);
    let mut best: Option<(usize, Rop, T)> = None;
    let consider = |x: usize, best: &mut Option<(usize, Rop, T)>| {
        if let Some((rop, extra)) = eval(x) {
            if best.as_ref().map_or(true, |(_, b, _)| rop < *b) {
                *best = Some((x, rop, extra));
            }
        }
    };

    let mut x = lo;
    while x <= hi {
        consider(x, &mut best);
        x += step;
    }
    consider(hi, &mut best);

    if step > 1 {
        if let Some(centre) = best.as_ref().map(|(x, _, _)| *x) {
            let from = centre.saturating_sub(step).max(lo);
            let to = (centre + step).min(hi);
            for x in from..=to {
                consider(x, &mut best);
            }
        }
    }
    best
}

/// Embedding sample counts tried by the lattice attacks.
pub(crate) fn sample_candidates(max: usize) -> Vec<usize> {
    let step = (max / 32).max(1);
    let mut out: Vec<usize> = (1..=max).step_by(step).collect();
    if out.last() != Some(&max) && max > 0 {
        out.push(max);
    }
    out
}

/// log2 C(n, k)
pub(crate) fn log2_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (1..=k).map(|i| ((n - k + i) as f64).log2() - (i as f64).log2()).sum()
}
