//! Secret and error distributions of an LWE instance.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI};

use crate::error::{EstimatorError, Result};
use crate::params::log2_biguint;

/// Coordinate distribution of an LWE secret or error vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum NoiseDistribution {
    /// Discrete Gaussian with standard deviation σ
    DiscreteGaussian { stddev: f64 },
    /// Centred binomial with parameter η
    CenteredBinomial { eta: u64 },
    /// Uniform over the integers in [a, b]
    Uniform { a: i64, b: i64 },
    /// Uniform modulo q
    UniformMod { q: BigUint },
    /// Uniform over {0, 1}
    Binary,
    /// Uniform over {-1, 0, 1}
    Ternary,
    /// Exactly `p` entries +1 and `m` entries -1, rest 0
    SparseTernary { p: u64, m: u64 },
    /// Exactly `hw` entries 1, rest 0
    SparseBinary { hw: u64 },
}

impl NoiseDistribution {
    pub fn discrete_gaussian(stddev: f64) -> Self {
        Self::DiscreteGaussian { stddev }
    }

    pub fn centered_binomial(eta: u64) -> Self {
        Self::CenteredBinomial { eta }
    }

    pub fn uniform(a: i64, b: i64) -> Self {
        Self::Uniform { a, b }
    }

    pub fn sparse_ternary(p: u64, m: u64) -> Self {
        Self::SparseTernary { p, m }
    }

    /// Rejects distributions that are empty or degenerate in dimension `n`.
    pub fn validate(&self, n: usize) -> Result<()> {
        let invalid =
            |reason: String| -> Result<()> { Err(EstimatorError::InvalidParameters(reason)) };
        match self {
            Self::DiscreteGaussian { stddev } if !(stddev.is_finite() && *stddev > 0.0) => {
                invalid(format!("Gaussian standard deviation must be positive, got {}", stddev))
            }
            Self::CenteredBinomial { eta: 0 } => {
                invalid("centred binomial parameter must be positive".to_string())
            }
            Self::Uniform { a, b } if a > b => {
                invalid(format!("uniform range [{}, {}] is empty", a, b))
            }
            Self::UniformMod { q } if *q <= BigUint::from(1u32) => {
                invalid(format!("uniform modulus must exceed 1, got {}", q))
            }
            Self::SparseTernary { p, m } if (*p as u128) + (*m as u128) > n as u128 => {
                invalid(format!("sparse weight {} + {} exceeds dimension {}", p, m, n))
            }
            Self::SparseBinary { hw } if *hw as u128 > n as u128 => {
                invalid(format!("sparse weight {} exceeds dimension {}", hw, n))
            }
            _ => Ok(()),
        }
    }

    /// Standard deviation of one coordinate in dimension `n`.
    pub fn stddev(&self, n: usize) -> f64 {
        match self {
            Self::DiscreteGaussian { stddev } => *stddev,
            Self::CenteredBinomial { eta } => (*eta as f64 / 2.0).sqrt(),
            Self::Uniform { a, b } => {
                let width = uniform_width(*a, *b);
                ((width * width - 1.0) / 12.0).max(0.0).sqrt()
            }
            Self::UniformMod { q } => log2_biguint(q).exp2() / 12f64.sqrt(),
            Self::Binary => 0.5,
            Self::Ternary => (2.0f64 / 3.0).sqrt(),
            Self::SparseTernary { p, m } => ((*p as f64 + *m as f64) / n.max(1) as f64).sqrt(),
            Self::SparseBinary { hw } => {
                let density = *hw as f64 / n.max(1) as f64;
                (density * (1.0 - density)).sqrt()
            }
        }
    }

    /// Inclusive value bounds, `None` for unbounded distributions.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::DiscreteGaussian { .. } => None,
            Self::CenteredBinomial { eta } => Some((-(*eta as f64), *eta as f64)),
            Self::Uniform { a, b } => Some((*a as f64, *b as f64)),
            Self::UniformMod { q } => {
                let half = log2_biguint(q).exp2() / 2.0;
                Some((-half.floor(), half.floor()))
            }
            Self::Binary | Self::SparseBinary { .. } => Some((0.0, 1.0)),
            Self::Ternary | Self::SparseTernary { .. } => Some((-1.0, 1.0)),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds().is_some()
    }

    /// Probability that a coordinate is non-zero.
    pub fn density(&self, n: usize) -> f64 {
        let density = match self {
            Self::DiscreteGaussian { stddev } => 1.0 - 1.0 / (stddev * (2.0 * PI).sqrt()),
            Self::CenteredBinomial { eta } => 1.0 - central_binomial_mass(*eta),
            Self::Uniform { a, b } => {
                if *a <= 0 && 0 <= *b {
                    1.0 - 1.0 / uniform_width(*a, *b)
                } else {
                    1.0
                }
            }
            Self::UniformMod { q } => 1.0 - (-log2_biguint(q)).exp2(),
            Self::Binary => 0.5,
            Self::Ternary => 2.0 / 3.0,
            Self::SparseTernary { p, m } => (*p as f64 + *m as f64) / n.max(1) as f64,
            Self::SparseBinary { hw } => *hw as f64 / n.max(1) as f64,
        };
        density.clamp(0.0, 1.0)
    }

    /// Sparse means fewer than half the coordinates are expected non-zero.
    pub fn is_sparse(&self, n: usize) -> bool {
        self.density(n) < 0.5
    }

    /// Number of non-zero coordinates, expected value for dense distributions.
    pub fn hamming_weight(&self, n: usize) -> u64 {
        match self {
            Self::SparseTernary { p, m } => p.saturating_add(*m),
            Self::SparseBinary { hw } => *hw,
            _ => (self.density(n) * n as f64).round() as u64,
        }
    }

    /// Bits of guessing work per coordinate.
    pub fn log2_support(&self, n: usize) -> f64 {
        match self.bounds() {
            Some((a, b)) => (b - a + 1.0).log2(),
            None => (self.stddev(n) * (2.0 * PI * E).sqrt()).log2().max(1.0),
        }
    }
}

/// Number of integers in `[a, b]`, exact over the whole `i64` range.
fn uniform_width(a: i64, b: i64) -> f64 {
    (b as i128 - a as i128 + 1) as f64
}

fn central_binomial_mass(eta: u64) -> f64 {
    // C(2η, η) / 4^η evaluated in log space
    let mut log2_c = 0.0f64;
    for i in 1..=eta {
        log2_c += ((eta + i) as f64).log2() - (i as f64).log2();
    }
    (log2_c - 2.0 * eta as f64).exp2()
}
