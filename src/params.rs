//! Parameter sets for the two problem families.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::distribution::NoiseDistribution;
use crate::error::{EstimatorError, Result};

/// Sample count meaning "as many samples as the attack wants"
pub const UNLIMITED_SAMPLES: u64 = u64::MAX;

/// log2 of an arbitrary-precision integer, accurate to f64 precision.
pub fn log2_biguint(x: &BigUint) -> f64 {
    if x.is_zero() {
        return f64::NEG_INFINITY;
    }
    let bits = x.bits();
    if bits <= 64 {
        return x.to_f64().unwrap_or(f64::INFINITY).log2();
    }
    let shift = bits - 64;
    let top = (x >> shift).to_f64().unwrap_or(f64::INFINITY);
    top.log2() + shift as f64
}

/// An LWE instance: `m` samples `(a, <a, s> + e mod q)` in dimension `n`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LweParameters {
    pub n: usize,
    pub q: BigUint,
    pub m: u64,
    pub xs: NoiseDistribution,
    pub xe: NoiseDistribution,
    #[serde(default)]
    pub tag: Option<String>,
}

impl LweParameters {
    pub fn new(
        n: usize,
        q: impl Into<BigUint>,
        m: u64,
        xs: NoiseDistribution,
        xe: NoiseDistribution,
    ) -> Result<Self> {
        let params = Self {
            n,
            q: q.into(),
            m,
            xs,
            xe,
            tag: None,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(EstimatorError::InvalidParameters(
                "LWE dimension must be positive".to_string(),
            ));
        }
        if self.q <= BigUint::from(1u32) {
            return Err(EstimatorError::InvalidParameters(format!(
                "LWE modulus must exceed 1, got {}",
                self.q
            )));
        }
        if self.m == 0 {
            return Err(EstimatorError::InvalidParameters(
                "LWE sample count must be positive".to_string(),
            ));
        }
        self.xs.validate(self.n)?;
        self.xe.validate(self.n)?;
        Ok(())
    }

    pub fn log2_q(&self) -> f64 {
        log2_biguint(&self.q)
    }

    pub fn secret_is_sparse(&self) -> bool {
        self.xs.is_sparse(self.n)
    }

    pub fn error_is_bounded(&self) -> bool {
        self.xe.is_bounded()
    }

    pub fn secret_stddev(&self) -> f64 {
        self.xs.stddev(self.n)
    }

    pub fn error_stddev(&self) -> f64 {
        self.xe.stddev(self.n)
    }

    /// `m > n²`, the sample regime where linearisation attacks apply.
    pub fn samples_exceed_dimension_squared(&self) -> bool {
        (self.m as u128) > (self.n as u128) * (self.n as u128)
    }

    /// Same instance with `n` reduced, as left behind after guessing
    /// coordinates of the secret. Exact-weight secrets keep their weight.
    pub fn with_dimension(&self, n: usize) -> Self {
        let mut params = self.clone();
        params.n = n;
        params
    }

    /// Usable samples, capped at `cap` for lattice embeddings.
    pub fn samples_up_to(&self, cap: usize) -> usize {
        if self.m >= cap as u64 {
            cap
        } else {
            self.m as usize
        }
    }
}

impl fmt::Display for LweParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = if self.m == UNLIMITED_SAMPLES {
            "+Infinity".to_string()
        } else {
            self.m.to_string()
        };
        write!(f, "LWE(n={}, q={}, m={}, Xs={:?}, Xe={:?}", self.n, self.q, m, self.xs, self.xe)?;
        if let Some(tag) = &self.tag {
            write!(f, ", tag={}", tag)?;
        }
        write!(f, ")")
    }
}

/// Norm in which an SIS solution is bounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    L2,
    Linf,
}

/// An SIS instance: find non-zero `x` in Z^m with `A x = 0 mod q` and
/// `‖x‖ <= length_bound`, where A is `n × m`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SisParameters {
    pub n: usize,
    pub q: BigUint,
    pub m: usize,
    pub length_bound: f64,
    pub norm: Norm,
    #[serde(default)]
    pub tag: Option<String>,
}

impl SisParameters {
    pub fn new(
        n: usize,
        q: impl Into<BigUint>,
        m: usize,
        length_bound: f64,
        norm: Norm,
    ) -> Result<Self> {
        let params = Self {
            n,
            q: q.into(),
            m,
            length_bound,
            norm,
            tag: None,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 || self.m == 0 {
            return Err(EstimatorError::InvalidParameters(format!(
                "SIS dimensions must be positive, got n={} m={}",
                self.n, self.m
            )));
        }
        if self.q <= BigUint::from(1u32) {
            return Err(EstimatorError::InvalidParameters(format!(
                "SIS modulus must exceed 1, got {}",
                self.q
            )));
        }
        if !(self.length_bound > 0.0) {
            return Err(EstimatorError::InvalidParameters(format!(
                "SIS length bound must be positive, got {}",
                self.length_bound
            )));
        }
        Ok(())
    }

    pub fn log2_q(&self) -> f64 {
        log2_biguint(&self.q)
    }
}

impl fmt::Display for SisParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SIS(n={}, q={}, m={}, length_bound={}, norm={:?}",
            self.n, self.q, self.m, self.length_bound, self.norm
        )?;
        if let Some(tag) = &self.tag {
            write!(f, ", tag={}", tag)?;
        }
        write!(f, ")")
    }
}
