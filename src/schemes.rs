//! Published parameter sets, for callers, tests and benches.

use num_bigint::BigUint;

use crate::distribution::NoiseDistribution;
use crate::params::{LweParameters, Norm, SisParameters};

fn lwe(n: usize, q: BigUint, m: u64, xs: NoiseDistribution, xe: NoiseDistribution, tag: &str) -> LweParameters {
    LweParameters {
        n,
        q,
        m,
        xs,
        xe,
        tag: Some(tag.to_string()),
    }
}

fn pow2(bits: usize) -> BigUint {
    BigUint::from(1u32) << bits
}

pub fn kyber512() -> LweParameters {
    lwe(
        512,
        BigUint::from(3329u32),
        512,
        NoiseDistribution::centered_binomial(3),
        NoiseDistribution::centered_binomial(3),
        "Kyber 512",
    )
}

pub fn kyber768() -> LweParameters {
    lwe(
        768,
        BigUint::from(3329u32),
        768,
        NoiseDistribution::centered_binomial(2),
        NoiseDistribution::centered_binomial(2),
        "Kyber 768",
    )
}

pub fn kyber1024() -> LweParameters {
    lwe(
        1024,
        BigUint::from(3329u32),
        1024,
        NoiseDistribution::centered_binomial(2),
        NoiseDistribution::centered_binomial(2),
        "Kyber 1024",
    )
}

pub fn frodo640() -> LweParameters {
    lwe(
        640,
        pow2(15),
        640 + 16,
        NoiseDistribution::discrete_gaussian(2.8),
        NoiseDistribution::discrete_gaussian(2.8),
        "FrodoKEM-640",
    )
}

/// Sparse ternary secret with Hamming weight 64, the usual shape of
/// homomorphic-encryption parameter sets.
pub fn he_sparse_2048() -> LweParameters {
    lwe(
        2048,
        pow2(54),
        4096,
        NoiseDistribution::sparse_ternary(32, 32),
        NoiseDistribution::discrete_gaussian(3.19),
        "HE 2048 sparse",
    )
}

/// Module-SIS instance behind Dilithium2 unforgeability.
pub fn dilithium2_msis() -> SisParameters {
    SisParameters {
        n: 1024,
        q: BigUint::from(8380417u32),
        m: 2304,
        length_bound: 350209.0,
        norm: Norm::L2,
        tag: Some("Dilithium2 MSIS".to_string()),
    }
}

/// The SIS instance of a Falcon-512 signature forgery.
pub fn falcon512_sis() -> SisParameters {
    SisParameters {
        n: 512,
        q: BigUint::from(12289u32),
        m: 1024,
        length_bound: 5833.9072,
        norm: Norm::L2,
        tag: Some("Falcon 512 SIS".to_string()),
    }
}
