//! Attack-cost estimation for LWE and SIS/NTRU parameter sets.
//!
//! ```no_run
//! use lattice_estimate::{lwe, schemes, EstimateOptions};
//!
//! let params = schemes::kyber512();
//! let rough = lwe::rough(&params, 1)?;
//! let full = lwe::estimate(&params, &EstimateOptions::default().with_jobs(4))?;
//! println!("rough {:?} full {:?}", rough.security_level(), full.security_level());
//! # Ok::<(), lattice_estimate::EstimatorError>(())
//! ```

pub mod assemble;
pub mod attacks;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod distribution;
pub mod dominance;
pub mod error;
pub mod estimate;
pub mod params;
pub mod reduction;
pub mod report;
pub mod schemes;

#[cfg(test)]
mod integration_tests;

pub use assemble::{assemble, Estimates};
pub use attacks::{Attack, LweAttack, SisAttack};
pub use batch::{batch_estimate, BatchOptions, BatchResult};
pub use catalog::{AttackSpec, Catalog};
pub use config::EstimatorConfig;
pub use cost::{CostRecord, CostValue, Rop};
pub use distribution::NoiseDistribution;
pub use dominance::{retained, DominanceRule, LWE_FULL_RULES};
pub use error::{EstimatorError, Result};
pub use estimate::{lwe, run, sis, EstimateOptions, Lwe, Mode, ProblemFamily, Sis};
pub use params::{LweParameters, Norm, SisParameters, UNLIMITED_SAMPLES};
pub use reduction::{CostModel, ShapeModel};
pub use report::Report;
