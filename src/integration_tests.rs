//! End-to-end tests of the estimate pipeline: catalog selection, patching,
//! batch evaluation, assembly, dominance filtering and reporting.
//!
//! Synthetic attacks with fixed costs stand in for the cost models wherever a
//! test is about orchestration rather than numbers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::attacks::Attack;
use crate::catalog;
use crate::cost::{CostRecord, Rop};
use crate::distribution::NoiseDistribution;
use crate::error::{EstimatorError, Result};
use crate::estimate::{run, EstimateOptions, Lwe, Mode, Sis};
use crate::params::{LweParameters, Norm, SisParameters, UNLIMITED_SAMPLES};

const FULL_LWE: [&str; 9] = [
    "arora-gb",
    "bkw",
    "usvp",
    "bdd",
    "bdd_hybrid",
    "bdd_mitm_hybrid",
    "dual",
    "dual_hybrid",
    "dual_mitm_hybrid",
];

/// Returns a fixed cost and counts its calls.
#[derive(Debug, Clone)]
struct Fixed {
    id: String,
    rop: f64,
    calls: Arc<AtomicUsize>,
}

impl Fixed {
    fn new(id: &str, rop: f64) -> Self {
        Self {
            id: id.to_string(),
            rop,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<P> Attack<P> for Fixed {
    fn identity(&self) -> String {
        format!("fixed:{}", self.id)
    }

    fn estimate(&self, _params: &P) -> Result<CostRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CostRecord::new(Rop::bits(self.rop)).with("tag", self.id.as_str()))
    }
}

#[derive(Debug)]
struct Failing;

impl<P> Attack<P> for Failing {
    fn identity(&self) -> String {
        "failing".to_string()
    }

    fn estimate(&self, _params: &P) -> Result<CostRecord> {
        Err(EstimatorError::attack_failed("failing", "cost model diverged"))
    }
}

fn toy_lwe(xs: NoiseDistribution) -> LweParameters {
    LweParameters::new(96, 3329u32, 192, xs, NoiseDistribution::centered_binomial(2)).unwrap()
}

fn toy_sis() -> SisParameters {
    SisParameters::new(256, 12289u32, 512, 3000.0, Norm::L2).unwrap()
}

/// Full LWE options with every real attack replaced by the given synthetic
/// entries.
fn synthetic_full(entries: &[(&str, f64)]) -> EstimateOptions<LweParameters> {
    let mut options = EstimateOptions::default();
    for name in FULL_LWE {
        options = options.deny(name);
    }
    for (name, rop) in entries {
        options = options.add(name, Fixed::new(name, *rop));
    }
    options
}

fn names(estimates: &crate::assemble::Estimates) -> Vec<String> {
    estimates.names().map(str::to_string).collect()
}

#[test]
fn test_rough_dense_secret_has_dual_hybrid_only() {
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let (estimates, _) = run::<Lwe>(&params, Mode::Rough, &EstimateOptions::default()).unwrap();
    assert!(!estimates.contains("hybrid"));
    assert!(!estimates.contains("dual_mitm_hybrid"));
    assert!(estimates.contains("dual_hybrid"));
    assert!(estimates.contains("usvp"));
}

#[test]
fn test_rough_sparse_secret_selection() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..16 {
        let n = rng.gen_range(64..=512usize);
        let weight = rng.gen_range(1..=(n as u64 / 8));
        let params = LweParameters::new(
            n,
            rng.gen_range(1000u32..=1 << 20),
            rng.gen_range(n as u64..=(4 * n) as u64),
            NoiseDistribution::sparse_ternary(weight, weight),
            NoiseDistribution::centered_binomial(rng.gen_range(1..=4)),
        )
        .unwrap();
        let catalog = catalog::lwe_rough(&params);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["usvp", "hybrid", "dual_mitm_hybrid"]
        );
    }
}

#[test]
fn test_arora_gb_absent_without_many_samples_or_bounded_error() {
    let cbd = NoiseDistribution::centered_binomial(2);
    let at_square =
        LweParameters::new(96, 3329u32, 96 * 96, cbd.clone(), cbd.clone()).unwrap();
    let (estimates, _) = run::<Lwe>(&at_square, Mode::Rough, &EstimateOptions::default()).unwrap();
    assert!(!estimates.contains("arora-gb"));

    let gaussian = LweParameters::new(
        96,
        3329u32,
        UNLIMITED_SAMPLES,
        cbd.clone(),
        NoiseDistribution::discrete_gaussian(3.2),
    )
    .unwrap();
    assert!(!catalog::lwe_rough(&gaussian).contains("arora-gb"));

    let bounded = LweParameters::new(96, 3329u32, UNLIMITED_SAMPLES, cbd.clone(), cbd).unwrap();
    assert!(catalog::lwe_rough(&bounded).contains("arora-gb"));
}

#[test]
fn test_rough_arora_gb_with_wide_uniform_mod_error_is_infeasible() {
    let q: num_bigint::BigUint = num_bigint::BigUint::from(1u32) << 70;
    let params = LweParameters::new(
        64,
        q.clone(),
        UNLIMITED_SAMPLES,
        NoiseDistribution::centered_binomial(2),
        NoiseDistribution::UniformMod { q },
    )
    .unwrap();
    assert!(catalog::lwe_rough(&params).contains("arora-gb"));

    let (estimates, report) = run::<Lwe>(&params, Mode::Rough, &EstimateOptions::default()).unwrap();
    let gb = estimates.get("arora-gb").unwrap();
    assert!(gb.rop().is_infinite());
    assert!(!report.names().contains(&"arora-gb"));
}

#[test]
fn test_bdd_hybrid_omitted_from_report_but_returned() {
    let options = synthetic_full(&[("bdd", 100.0), ("bdd_hybrid", 120.0)]);
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let (estimates, report) = run::<Lwe>(&params, Mode::Full, &options).unwrap();
    assert_eq!(report.names(), vec!["bdd"]);
    assert_eq!(names(&estimates), vec!["bdd", "bdd_hybrid"]);
    assert_eq!(estimates.get("bdd_hybrid").unwrap().rop(), Rop::bits(120.0));
}

#[test]
fn test_dual_mitm_hybrid_omitted_from_report() {
    let options = synthetic_full(&[("dual_hybrid", 90.0), ("dual_mitm_hybrid", 95.0)]);
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let (estimates, report) = run::<Lwe>(&params, Mode::Full, &options).unwrap();
    assert_eq!(report.names(), vec!["dual_hybrid"]);
    assert!(estimates.contains("dual_mitm_hybrid"));
}

#[test]
fn test_dominance_skipped_when_reference_missing() {
    let options = synthetic_full(&[("bdd_hybrid", 120.0)]);
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let (_, report) = run::<Lwe>(&params, Mode::Full, &options).unwrap();
    assert_eq!(report.names(), vec!["bdd_hybrid"]);
}

#[test]
fn test_dominance_not_applied_in_rough_mode() {
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let options = EstimateOptions::default()
        .add("bdd", Fixed::new("bdd", 1.0))
        .add("bdd_hybrid", Fixed::new("bdd_hybrid", 2.0));
    let (_, report) = run::<Lwe>(&params, Mode::Rough, &options).unwrap();
    let reported = report.names();
    assert!(reported.contains(&"bdd"));
    assert!(reported.contains(&"bdd_hybrid"));
}

#[test]
fn test_infinite_entries_never_reported() {
    let lwe = toy_lwe(NoiseDistribution::centered_binomial(2));
    for mode in [Mode::Rough, Mode::Full] {
        let options = match mode {
            Mode::Rough => {
                EstimateOptions::default().add("never", Fixed::new("never", f64::INFINITY))
            }
            Mode::Full => synthetic_full(&[("usvp", 80.0), ("never", f64::INFINITY)]),
        };
        let (estimates, report) = run::<Lwe>(&lwe, mode, &options).unwrap();
        assert!(estimates.contains("never"));
        assert!(!report.names().contains(&"never"));
        assert!(!report.lines().iter().any(|l| l.contains("≈2^inf")));
    }

    let sis = toy_sis();
    for mode in [Mode::Rough, Mode::Full] {
        let options = EstimateOptions::default()
            .deny("lattice")
            .add("never", Fixed::new("never", f64::INFINITY))
            .add("cheap", Fixed::new("cheap", 64.0));
        let (estimates, report) = run::<Sis>(&sis, mode, &options).unwrap();
        assert_eq!(names(&estimates), vec!["never", "cheap"]);
        assert_eq!(report.names(), vec!["cheap"]);
    }
}

#[test]
fn test_deny_then_add_same_name_uses_added_attack() {
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let replacement = Fixed::new("replacement", 42.0);
    let options = EstimateOptions::default()
        .deny("usvp")
        .add("usvp", replacement.clone());
    let (estimates, _) = run::<Lwe>(&params, Mode::Rough, &options).unwrap();
    assert_eq!(estimates.names().filter(|n| *n == "usvp").count(), 1);
    let usvp = estimates.get("usvp").unwrap();
    assert_eq!(usvp.rop(), Rop::bits(42.0));
    assert_eq!(usvp.tag(), Some("replacement"));
    assert_eq!(replacement.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_shared_identity_evaluated_once() {
    let shared = Fixed::new("shared", 70.0);
    let options = EstimateOptions::default()
        .deny("lattice")
        .add("first", shared.clone())
        .add("second", shared.clone());
    let (estimates, _) = run::<Sis>(&toy_sis(), Mode::Full, &options).unwrap();
    assert_eq!(shared.calls.load(Ordering::SeqCst), 1);
    assert_eq!(estimates.get("first"), estimates.get("second"));
}

#[test]
fn test_sis_failure_propagates_when_not_caught() {
    let options = EstimateOptions::default()
        .add("broken", Failing)
        .with_catch_failures(false);
    let err = run::<Sis>(&toy_sis(), Mode::Full, &options).unwrap_err();
    assert!(matches!(err, EstimatorError::AttackFailed { ref attack, .. } if attack == "failing"));
}

#[test]
fn test_sis_failure_omitted_when_caught() {
    let options = EstimateOptions::default().add("broken", Failing);
    let (estimates, report) = run::<Sis>(&toy_sis(), Mode::Full, &options).unwrap();
    assert!(!estimates.contains("broken"));
    assert!(estimates.contains("lattice"));
    assert!(!report.names().contains(&"broken"));
}

#[test]
fn test_lwe_failure_catch_is_symmetric() {
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let caught = EstimateOptions::default().add("broken", Failing);
    let (estimates, _) = run::<Lwe>(&params, Mode::Rough, &caught).unwrap();
    assert!(!estimates.contains("broken"));

    let uncaught = EstimateOptions::default()
        .add("broken", Failing)
        .with_catch_failures(false);
    assert!(run::<Lwe>(&params, Mode::Rough, &uncaught).is_err());
}

#[test]
fn test_full_lwe_jobs_do_not_change_results() {
    let params = toy_lwe(NoiseDistribution::centered_binomial(2));
    let sequential = EstimateOptions::default().with_jobs(1);
    let parallel = EstimateOptions::default().with_jobs(4);
    let (a, report_a) = run::<Lwe>(&params, Mode::Full, &sequential).unwrap();
    let (b, report_b) = run::<Lwe>(&params, Mode::Full, &parallel).unwrap();
    assert_eq!(a, b);
    assert_eq!(report_a, report_b);
    assert!(a.security_level().is_some());
}

#[test]
fn test_sparse_rough_lwe_jobs_do_not_change_results() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let weight = rng.gen_range(4..=12u64);
    let params = toy_lwe(NoiseDistribution::sparse_ternary(weight, weight));
    let (a, _) = run::<Lwe>(&params, Mode::Rough, &EstimateOptions::default()).unwrap();
    let (b, _) =
        run::<Lwe>(&params, Mode::Rough, &EstimateOptions::default().with_jobs(3)).unwrap();
    assert_eq!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_synthetic_estimates_independent_of_jobs(
        rops in proptest::collection::vec(0.0f64..300.0, 1..9),
        jobs in 2usize..6,
    ) {
        let entries: Vec<(String, f64)> = rops
            .iter()
            .enumerate()
            .map(|(i, rop)| (FULL_LWE[i].to_string(), *rop))
            .collect();
        let borrowed: Vec<(&str, f64)> = entries.iter().map(|(n, r)| (n.as_str(), *r)).collect();
        let params = toy_lwe(NoiseDistribution::centered_binomial(2));

        let (a, report_a) = run::<Lwe>(&params, Mode::Full, &synthetic_full(&borrowed)).unwrap();
        let (b, report_b) =
            run::<Lwe>(&params, Mode::Full, &synthetic_full(&borrowed).with_jobs(jobs)).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(report_a, report_b);
    }

    #[test]
    fn prop_dominance_never_changes_returned_mapping(
        bdd in 0.0f64..200.0,
        bdd_hybrid in 0.0f64..200.0,
        dual_hybrid in 0.0f64..200.0,
        dual_mitm_hybrid in 0.0f64..200.0,
    ) {
        let options = synthetic_full(&[
            ("bdd", bdd),
            ("bdd_hybrid", bdd_hybrid),
            ("dual_hybrid", dual_hybrid),
            ("dual_mitm_hybrid", dual_mitm_hybrid),
        ]);
        let params = toy_lwe(NoiseDistribution::centered_binomial(2));
        let (estimates, report) = run::<Lwe>(&params, Mode::Full, &options).unwrap();

        prop_assert_eq!(estimates.len(), 4);
        let reported = report.names();
        prop_assert_eq!(reported.contains(&"bdd_hybrid"), !(bdd < bdd_hybrid));
        prop_assert_eq!(reported.contains(&"dual_mitm_hybrid"), !(dual_hybrid < dual_mitm_hybrid));
        prop_assert!(reported.contains(&"bdd"));
        prop_assert!(reported.contains(&"dual_hybrid"));
    }

    #[test]
    fn prop_deny_add_yields_single_entry(
        index in 0usize..9,
        rop in 1.0f64..250.0,
    ) {
        let name = FULL_LWE[index];
        let mut options = EstimateOptions::default();
        for other in FULL_LWE {
            options = options.deny(other);
        }
        let options = options.add(name, Fixed::new("patched", rop));
        let catalog = crate::estimate::build_catalog::<Lwe>(
            &toy_lwe(NoiseDistribution::centered_binomial(2)),
            Mode::Full,
            &options,
        )
        .unwrap();
        prop_assert_eq!(catalog.names().collect::<Vec<_>>(), vec![name]);
        prop_assert_eq!(catalog.get(name).unwrap().identity(), "custom:fixed:patched");
    }
}
