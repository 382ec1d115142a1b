//! Estimate entry points for LWE and SIS.
//!
//! A run builds the catalog for the chosen mode, patches it with the
//! caller's deny-list and add-list, evaluates every entry through the batch
//! layer, assembles the results in catalog order and renders the report.
//!
//! Pipeline:
//! - **Validation**: the parameter set, secret and error distributions included, is checked before any catalog rule reads it
//! - **Catalog**: [`ProblemFamily::catalog`] picks the attacks for the mode; rough LWE looks at secret sparsity and the sample count
//! - **Patching**: the deny-list removes names (an unknown name is fatal), the add-list replaces in place or appends
//! - **Batch**: every distinct attack identity is evaluated once, on `jobs` threads
//! - **Assembly**: raw results are matched back to catalog names by stored identity
//! - **Report**: infinite entries are hidden; full LWE also drops dominated hybrids
//!
//! Modes:
//! - **Rough**: Core-SVP with the GSA and a handful of attacks, for quick sanity checks
//! - **Full**: every modelled attack under the caller's reduction cost and shape models
//!
//! Dominance filtering changes what is printed, never the returned
//! [`Estimates`]. [`lwe`] and [`sis`] hold the printing entry points; [`run`]
//! returns the report instead.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use crate::assemble::{assemble, Estimates};
use crate::attacks::{Attack, LweAttack, SisAttack};
use crate::batch::{batch_estimate, BatchOptions};
use crate::catalog::{self, Catalog};
use crate::config::EstimatorConfig;
use crate::dominance::{retained, DominanceRule, LWE_FULL_RULES};
use crate::error::Result;
use crate::params::{LweParameters, SisParameters};
use crate::reduction::{CostModel, ShapeModel};
use crate::report::Report;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// A handful of fast attacks under Core-SVP
    Rough,
    /// Every modelled attack under the caller's reduction models
    Full,
}

/// A problem family: its parameter type, attack type and catalogs.
pub trait ProblemFamily {
    type Params: Clone + Sync + fmt::Display;
    type Attack: Attack<Self::Params> + Clone;

    const NAME: &'static str;

    fn validate(params: &Self::Params) -> Result<()>;

    fn catalog(
        params: &Self::Params,
        mode: Mode,
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    ) -> Catalog<Self::Attack>;

    fn custom(attack: Arc<dyn Attack<Self::Params>>) -> Self::Attack;

    fn dominance_rules(mode: Mode) -> &'static [DominanceRule];
}

#[derive(Clone, Copy, Debug)]
pub struct Lwe;

impl ProblemFamily for Lwe {
    type Params = LweParameters;
    type Attack = LweAttack;

    const NAME: &'static str = "lwe";

    fn validate(params: &LweParameters) -> Result<()> {
        params.validate()
    }

    fn catalog(
        params: &LweParameters,
        mode: Mode,
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    ) -> Catalog<LweAttack> {
        match mode {
            Mode::Rough => catalog::lwe_rough(params),
            Mode::Full => catalog::lwe_full(red_cost_model, red_shape_model),
        }
    }

    fn custom(attack: Arc<dyn Attack<LweParameters>>) -> LweAttack {
        LweAttack::Custom(attack)
    }

    fn dominance_rules(mode: Mode) -> &'static [DominanceRule] {
        match mode {
            Mode::Rough => &[],
            Mode::Full => LWE_FULL_RULES,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Sis;

impl ProblemFamily for Sis {
    type Params = SisParameters;
    type Attack = SisAttack;

    const NAME: &'static str = "sis";

    fn validate(params: &SisParameters) -> Result<()> {
        params.validate()
    }

    fn catalog(
        params: &SisParameters,
        mode: Mode,
        red_cost_model: CostModel,
        red_shape_model: ShapeModel,
    ) -> Catalog<SisAttack> {
        match mode {
            Mode::Rough => catalog::sis_rough(params),
            Mode::Full => catalog::sis_full(red_cost_model, red_shape_model),
        }
    }

    fn custom(attack: Arc<dyn Attack<SisParameters>>) -> SisAttack {
        SisAttack::Custom(attack)
    }

    fn dominance_rules(_mode: Mode) -> &'static [DominanceRule] {
        &[]
    }
}

/// Per-call estimation options.
#[derive(Clone, Debug)]
pub struct EstimateOptions<P> {
    pub red_cost_model: CostModel,
    pub red_shape_model: ShapeModel,
    /// Catalog names to remove; each must exist
    pub deny_list: Vec<String>,
    /// Entries merged in after the deny-list, replacing same-named ones
    pub add_list: Vec<(String, Arc<dyn Attack<P>>)>,
    pub jobs: usize,
    pub catch_failures: bool,
    pub log_level: u8,
    pub name_width: usize,
}

impl<P> Default for EstimateOptions<P> {
    fn default() -> Self {
        Self::from_config(&EstimatorConfig::default())
    }
}

impl<P> EstimateOptions<P> {
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self {
            red_cost_model: config.red_cost_model,
            red_shape_model: config.red_shape_model,
            deny_list: Vec::new(),
            add_list: Vec::new(),
            jobs: config.jobs,
            catch_failures: config.catch_failures,
            log_level: config.log_level,
            name_width: config.name_width,
        }
    }

    pub fn with_models(mut self, red_cost_model: CostModel, red_shape_model: ShapeModel) -> Self {
        self.red_cost_model = red_cost_model;
        self.red_shape_model = red_shape_model;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_catch_failures(mut self, catch_failures: bool) -> Self {
        self.catch_failures = catch_failures;
        self
    }

    pub fn deny(mut self, name: &str) -> Self {
        self.deny_list.push(name.to_string());
        self
    }

    pub fn add(mut self, name: &str, attack: impl Attack<P> + 'static) -> Self {
        self.add_list.push((name.to_string(), Arc::new(attack)));
        self
    }
}

/// Builds the patched catalog for one run.
pub fn build_catalog<F: ProblemFamily>(
    params: &F::Params,
    mode: Mode,
    options: &EstimateOptions<F::Params>,
) -> Result<Catalog<F::Attack>> {
    let mut catalog = F::catalog(params, mode, options.red_cost_model, options.red_shape_model);
    catalog.deny(&options.deny_list)?;
    for (name, attack) in &options.add_list {
        catalog.add::<F::Params>(name, F::custom(Arc::clone(attack)));
    }
    Ok(catalog)
}

/// Runs an estimate without printing.
pub fn run<F: ProblemFamily>(
    params: &F::Params,
    mode: Mode,
    options: &EstimateOptions<F::Params>,
) -> Result<(Estimates, Report)> {
    let span = info_span!("estimate", family = F::NAME, ?mode, %params);
    let _enter = span.enter();

    F::validate(params)?;
    let catalog = build_catalog::<F>(params, mode, options)?;
    if catalog.is_empty() {
        warn!("every algorithm was denied, nothing to estimate");
    }
    debug!(algorithms = ?catalog.names().collect::<Vec<_>>(), "catalog ready");

    let attacks: Vec<F::Attack> = catalog.iter().map(|spec| spec.attack().clone()).collect();
    let batch = BatchOptions {
        jobs: options.jobs,
        log_level: options.log_level,
        catch_failures: options.catch_failures,
    };
    let raw = batch_estimate(std::slice::from_ref(params), &attacks, &batch)?
        .pop()
        .map(|result| result.costs)
        .unwrap_or_default();

    let estimates = assemble(&catalog, &raw);
    let report = Report::render(
        &retained(&estimates, F::dominance_rules(mode)),
        options.name_width.max(1),
    );
    if let Some((name, record)) = estimates.best() {
        info!(best = name, rop = %record.rop(), "estimate finished");
    }
    Ok((estimates, report))
}

fn print_and_return<F: ProblemFamily>(
    params: &F::Params,
    mode: Mode,
    options: &EstimateOptions<F::Params>,
) -> Result<Estimates> {
    let (estimates, report) = run::<F>(params, mode, options)?;
    if report.is_empty() {
        info!("no algorithm has a finite cost");
    }
    report.print();
    Ok(estimates)
}

fn rough_options<P>(jobs: usize) -> EstimateOptions<P> {
    EstimateOptions::default().with_jobs(jobs)
}

pub mod lwe {
    use super::*;

    /// Fast estimate with a few attacks under Core-SVP; prints the report.
    pub fn rough(params: &LweParameters, jobs: usize) -> Result<Estimates> {
        print_and_return::<Lwe>(params, Mode::Rough, &rough_options(jobs))
    }

    /// Full estimate; prints the report without dominated entries.
    pub fn estimate(
        params: &LweParameters,
        options: &EstimateOptions<LweParameters>,
    ) -> Result<Estimates> {
        print_and_return::<Lwe>(params, Mode::Full, options)
    }
}

pub mod sis {
    use super::*;

    pub fn rough(params: &SisParameters, jobs: usize) -> Result<Estimates> {
        print_and_return::<Sis>(params, Mode::Rough, &rough_options(jobs))
    }

    pub fn estimate(
        params: &SisParameters,
        options: &EstimateOptions<SisParameters>,
    ) -> Result<Estimates> {
        print_and_return::<Sis>(params, Mode::Full, options)
    }
}
