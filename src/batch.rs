//! Batched attack evaluation.
//!
//! Every distinct attack is run exactly once per parameter set. Results are
//! keyed by attack identity, so two catalog names bound to the same attack
//! share one evaluation.
//!
//! Scheduling:
//! - **Sequential**: `jobs <= 1` runs every task on the calling thread
//! - **Parallel**: `jobs > 1` builds a dedicated rayon pool of that size and maps tasks with `par_iter`
//! - **Ordering**: results are gathered in task order, so the outcome and the first error do not depend on scheduling
//!
//! Failure Policy:
//! - **Caught** (`catch_failures = true`): a failing attack logs a WARN and is left out of its parameter set's results
//! - **Propagated** (`catch_failures = false`): the first failure in task order aborts the batch
//!
//! Logging:
//! - **Per task**: completion with elapsed time, at INFO for `log_level` 0 and DEBUG above
//! - **Per batch**: one span with the worker and task counts

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, info_span, warn};

use crate::attacks::Attack;
use crate::cost::CostRecord;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Number of worker threads; 1 runs on the calling thread.
    pub jobs: usize,
    /// 0 logs attack completion at INFO, anything higher at DEBUG.
    pub log_level: u8,
    /// Drop failing attacks with a warning instead of aborting the batch.
    pub catch_failures: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            log_level: 1,
            catch_failures: true,
        }
    }
}

/// Raw results for one parameter set, keyed by attack identity.
#[derive(Clone, Debug)]
pub struct BatchResult<P> {
    pub params: P,
    pub costs: HashMap<String, CostRecord>,
}

struct Task<'a, P, A> {
    params_index: usize,
    params: &'a P,
    identity: &'a str,
    attack: &'a A,
}

fn run_task<P, A>(task: &Task<'_, P, A>, log_level: u8) -> Result<CostRecord>
where
    A: Attack<P>,
{
    let started = Instant::now();
    let result = task.attack.estimate(task.params);
    if let Ok(record) = &result {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if log_level == 0 {
            info!(attack = task.identity, rop = %record.rop(), elapsed_ms, "attack finished");
        } else {
            debug!(attack = task.identity, rop = %record.rop(), elapsed_ms, "attack finished");
        }
    }
    result
}

/// Runs each attack against each parameter set.
///
/// Attacks sharing an identity are evaluated once. When a run fails and
/// `catch_failures` is off, the first failure in task order is returned.
pub fn batch_estimate<P, A>(
    params: &[P],
    attacks: &[A],
    options: &BatchOptions,
) -> Result<Vec<BatchResult<P>>>
where
    P: Clone + Sync + fmt::Display,
    A: Attack<P>,
{
    let mut unique: Vec<(String, &A)> = Vec::with_capacity(attacks.len());
    for attack in attacks {
        let identity = attack.identity();
        if unique.iter().all(|(seen, _)| *seen != identity) {
            unique.push((identity, attack));
        }
    }

    let jobs = options.jobs.max(1);
    let span = info_span!("batch", jobs, attacks = unique.len(), params = params.len());
    let _enter = span.enter();

    let tasks: Vec<Task<'_, P, A>> = params
        .iter()
        .enumerate()
        .flat_map(|(params_index, p)| {
            unique.iter().map(move |(identity, attack)| Task {
                params_index,
                params: p,
                identity: identity.as_str(),
                attack: *attack,
            })
        })
        .collect();

    let outcomes: Vec<Result<CostRecord>> = if jobs == 1 {
        tasks.iter().map(|t| run_task(t, options.log_level)).collect()
    } else {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(|| {
            tasks
                .par_iter()
                .map(|t| run_task(t, options.log_level))
                .collect()
        })
    };

    let mut results: Vec<BatchResult<P>> = params
        .iter()
        .map(|p| BatchResult {
            params: p.clone(),
            costs: HashMap::new(),
        })
        .collect();

    for (task, outcome) in tasks.iter().zip(outcomes) {
        match outcome {
            Ok(record) => {
                results[task.params_index]
                    .costs
                    .insert(task.identity.to_string(), record);
            }
            Err(err) if options.catch_failures => {
                warn!(
                    attack = task.identity,
                    params = %task.params,
                    error = %err,
                    "attack failed, omitting it"
                );
            }
            Err(err) => return Err(err),
        }
    }

    Ok(results)
}
