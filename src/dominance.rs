//! Report filtering: infeasible entries and entries beaten by a sibling are
//! not printed. The estimates themselves are never modified.

use crate::assemble::Estimates;
use crate::cost::CostRecord;

/// `dependent` is not reported when `reference` is strictly cheaper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DominanceRule {
    pub dependent: &'static str,
    pub reference: &'static str,
}

/// Rules applied to full LWE estimates.
pub const LWE_FULL_RULES: &[DominanceRule] = &[
    DominanceRule {
        dependent: "bdd_hybrid",
        reference: "bdd",
    },
    DominanceRule {
        dependent: "dual_mitm_hybrid",
        reference: "dual_hybrid",
    },
];

fn dominated(name: &str, record: &CostRecord, estimates: &Estimates, rules: &[DominanceRule]) -> bool {
    rules.iter().filter(|r| r.dependent == name).any(|rule| {
        // an absent or infeasible reference dominates nothing
        match estimates.get(rule.reference) {
            Some(reference) => reference.rop().is_finite() && reference.rop() < record.rop(),
            None => false,
        }
    })
}

/// Entries to report, in order.
pub fn retained<'a>(estimates: &'a Estimates, rules: &[DominanceRule]) -> Vec<(&'a str, &'a CostRecord)> {
    estimates
        .iter()
        .filter(|(_, record)| !record.rop().is_infinite())
        .filter(|(name, record)| !dominated(name, record, estimates, rules))
        .collect()
}
