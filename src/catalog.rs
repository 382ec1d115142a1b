//! Attack catalogs: ordered name → attack tables per problem family and mode.
//!
//! A catalog is built, patched once with the caller's deny-list and add-list,
//! and then only read. Each entry stores the identity of its attack at
//! insertion so the batch layer and the assembler agree on the key without
//! re-deriving it.

use tracing::debug;

use crate::attacks::{Attack, LweAttack, SisAttack};
use crate::error::{EstimatorError, Result};
use crate::params::{LweParameters, SisParameters};
use crate::reduction::{CostModel, ShapeModel};

/// A named, fully bound attack.
#[derive(Clone, Debug)]
pub struct AttackSpec<A> {
    name: String,
    identity: String,
    attack: A,
}

impl<A> AttackSpec<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of this entry in raw batch results.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn attack(&self) -> &A {
        &self.attack
    }
}

/// Ordered table of attack specifications with unique names.
#[derive(Clone, Debug)]
pub struct Catalog<A> {
    entries: Vec<AttackSpec<A>>,
}

impl<A> Default for Catalog<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A> Catalog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackSpec<A>> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&AttackSpec<A>> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Removes every listed name. A name that is not in the catalog is a
    /// lookup failure and leaves the remaining names unprocessed.
    pub fn deny<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for name in names {
            let name = name.as_ref();
            let pos = self
                .entries
                .iter()
                .position(|e| e.name == name)
                .ok_or_else(|| EstimatorError::UnknownAlgorithm(name.to_string()))?;
            self.entries.remove(pos);
            debug!(name, "removed from catalog");
        }
        Ok(())
    }
}

impl<A> Catalog<A> {
    /// Inserts `attack` under `name`, replacing an existing entry in place or
    /// appending a new one.
    pub fn add<P>(&mut self, name: &str, attack: A)
    where
        A: Attack<P>,
    {
        let spec = AttackSpec {
            name: name.to_string(),
            identity: attack.identity(),
            attack,
        };
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(slot) => {
                debug!(name, identity = %spec.identity, "replaced catalog entry");
                *slot = spec;
            }
            None => {
                debug!(name, identity = %spec.identity, "added catalog entry");
                self.entries.push(spec);
            }
        }
    }
}

/// Fast LWE catalog: uSVP plus the hybrids and Arora-GB where they apply,
/// everything bound to Core-SVP and the GSA.
pub fn lwe_rough(params: &LweParameters) -> Catalog<LweAttack> {
    let red_cost_model = CostModel::CoreSvp;
    let red_shape_model = ShapeModel::Gsa;
    let sparse = params.secret_is_sparse();
    let mut catalog = Catalog::new();

    catalog.add(
        "usvp",
        LweAttack::PrimalUsvp {
            red_cost_model,
            red_shape_model,
        },
    );
    if sparse {
        catalog.add(
            "hybrid",
            LweAttack::PrimalHybrid {
                mitm: true,
                babai: true,
                red_cost_model,
                red_shape_model,
            },
        );
        catalog.add(
            "dual_mitm_hybrid",
            LweAttack::DualHybrid {
                mitm_optimization: true,
                red_cost_model,
            },
        );
    } else {
        catalog.add(
            "dual_hybrid",
            LweAttack::DualHybrid {
                mitm_optimization: false,
                red_cost_model,
            },
        );
    }
    if params.samples_exceed_dimension_squared() && params.error_is_bounded() {
        let gb = LweAttack::AroraGb { bounded_only: true };
        let gb = if sparse { gb.guess_composed() } else { gb };
        catalog.add("arora-gb", gb);
    }
    catalog
}

/// Complete LWE catalog. MITM guessing combined with SVP decoding is never
/// offered.
pub fn lwe_full(red_cost_model: CostModel, red_shape_model: ShapeModel) -> Catalog<LweAttack> {
    let mut catalog = Catalog::new();
    catalog.add("arora-gb", LweAttack::AroraGb { bounded_only: false }.guess_composed());
    catalog.add("bkw", LweAttack::CodedBkw);
    catalog.add(
        "usvp",
        LweAttack::PrimalUsvp {
            red_cost_model,
            red_shape_model,
        },
    );
    catalog.add(
        "bdd",
        LweAttack::PrimalBdd {
            red_cost_model,
            red_shape_model,
        },
    );
    catalog.add(
        "bdd_hybrid",
        LweAttack::PrimalHybrid {
            mitm: false,
            babai: false,
            red_cost_model,
            red_shape_model,
        },
    );
    catalog.add(
        "bdd_mitm_hybrid",
        LweAttack::PrimalHybrid {
            mitm: true,
            babai: true,
            red_cost_model,
            red_shape_model,
        },
    );
    catalog.add("dual", LweAttack::Dual { red_cost_model });
    catalog.add(
        "dual_hybrid",
        LweAttack::DualHybrid {
            mitm_optimization: false,
            red_cost_model,
        },
    );
    catalog.add(
        "dual_mitm_hybrid",
        LweAttack::DualHybrid {
            mitm_optimization: true,
            red_cost_model,
        },
    );
    catalog
}

pub fn sis_rough(_params: &SisParameters) -> Catalog<SisAttack> {
    sis_full(CostModel::CoreSvp, ShapeModel::Zgsa)
}

/// Only lattice attacks are modelled for SIS.
pub fn sis_full(red_cost_model: CostModel, red_shape_model: ShapeModel) -> Catalog<SisAttack> {
    let mut catalog = Catalog::new();
    catalog.add(
        "lattice",
        SisAttack::Lattice {
            red_cost_model,
            red_shape_model,
        },
    );
    catalog
}
