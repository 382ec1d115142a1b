//! Correlation of raw batch results with catalog names.

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::cost::CostRecord;

/// Estimates for one parameter set, in catalog order.
///
/// An algorithm whose evaluation failed (and was caught) is absent rather
/// than present with a placeholder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Estimates {
    entries: Vec<(String, CostRecord)>,
}

impl Estimates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CostRecord> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CostRecord)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Cheapest feasible attack.
    pub fn best(&self) -> Option<(&str, &CostRecord)> {
        self.iter()
            .filter(|(_, r)| r.rop().is_finite())
            .min_by(|a, b| a.1.rop().cmp(&b.1.rop()))
    }

    /// log2 cost of the cheapest feasible attack, i.e. the bit security
    /// these estimates support.
    pub fn security_level(&self) -> Option<f64> {
        self.best().map(|(_, r)| r.rop().log2())
    }

    pub(crate) fn push(&mut self, name: &str, record: CostRecord) {
        self.entries.push((name.to_string(), record));
    }
}

impl IntoIterator for Estimates {
    type Item = (String, CostRecord);
    type IntoIter = std::vec::IntoIter<(String, CostRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Looks up each catalog entry's identity in `raw`. Missing identities are
/// skipped; entries sharing an identity each get a copy of the record.
pub fn assemble<A>(catalog: &Catalog<A>, raw: &HashMap<String, CostRecord>) -> Estimates {
    let mut estimates = Estimates::new();
    for spec in catalog.iter() {
        if let Some(record) = raw.get(spec.identity()) {
            estimates.push(spec.name(), record.clone());
        }
    }
    estimates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attacks::LweAttack;
    use crate::cost::Rop;

    fn catalog() -> Catalog<LweAttack> {
        let mut catalog = Catalog::new();
        catalog.add("bkw", LweAttack::CodedBkw);
        catalog.add("arora-gb", LweAttack::AroraGb { bounded_only: false });
        catalog.add("bkw-again", LweAttack::CodedBkw);
        catalog
    }

    #[test]
    fn test_preserves_catalog_order_and_drops_missing() {
        let mut raw = HashMap::new();
        raw.insert("coded_bkw".to_string(), CostRecord::new(Rop::bits(150.0)));
        let estimates = assemble(&catalog(), &raw);
        assert_eq!(estimates.names().collect::<Vec<_>>(), vec!["bkw", "bkw-again"]);
        assert_eq!(estimates.get("bkw"), estimates.get("bkw-again"));
        assert!(!estimates.contains("arora-gb"));
    }

    #[test]
    fn test_best_ignores_infinite() {
        let mut estimates = Estimates::new();
        estimates.push("a", CostRecord::new(Rop::INFINITY));
        estimates.push("b", CostRecord::new(Rop::bits(140.0)));
        estimates.push("c", CostRecord::new(Rop::bits(130.0)));
        assert_eq!(estimates.best().map(|(n, _)| n), Some("c"));
        assert_eq!(estimates.security_level(), Some(130.0));

        let mut none = Estimates::new();
        none.push("a", CostRecord::new(Rop::INFINITY));
        assert!(none.best().is_none());
    }
}
