//! Cost records returned by attack estimators.
//!
//! Every record carries a mandatory `rop` (ring operations, kept on the log2
//! scale) followed by attack-specific metrics in the order the attack
//! declared them. `rop = +inf` marks an infeasible or unestimated attack and
//! is a valid value, not an error.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// Extended non-negative real on the log2 scale.
///
/// `Rop::bits(118.6)` stands for roughly 2^118.6 operations. NaN is never
/// stored: it collapses to [`Rop::INFINITY`] on construction. Anything below
/// one operation, `-inf` included, is clamped to [`Rop::ONE`].
#[derive(Clone, Copy, Debug)]
pub struct Rop(f64);

impl Rop {
    /// Infeasible / unestimated
    pub const INFINITY: Rop = Rop(f64::INFINITY);

    /// A single operation.
    pub const ONE: Rop = Rop(0.0);

    pub fn bits(log2: f64) -> Self {
        if log2.is_nan() {
            Self::INFINITY
        } else {
            Rop(log2.max(0.0))
        }
    }

    pub fn log2(&self) -> f64 {
        self.0
    }

    pub fn is_infinite(&self) -> bool {
        self.0 == f64::INFINITY
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Cost of repeating this many times, `repetitions` given in log2.
    pub fn repeated(self, log2_repetitions: f64) -> Self {
        Rop::bits(self.0 + log2_repetitions.max(0.0))
    }
}

/// Sum of operation counts: log2(2^a + 2^b).
impl Add for Rop {
    type Output = Rop;

    fn add(self, rhs: Rop) -> Rop {
        if self.is_infinite() || rhs.is_infinite() {
            return Rop::INFINITY;
        }
        let (hi, lo) = if self.0 >= rhs.0 {
            (self.0, rhs.0)
        } else {
            (rhs.0, self.0)
        };
        Rop(hi + (1.0 + (lo - hi).exp2()).log2())
    }
}

impl PartialEq for Rop {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rop {}

impl PartialOrd for Rop {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rop {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Rop {
    fn from(log2: f64) -> Self {
        Rop::bits(log2)
    }
}

impl fmt::Display for Rop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_log2(f, self.0)
    }
}

fn write_log2(f: &mut fmt::Formatter<'_>, log2: f64) -> fmt::Result {
    if log2 == f64::INFINITY {
        write!(f, "≈2^inf")
    } else if log2 == 0.0 {
        write!(f, "1")
    } else {
        write!(f, "≈2^{:.1}", log2)
    }
}

/// One metric in a [`CostRecord`].
#[derive(Clone, Debug, PartialEq)]
pub enum CostValue {
    /// A count kept on the log2 scale (memory, samples, repetitions, probability)
    Log2(f64),
    Int(u64),
    Real(f64),
    Tag(String),
}

impl fmt::Display for CostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostValue::Log2(x) => write_log2(f, *x),
            CostValue::Int(x) => write!(f, "{}", x),
            CostValue::Real(x) => write!(f, "{:.6}", x),
            CostValue::Tag(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for CostValue {
    fn from(x: u64) -> Self {
        CostValue::Int(x)
    }
}

impl From<usize> for CostValue {
    fn from(x: usize) -> Self {
        CostValue::Int(x as u64)
    }
}

impl From<Rop> for CostValue {
    fn from(x: Rop) -> Self {
        CostValue::Log2(x.log2())
    }
}

impl From<&str> for CostValue {
    fn from(s: &str) -> Self {
        CostValue::Tag(s.to_string())
    }
}

/// Mapping from metric name to value with a mandatory `rop`.
#[derive(Clone, Debug, PartialEq)]
pub struct CostRecord {
    rop: Rop,
    metrics: Vec<(String, CostValue)>,
}

impl CostRecord {
    pub fn new(rop: Rop) -> Self {
        Self {
            rop,
            metrics: Vec::new(),
        }
    }

    /// Record of an attack that does not apply, tagged with its variant.
    pub fn infeasible(tag: &str) -> Self {
        Self::new(Rop::INFINITY).with("tag", tag)
    }

    /// Sets `key`, keeping its position when already present. Setting `rop`
    /// replaces the mandatory cost.
    pub fn with(mut self, key: &str, value: impl Into<CostValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<CostValue>) {
        let value = value.into();
        if key == "rop" {
            self.rop = match value {
                CostValue::Log2(x) | CostValue::Real(x) => Rop::bits(x),
                CostValue::Int(x) => Rop::bits((x.max(1) as f64).log2()),
                CostValue::Tag(_) => Rop::INFINITY,
            };
            return;
        }
        match self.metrics.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.metrics.push((key.to_string(), value)),
        }
    }

    pub fn rop(&self) -> Rop {
        self.rop
    }

    pub fn get(&self, key: &str) -> Option<&CostValue> {
        self.metrics.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn tag(&self) -> Option<&str> {
        match self.get("tag") {
            Some(CostValue::Tag(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Declared keys in order, `rop` first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once("rop").chain(self.metrics.iter().map(|(k, _)| k.as_str()))
    }
}

impl fmt::Display for CostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rop: {}", self.rop)?;
        for (key, value) in &self.metrics {
            write!(f, ", {}: {}", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rop_ordering_with_infinity() {
        assert!(Rop::bits(100.0) < Rop::bits(120.0));
        assert!(Rop::bits(1e9) < Rop::INFINITY);
        assert_eq!(Rop::INFINITY, Rop::INFINITY);
        assert!(Rop::bits(f64::NAN).is_infinite());
    }

    #[test]
    fn test_rop_below_one_operation_clamps() {
        let free = Rop::bits(f64::NEG_INFINITY);
        assert!(free.is_finite());
        assert_eq!(free, Rop::ONE);
        assert_eq!(free.to_string(), "1");
        assert_eq!(Rop::bits(-3.5), Rop::ONE);
        assert!(Rop::bits(1e-3) > Rop::ONE);
    }

    #[test]
    fn test_rop_sum_is_log_domain() {
        let s = Rop::bits(10.0) + Rop::bits(10.0);
        assert!((s.log2() - 11.0).abs() < 1e-12);

        let dominated = Rop::bits(100.0) + Rop::bits(20.0);
        assert!((dominated.log2() - 100.0).abs() < 1e-9);

        assert!((Rop::bits(5.0) + Rop::INFINITY).is_infinite());
    }

    #[test]
    fn test_record_display_keeps_declaration_order() {
        let record = CostRecord::new(Rop::bits(118.64))
            .with("red", Rop::bits(118.64))
            .with("δ", CostValue::Real(1.003941))
            .with("β", 406u64)
            .with("d", 998u64)
            .with("tag", "usvp");
        assert_eq!(
            record.to_string(),
            "rop: ≈2^118.6, red: ≈2^118.6, δ: 1.003941, β: 406, d: 998, tag: usvp"
        );
        assert_eq!(record.tag(), Some("usvp"));
        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["rop", "red", "δ", "β", "d", "tag"]
        );
    }

    #[test]
    fn test_set_existing_key_keeps_position() {
        let mut record = CostRecord::new(Rop::bits(1.0)).with("a", 1u64).with("b", 2u64);
        record.set("a", 5u64);
        record.set("rop", Rop::bits(7.0));
        assert_eq!(record.to_string(), "rop: ≈2^7.0, a: 5, b: 2");
    }

    #[test]
    fn test_infeasible_record() {
        let record = CostRecord::infeasible("arora-gb");
        assert!(record.rop().is_infinite());
        assert_eq!(record.to_string(), "rop: ≈2^inf, tag: arora-gb");
    }

    #[test]
    fn test_unit_log2_renders_as_one() {
        let record = CostRecord::new(Rop::bits(3.0)).with("↻", CostValue::Log2(0.0));
        assert_eq!(record.to_string(), "rop: ≈2^3.0, ↻: 1");
    }
}
