//! Factories — synthetic, schema-valid records for seeding and tests.
//!
//! Values are randomized from a seeded RNG so a run is reproducible;
//! unique fields come from a bounded monotonic sequence that fails fast
//! when exhausted instead of retrying forever.

mod enterprise;
mod person;
mod requirement;

pub use enterprise::EnterpriseFactory;
pub use person::PersonFactory;
pub use requirement::RequirementFactory;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FactoryError {
    /// The per-run unique value sequence ran out for a field.
    #[error("unique value space exhausted for {0}")]
    UniqueSpaceExhausted(&'static str),

    /// The composed attribute set no longer deserializes into the
    /// entity (a state override broke a cast).
    #[error("factory produced an invalid {entity}: {message}")]
    Shape {
        entity: &'static str,
        message: String,
    },
}

/// A named attribute-override overlay.
///
/// States are applied in the order they were attached; when two states
/// override the same attribute, the last-applied one wins. A `null`
/// override sets the attribute to null (it does not remove it).
#[derive(Debug, Clone)]
pub struct FactoryState {
    pub name: &'static str,
    overrides: serde_json::Map<String, serde_json::Value>,
}

impl FactoryState {
    pub fn new(name: &'static str, overrides: serde_json::Value) -> Self {
        let overrides = overrides
            .as_object()
            .cloned()
            .unwrap_or_default();
        Self { name, overrides }
    }

    /// Overlay this state onto an attribute map. Last write wins.
    pub(crate) fn apply(&self, target: &mut serde_json::Map<String, serde_json::Value>) {
        for (key, value) in &self.overrides {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Bounded monotonic sequence for unique field values, scoped to one
/// factory instance (one test run / seed invocation).
#[derive(Debug)]
pub(crate) struct UniqueSeq {
    next: u64,
    limit: u64,
    field: &'static str,
}

impl UniqueSeq {
    pub(crate) fn new(field: &'static str, limit: u64) -> Self {
        Self { next: 0, limit, field }
    }

    /// Sequence starting at a seed-derived offset, so runs with
    /// different seeds draw from different parts of the value space.
    /// The offset stays in the lower half of the space, leaving every
    /// run at least `limit / 2` values before exhaustion.
    pub(crate) fn offset_by(field: &'static str, seed: u64, limit: u64) -> Self {
        let start = match limit / 2 {
            0 => 0,
            half => seed % half,
        };
        Self { next: start, limit, field }
    }

    pub(crate) fn next(&mut self) -> Result<u64, FactoryError> {
        if self.next >= self.limit {
            return Err(FactoryError::UniqueSpaceExhausted(self.field));
        }
        let n = self.next;
        self.next += 1;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_overlay_last_wins() {
        let mut map = serde_json::Map::new();
        FactoryState::new("a", serde_json::json!({"x": 1, "y": 1})).apply(&mut map);
        FactoryState::new("b", serde_json::json!({"x": 2})).apply(&mut map);
        assert_eq!(map["x"], serde_json::json!(2));
        assert_eq!(map["y"], serde_json::json!(1));
    }

    #[test]
    fn unique_seq_fails_fast_at_limit() {
        let mut seq = UniqueSeq::new("email", 2);
        assert_eq!(seq.next().unwrap(), 0);
        assert_eq!(seq.next().unwrap(), 1);
        assert!(matches!(seq.next(), Err(FactoryError::UniqueSpaceExhausted("email"))));
        // Still exhausted on the next call — no silent reset.
        assert!(seq.next().is_err());
    }

    #[test]
    fn offset_seq_starts_at_seed_derived_value() {
        let mut seq = UniqueSeq::offset_by("email", 107, 1000);
        assert_eq!(seq.next().unwrap(), 107);
        assert_eq!(seq.next().unwrap(), 108);
    }

    #[test]
    fn offset_seq_keeps_at_least_half_the_space() {
        // A huge seed still lands in the lower half.
        let mut seq = UniqueSeq::offset_by("email", u64::MAX - 3, 10);
        let first = seq.next().unwrap();
        assert!(first < 5);
        for _ in 0..4 {
            seq.next().unwrap();
        }
    }
}
