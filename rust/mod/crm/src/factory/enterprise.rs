use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kontor_core::{new_id, now_rfc3339};

use crate::model::Enterprise;
use super::{FactoryError, FactoryState, UniqueSeq};

const NAME_STEMS: &[&str] = &[
    "Andina", "Pacifico", "Solar", "Cumbre", "Horizonte", "Atlas",
    "Frontera", "Condor", "Austral", "Insigne",
];

const NAME_KINDS: &[&str] = &[
    "Logistica", "Consultores", "Ingenieria", "Distribuciones",
    "Inversiones", "Textiles",
];

// 11-digit tax ids starting with 20 (company prefix).
const TAX_ID_BASE: u64 = 20_100_000_000;
const TAX_ID_SPACE: u64 = 900_000_000;

/// Builds synthetic Enterprise records. Default shape is an active
/// enterprise with a unique tax id.
pub struct EnterpriseFactory {
    rng: StdRng,
    seq: UniqueSeq,
    states: Vec<FactoryState>,
}

impl EnterpriseFactory {
    pub fn new() -> Self {
        Self::seeded(0x5EED)
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seq: UniqueSeq::offset_by("enterprise tax id", seed, TAX_ID_SPACE),
            states: Vec::new(),
        }
    }

    /// Attach a state. States apply in attachment order, last wins.
    pub fn state(mut self, state: FactoryState) -> Self {
        self.states.push(state);
        self
    }

    // ── Named states ──

    pub fn inactive() -> FactoryState {
        FactoryState::new("inactive", serde_json::json!({"active": false}))
    }

    pub fn without_tax_id() -> FactoryState {
        FactoryState::new("without_tax_id", serde_json::json!({"taxId": null}))
    }

    pub fn build(&mut self) -> Result<Enterprise, FactoryError> {
        let n = self.seq.next()?;
        let stem = NAME_STEMS[self.rng.gen_range(0..NAME_STEMS.len())];
        let kind = NAME_KINDS[self.rng.gen_range(0..NAME_KINDS.len())];

        let mut attrs = serde_json::json!({
            "name": format!("{stem} {kind} SAC"),
            "taxId": format!("{}", TAX_ID_BASE + n),
            "active": true,
        })
        .as_object()
        .cloned()
        .unwrap_or_default();

        for state in &self.states {
            state.apply(&mut attrs);
        }

        let mut enterprise: Enterprise =
            serde_json::from_value(serde_json::Value::Object(attrs)).map_err(|e| {
                FactoryError::Shape { entity: "enterprise", message: e.to_string() }
            })?;
        enterprise.id = new_id();
        let now = now_rfc3339();
        enterprise.created_at = now.clone();
        enterprise.updated_at = now;
        Ok(enterprise)
    }

    pub fn build_many(&mut self, count: usize) -> Result<Vec<Enterprise>, FactoryError> {
        (0..count).map(|_| self.build()).collect()
    }
}

impl Default for EnterpriseFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tax_ids_are_distinct() {
        let enterprises = EnterpriseFactory::seeded(3).build_many(50).unwrap();
        let ids: HashSet<_> = enterprises.iter().filter_map(|e| e.tax_id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn different_seeds_draw_disjoint_tax_id_ranges() {
        let a = EnterpriseFactory::seeded(10).build_many(20).unwrap();
        let b = EnterpriseFactory::seeded(400).build_many(20).unwrap();
        let ids_a: HashSet<_> = a.iter().filter_map(|e| e.tax_id.clone()).collect();
        let ids_b: HashSet<_> = b.iter().filter_map(|e| e.tax_id.clone()).collect();
        assert!(ids_a.is_disjoint(&ids_b));
    }

    #[test]
    fn states_apply_in_order() {
        let e = EnterpriseFactory::seeded(3)
            .state(EnterpriseFactory::inactive())
            .state(EnterpriseFactory::without_tax_id())
            .build()
            .unwrap();
        assert!(!e.active);
        assert!(e.tax_id.is_none());
    }
}
