use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kontor_core::{new_id, now_rfc3339};

use crate::model::EnterpriseRequirement;
use super::{FactoryError, FactoryState};

const DOC_NAMES: &[&str] = &[
    "Contrato marco",
    "Ficha RUC",
    "Vigencia de poderes",
    "Estados financieros",
    "Declaracion jurada",
    "Carta fianza",
    "Poliza de seguro",
];

const EXTENSIONS: &[&str] = &["pdf", "docx", "xlsx", "png"];

/// Builds synthetic EnterpriseRequirement records attached to an
/// existing enterprise. `upload_date` falls in the last year and
/// `last_updated` lands on or after it by default; a state override
/// can still produce a swapped pair, matching what the entity allows.
pub struct RequirementFactory {
    rng: StdRng,
    states: Vec<FactoryState>,
}

impl RequirementFactory {
    pub fn new() -> Self {
        Self::seeded(0x5EED)
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), states: Vec::new() }
    }

    /// Attach a state. States apply in attachment order, last wins.
    pub fn state(mut self, state: FactoryState) -> Self {
        self.states.push(state);
        self
    }

    // ── Named states ──

    pub fn stale() -> FactoryState {
        FactoryState::new(
            "stale",
            serde_json::json!({
                "uploadDate": "2023-01-15",
                "lastUpdated": "2023-01-15",
            }),
        )
    }

    pub fn build(&mut self, enterprise_id: &str) -> Result<EnterpriseRequirement, FactoryError> {
        let today = Utc::now().date_naive();
        let upload = today - Duration::days(self.rng.gen_range(0..365));
        let updated = upload + Duration::days(self.rng.gen_range(0..90));
        let name = DOC_NAMES[self.rng.gen_range(0..DOC_NAMES.len())];
        let extension = EXTENSIONS[self.rng.gen_range(0..EXTENSIONS.len())];

        let mut attrs = serde_json::json!({
            "enterpriseId": enterprise_id,
            "name": name,
            "extension": extension,
            "uploadDate": upload.to_string(),
            "lastUpdated": updated.min(today).to_string(),
        })
        .as_object()
        .cloned()
        .unwrap_or_default();

        for state in &self.states {
            state.apply(&mut attrs);
        }

        let mut requirement: EnterpriseRequirement =
            serde_json::from_value(serde_json::Value::Object(attrs)).map_err(|e| {
                FactoryError::Shape { entity: "requirement", message: e.to_string() }
            })?;
        requirement.id = new_id();
        let now = now_rfc3339();
        requirement.created_at = now.clone();
        requirement.updated_at = now;
        Ok(requirement)
    }

    pub fn build_many(
        &mut self,
        enterprise_id: &str,
        count: usize,
    ) -> Result<Vec<EnterpriseRequirement>, FactoryError> {
        (0..count).map(|_| self.build(enterprise_id)).collect()
    }
}

impl Default for RequirementFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_ordered_by_default() {
        let mut factory = RequirementFactory::seeded(9);
        for r in factory.build_many("ent1", 50).unwrap() {
            assert!(r.upload_date <= r.last_updated);
            assert_eq!(r.enterprise_id, "ent1");
        }
    }

    #[test]
    fn state_can_pin_dates() {
        let r = RequirementFactory::seeded(9)
            .state(RequirementFactory::stale())
            .build("ent1")
            .unwrap();
        assert_eq!(r.upload_date.to_string(), "2023-01-15");
    }

    #[test]
    fn broken_override_is_a_shape_error() {
        let result = RequirementFactory::seeded(9)
            .state(FactoryState::new("bad", serde_json::json!({"uploadDate": "nope"})))
            .build("ent1");
        assert!(matches!(result, Err(FactoryError::Shape { entity: "requirement", .. })));
    }
}
