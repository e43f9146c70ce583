use serde::Serialize;

use kontor_core::ServiceError;

use crate::factory::{EnterpriseFactory, PersonFactory, RequirementFactory};
use crate::service::CrmService;

/// Counts of records created by one demo-seed run.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub persons: usize,
    pub enterprises: usize,
    pub requirements: usize,
}

/// Keep only the keys that pass the fillable check, so seed records go
/// through the same create path as API input.
fn fillable_input<T: Serialize>(record: &T, fillable: &[&str]) -> serde_json::Value {
    let mut value = serde_json::to_value(record).unwrap_or_default();
    if let Some(map) = value.as_object_mut() {
        map.retain(|k, _| fillable.contains(&k.as_str()));
    }
    value
}

impl CrmService {
    /// Populate the store with synthetic demo data: `count` persons
    /// (roughly one in three a client, one in ten inactive), `count / 4`
    /// enterprises with up to three requirement documents each.
    pub fn seed_demo(&self, count: usize, seed: u64) -> Result<SeedReport, ServiceError> {
        let mut report = SeedReport::default();

        // One factory for all persons so emails and national ids come
        // from a single unique sequence.
        let mut persons = PersonFactory::seeded(seed);

        for i in 0..count {
            let person = if i % 3 == 0 {
                persons.build_with(&[PersonFactory::client()])
            } else if i % 10 == 9 {
                persons.build_with(&[PersonFactory::inactive()])
            } else {
                persons.build()
            }
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

            self.create_person(fillable_input(
                &person,
                crate::model::Person::FILLABLE,
            ))?;
            report.persons += 1;
        }

        let mut enterprises = EnterpriseFactory::seeded(seed);
        let mut requirements = RequirementFactory::seeded(seed);
        for i in 0..count.div_ceil(4) {
            let enterprise = enterprises
                .build()
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            let created = self.create_enterprise(fillable_input(
                &enterprise,
                crate::model::Enterprise::FILLABLE,
            ))?;
            report.enterprises += 1;

            for requirement in requirements
                .build_many(&created.id, i % 4)
                .map_err(|e| ServiceError::Internal(e.to_string()))?
            {
                self.create_requirement(fillable_input(
                    &requirement,
                    crate::model::EnterpriseRequirement::FILLABLE,
                ))?;
                report.requirements += 1;
            }
        }

        tracing::info!(
            persons = report.persons,
            enterprises = report.enterprises,
            requirements = report.requirements,
            "demo data seeded"
        );
        Ok(report)
    }
}
