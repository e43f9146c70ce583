use kontor_core::{new_id, now_rfc3339, ListParams, ListResult, ServiceError};
use kontor_sql::Value;

use crate::model::{Enterprise, EnterpriseRequirement, Related};
use super::CrmService;

impl CrmService {
    pub fn create_enterprise(&self, input: serde_json::Value) -> Result<Enterprise, ServiceError> {
        let mut enterprise: Enterprise =
            Self::build_from_input(input, Enterprise::FILLABLE, "enterprise")?;

        if enterprise.name.trim().is_empty() {
            return Err(ServiceError::Validation("enterprise name is required".into()));
        }

        enterprise.id = new_id();
        let now = now_rfc3339();
        enterprise.created_at = now.clone();
        enterprise.updated_at = now;

        self.insert_record("enterprises", &enterprise.id, &enterprise, &[
            ("name", Value::Text(enterprise.name.clone())),
            ("tax_id", Value::from(enterprise.tax_id.clone())),
            ("active", Value::from(enterprise.active)),
            ("created_at", Value::Text(enterprise.created_at.clone())),
            ("updated_at", Value::Text(enterprise.updated_at.clone())),
        ])?;

        tracing::info!(id = %enterprise.id, name = %enterprise.name, "enterprise created");
        Ok(enterprise)
    }

    pub fn get_enterprise(&self, id: &str) -> Result<Enterprise, ServiceError> {
        self.get_record("enterprises", id)
    }

    pub fn list_enterprises(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<Enterprise>, ServiceError> {
        let limit = params.limit.min(500);
        const SEARCH_COLS: &[&str] = &["name"];
        let search = params.q.as_deref().map(|q| (SEARCH_COLS, q));
        self.list_records("enterprises", &[], search, limit, params.offset)
    }

    pub fn update_enterprise(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Enterprise, ServiceError> {
        let current: Enterprise = self.get_enterprise(id)?;
        let updated: Enterprise =
            Self::apply_patch(&current, patch, Enterprise::FILLABLE, "enterprise")?;

        self.update_record("enterprises", id, &updated, &[
            ("name", Value::Text(updated.name.clone())),
            ("tax_id", Value::from(updated.tax_id.clone())),
            ("active", Value::from(updated.active)),
            ("updated_at", Value::Text(updated.updated_at.clone())),
        ])?;

        Ok(updated)
    }

    /// Delete an enterprise and cascade to its requirement documents.
    pub fn delete_enterprise(&self, id: &str) -> Result<(), ServiceError> {
        // Verify it exists first so a bad id is NotFound, not a silent cascade.
        let _enterprise = self.get_enterprise(id)?;

        let removed = self
            .sql
            .exec(
                "DELETE FROM requirements WHERE enterprise_id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        if removed > 0 {
            tracing::info!(enterprise = %id, count = removed, "cascaded requirement delete");
        }

        self.delete_record("enterprises", id)
    }

    /// Resolve the has-many relation to requirement documents.
    ///
    /// An unsaved enterprise (no id yet) has no requirements: the
    /// relation resolves to an empty collection, not an error.
    pub fn enterprise_requirements(
        &self,
        enterprise: &Enterprise,
    ) -> Result<Related<EnterpriseRequirement>, ServiceError> {
        if enterprise.id.is_empty() {
            return Ok(Related::Many(Vec::new()));
        }
        let rows = self.list_records::<EnterpriseRequirement>(
            "requirements",
            &[("enterprise_id", Value::Text(enterprise.id.clone()))],
            None,
            500,
            0,
        )?;
        Ok(Related::Many(rows.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_service;

    fn enterprise_input(name: &str) -> serde_json::Value {
        serde_json::json!({"name": name, "taxId": format!("20{:09}", name.len())})
    }

    fn requirement_input(enterprise_id: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "enterpriseId": enterprise_id,
            "name": name,
            "extension": "pdf",
            "uploadDate": "2026-01-10",
            "lastUpdated": "2026-02-01",
        })
    }

    #[test]
    fn crud_roundtrip() {
        let svc = test_service();
        let created = svc.create_enterprise(enterprise_input("Acme SAC")).unwrap();
        let fetched = svc.get_enterprise(&created.id).unwrap();
        assert_eq!(fetched, created);

        let updated = svc
            .update_enterprise(&created.id, serde_json::json!({"active": false}))
            .unwrap();
        assert!(!updated.active);

        svc.delete_enterprise(&created.id).unwrap();
        assert!(matches!(svc.get_enterprise(&created.id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn requirements_relation_is_many() {
        let svc = test_service();
        let enterprise = svc.create_enterprise(enterprise_input("Acme SAC")).unwrap();
        svc.create_requirement(requirement_input(&enterprise.id, "Contrato")).unwrap();
        svc.create_requirement(requirement_input(&enterprise.id, "Licencia")).unwrap();

        let related = svc.enterprise_requirements(&enterprise).unwrap();
        assert_eq!(related.len(), 2);
    }

    #[test]
    fn unsaved_enterprise_has_empty_relation() {
        let svc = test_service();
        let unsaved = Enterprise { name: "Ghost".into(), ..Default::default() };
        let related = svc.enterprise_requirements(&unsaved).unwrap();
        assert_eq!(related, Related::Many(vec![]));
    }

    #[test]
    fn delete_cascades_to_requirements() {
        let svc = test_service();
        let enterprise = svc.create_enterprise(enterprise_input("Acme SAC")).unwrap();
        svc.create_requirement(requirement_input(&enterprise.id, "Contrato")).unwrap();

        svc.delete_enterprise(&enterprise.id).unwrap();
        assert_eq!(svc.count_records("requirements", &[]).unwrap(), 0);
    }
}
