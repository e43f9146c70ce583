use kontor_core::{new_id, now_rfc3339, ListParams, ListResult, ServiceError};
use kontor_sql::Value;

use crate::model::{Enterprise, EnterpriseRequirement, Related};
use super::CrmService;

/// Equality filters for requirement listings.
#[derive(Debug, Default)]
pub struct RequirementFilters {
    pub enterprise_id: Option<String>,
}

impl CrmService {
    /// Create a requirement document row. The owning enterprise must
    /// exist; the dates are deliberately not cross-validated
    /// (`upload_date` may exceed `last_updated`).
    pub fn create_requirement(
        &self,
        input: serde_json::Value,
    ) -> Result<EnterpriseRequirement, ServiceError> {
        let mut requirement: EnterpriseRequirement =
            Self::build_from_input(input, EnterpriseRequirement::FILLABLE, "requirement")?;

        if requirement.name.trim().is_empty() {
            return Err(ServiceError::Validation("requirement name is required".into()));
        }
        if requirement.enterprise_id.is_empty() {
            return Err(ServiceError::Validation(
                "requirement must reference an enterprise".into(),
            ));
        }
        // Foreign key check: belongs-to target must be persisted.
        let _owner: Enterprise = self.get_record("enterprises", &requirement.enterprise_id)?;

        requirement.id = new_id();
        let now = now_rfc3339();
        requirement.created_at = now.clone();
        requirement.updated_at = now;

        self.insert_requirement_row(&requirement)?;
        Ok(requirement)
    }

    pub fn get_requirement(&self, id: &str) -> Result<EnterpriseRequirement, ServiceError> {
        self.get_record("requirements", id)
    }

    pub fn list_requirements(
        &self,
        params: &ListParams,
        filters: &RequirementFilters,
    ) -> Result<ListResult<EnterpriseRequirement>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(ref e) = filters.enterprise_id {
            f.push(("enterprise_id", Value::Text(e.clone())));
        }
        const SEARCH_COLS: &[&str] = &["name"];
        let search = params.q.as_deref().map(|q| (SEARCH_COLS, q));
        self.list_records("requirements", &f, search, limit, params.offset)
    }

    pub fn update_requirement(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<EnterpriseRequirement, ServiceError> {
        let current: EnterpriseRequirement = self.get_requirement(id)?;
        let updated: EnterpriseRequirement =
            Self::apply_patch(&current, patch, EnterpriseRequirement::FILLABLE, "requirement")?;

        if updated.enterprise_id != current.enterprise_id {
            let _owner: Enterprise = self.get_record("enterprises", &updated.enterprise_id)?;
        }

        self.update_requirement_row(&updated)?;
        Ok(updated)
    }

    pub fn delete_requirement(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_record("requirements", id)
    }

    /// Resolve the belongs-to relation to the owning enterprise.
    ///
    /// An unsaved requirement (or a dangling foreign key) resolves to
    /// `Absent` — relation access is never an error.
    pub fn requirement_enterprise(
        &self,
        requirement: &EnterpriseRequirement,
    ) -> Result<Related<Enterprise>, ServiceError> {
        if requirement.enterprise_id.is_empty() {
            return Ok(Related::Absent);
        }
        match self.get_record::<Enterprise>("enterprises", &requirement.enterprise_id) {
            Ok(enterprise) => Ok(Related::One(enterprise)),
            Err(ServiceError::NotFound(_)) => Ok(Related::Absent),
            Err(e) => Err(e),
        }
    }

    fn insert_requirement_row(
        &self,
        requirement: &EnterpriseRequirement,
    ) -> Result<(), ServiceError> {
        self.insert_record("requirements", &requirement.id, requirement, &[
            ("enterprise_id", Value::Text(requirement.enterprise_id.clone())),
            ("name", Value::Text(requirement.name.clone())),
            ("extension", Value::Text(requirement.extension.clone())),
            ("upload_date", Value::Text(requirement.upload_date.to_string())),
            ("last_updated", Value::Text(requirement.last_updated.to_string())),
            ("created_at", Value::Text(requirement.created_at.clone())),
            ("updated_at", Value::Text(requirement.updated_at.clone())),
        ])
    }

    fn update_requirement_row(
        &self,
        requirement: &EnterpriseRequirement,
    ) -> Result<(), ServiceError> {
        self.update_record("requirements", &requirement.id, requirement, &[
            ("enterprise_id", Value::Text(requirement.enterprise_id.clone())),
            ("name", Value::Text(requirement.name.clone())),
            ("extension", Value::Text(requirement.extension.clone())),
            ("upload_date", Value::Text(requirement.upload_date.to_string())),
            ("last_updated", Value::Text(requirement.last_updated.to_string())),
            ("updated_at", Value::Text(requirement.updated_at.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_service;
    use chrono::NaiveDate;

    fn setup() -> (super::super::CrmService, Enterprise) {
        let svc = test_service();
        let enterprise = svc
            .create_enterprise(serde_json::json!({"name": "Acme SAC"}))
            .unwrap();
        (svc, enterprise)
    }

    fn input(enterprise_id: &str) -> serde_json::Value {
        serde_json::json!({
            "enterpriseId": enterprise_id,
            "name": "Contrato marco",
            "extension": "pdf",
            "uploadDate": "2026-01-10",
            "lastUpdated": "2026-02-01",
        })
    }

    #[test]
    fn create_casts_dates() {
        let (svc, enterprise) = setup();
        let req = svc.create_requirement(input(&enterprise.id)).unwrap();
        assert_eq!(req.upload_date, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert_eq!(req.last_updated, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn malformed_date_is_validation_error() {
        let (svc, enterprise) = setup();
        let mut bad = input(&enterprise.id);
        bad["uploadDate"] = serde_json::json!("10/01/2026");
        let err = svc.create_requirement(bad).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn upload_after_last_updated_is_allowed() {
        // The date ordering is intentionally not enforced.
        let (svc, enterprise) = setup();
        let mut swapped = input(&enterprise.id);
        swapped["uploadDate"] = serde_json::json!("2026-06-01");
        swapped["lastUpdated"] = serde_json::json!("2026-01-01");
        svc.create_requirement(swapped).unwrap();
    }

    #[test]
    fn missing_enterprise_is_not_found() {
        let (svc, _) = setup();
        let err = svc.create_requirement(input("nope")).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn belongs_to_relation() {
        let (svc, enterprise) = setup();
        let req = svc.create_requirement(input(&enterprise.id)).unwrap();

        match svc.requirement_enterprise(&req).unwrap() {
            Related::One(owner) => assert_eq!(owner.id, enterprise.id),
            other => panic!("expected One, got {:?}", other),
        }
    }

    #[test]
    fn unsaved_requirement_relation_is_absent() {
        let (svc, _) = setup();
        let unsaved = EnterpriseRequirement { name: "x".into(), ..Default::default() };
        assert!(svc.requirement_enterprise(&unsaved).unwrap().is_absent());
    }

    #[test]
    fn dangling_foreign_key_relation_is_absent() {
        let (svc, enterprise) = setup();
        let req = svc.create_requirement(input(&enterprise.id)).unwrap();
        svc.delete_enterprise(&enterprise.id).unwrap();

        // The cascade removed the row, but a stale in-memory record
        // still resolves safely.
        assert!(svc.requirement_enterprise(&req).unwrap().is_absent());
    }

    #[test]
    fn list_filtered_by_enterprise() {
        let (svc, enterprise) = setup();
        svc.create_requirement(input(&enterprise.id)).unwrap();
        let other = svc
            .create_enterprise(serde_json::json!({"name": "Otro SAC"}))
            .unwrap();
        svc.create_requirement(input(&other.id)).unwrap();

        let listed = svc
            .list_requirements(
                &ListParams::default(),
                &RequirementFilters { enterprise_id: Some(enterprise.id.clone()) },
            )
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].enterprise_id, enterprise.id);
    }
}
