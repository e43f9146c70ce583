use kontor_core::{new_id, now_rfc3339, ListParams, ListResult, ServiceError};
use kontor_sql::Value;

use crate::model::{Person, PERSON_TYPE_CLIENT};
use super::CrmService;

/// Equality filters for person listings.
#[derive(Debug, Default)]
pub struct PersonFilters {
    pub person_type_id: Option<u32>,
    pub active: Option<bool>,
}

impl CrmService {
    /// Create a person from fillable input.
    ///
    /// Uniqueness of `email` and `national_id` is enforced by the
    /// schema; a collision surfaces as `Conflict`, never a silent fix.
    pub fn create_person(&self, input: serde_json::Value) -> Result<Person, ServiceError> {
        let mut person: Person =
            Self::build_from_input(input, Person::FILLABLE, "person")?;

        if person.name.trim().is_empty() {
            return Err(ServiceError::Validation("person name is required".into()));
        }
        if person.email.trim().is_empty() {
            return Err(ServiceError::Validation("person email is required".into()));
        }

        person.id = new_id();
        let now = now_rfc3339();
        person.created_at = now.clone();
        person.updated_at = now;

        self.insert_person_row(&person)?;
        tracing::info!(id = %person.id, email = %person.email, "person created");
        Ok(person)
    }

    pub fn get_person(&self, id: &str) -> Result<Person, ServiceError> {
        self.get_record("persons", id)
    }

    pub fn list_persons(
        &self,
        params: &ListParams,
        filters: &PersonFilters,
    ) -> Result<ListResult<Person>, ServiceError> {
        let limit = params.limit.min(500);
        let mut f: Vec<(&str, Value)> = Vec::new();
        if let Some(t) = filters.person_type_id {
            f.push(("person_type_id", Value::Integer(t as i64)));
        }
        if let Some(a) = filters.active {
            f.push(("active", Value::from(a)));
        }
        const SEARCH_COLS: &[&str] = &["name", "email"];
        let search = params.q.as_deref().map(|q| (SEARCH_COLS, q));
        self.list_records("persons", &f, search, limit, params.offset)
    }

    pub fn update_person(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Person, ServiceError> {
        let current: Person = self.get_person(id)?;
        let updated: Person = Self::apply_patch(&current, patch, Person::FILLABLE, "person")?;
        self.update_person_row(&updated)?;
        Ok(updated)
    }

    pub fn delete_person(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_record("persons", id)
    }

    /// Lead → Client transition. Converting a person who is already a
    /// client is a no-op; no history is recorded either way.
    pub fn convert_to_client(&self, id: &str) -> Result<Person, ServiceError> {
        let mut person = self.get_person(id)?;
        if person.is_client() {
            return Ok(person);
        }
        person.person_type_id = PERSON_TYPE_CLIENT;
        person.updated_at = now_rfc3339();
        self.update_person_row(&person)?;
        tracing::info!(id = %person.id, "lead converted to client");
        Ok(person)
    }

    fn insert_person_row(&self, person: &Person) -> Result<(), ServiceError> {
        self.insert_record("persons", &person.id, person, &[
            ("name", Value::Text(person.name.clone())),
            ("email", Value::Text(person.email.clone())),
            ("national_id", Value::from(person.national_id.clone())),
            ("person_type_id", Value::Integer(person.person_type_id as i64)),
            ("active", Value::from(person.active)),
            ("status", Value::Text(person.status.clone())),
            ("created_at", Value::Text(person.created_at.clone())),
            ("updated_at", Value::Text(person.updated_at.clone())),
        ])
    }

    fn update_person_row(&self, person: &Person) -> Result<(), ServiceError> {
        self.update_record("persons", &person.id, person, &[
            ("name", Value::Text(person.name.clone())),
            ("email", Value::Text(person.email.clone())),
            ("national_id", Value::from(person.national_id.clone())),
            ("person_type_id", Value::Integer(person.person_type_id as i64)),
            ("active", Value::from(person.active)),
            ("status", Value::Text(person.status.clone())),
            ("updated_at", Value::Text(person.updated_at.clone())),
        ])
    }
}
