pub mod enterprise;
pub mod person;
pub mod requirement;
pub mod schema;
pub mod seed;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use kontor_core::{merge_patch, now_rfc3339, ListResult, ServiceError};
use kontor_sql::{SQLStore, Value};

/// CRM service — business logic over the relational store.
pub struct CrmService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl CrmService {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }

    // ── Bulk-assignment guard ──

    /// Reject any input key outside the entity's fillable set.
    ///
    /// Violations are surfaced, never silently dropped.
    pub(crate) fn check_fillable(
        input: &serde_json::Value,
        fillable: &[&str],
        entity: &str,
    ) -> Result<(), ServiceError> {
        let obj = input.as_object().ok_or_else(|| {
            ServiceError::Validation(format!("{} input must be a JSON object", entity))
        })?;
        for key in obj.keys() {
            if !fillable.contains(&key.as_str()) {
                return Err(ServiceError::Validation(format!(
                    "field '{}' is not fillable on {}",
                    key, entity
                )));
            }
        }
        Ok(())
    }

    /// Build a new record from defaults + fillable input.
    ///
    /// Deserialization applies the entity's casts; a cast failure (e.g.
    /// a malformed date) is a validation error, not an internal one.
    pub(crate) fn build_from_input<T: Serialize + DeserializeOwned + Default>(
        input: serde_json::Value,
        fillable: &[&str],
        entity: &str,
    ) -> Result<T, ServiceError> {
        Self::check_fillable(&input, fillable, entity)?;
        let mut json = serde_json::to_value(T::default())
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        merge_patch(&mut json, &input);
        serde_json::from_value(json)
            .map_err(|e| ServiceError::Validation(format!("invalid {} input: {}", entity, e)))
    }

    /// Apply a JSON merge-patch to a record, restricted to fillable keys.
    ///
    /// Immutable fields (`id`, `createdAt`) are not fillable and so are
    /// rejected like any other non-fillable key; `updatedAt` is always
    /// refreshed.
    pub(crate) fn apply_patch<T: Serialize + DeserializeOwned>(
        current: &T,
        patch: serde_json::Value,
        fillable: &[&str],
        entity: &str,
    ) -> Result<T, ServiceError> {
        Self::check_fillable(&patch, fillable, entity)?;

        let mut json = serde_json::to_value(current)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        merge_patch(&mut json, &patch);
        if let Some(obj) = json.as_object_mut() {
            obj.insert("updatedAt".into(), serde_json::json!(now_rfc3339()));
        }
        serde_json::from_value(json)
            .map_err(|e| ServiceError::Validation(format!("invalid {} patch: {}", entity, e)))
    }

    // ── Generic CRUD helpers ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ServiceError> {
        let json = serde_json::to_string(record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 3;
            cols.push(col);
            placeholders.push(format!("?{}", idx));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.sql.exec(&sql, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                ServiceError::Conflict(format!("{} violates a uniqueness constraint", table))
            } else {
                ServiceError::Storage(msg)
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, ServiceError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ServiceError> {
        let json = serde_json::to_string(record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 2;
            sets.push(format!("{} = ?{}", col, idx));
            params.push(val.clone());
        }

        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            sets.join(", "),
            id_idx,
        );

        let affected = self.sql.exec(&sql, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                ServiceError::Conflict(format!("{} violates a uniqueness constraint", table))
            } else {
                ServiceError::Storage(msg)
            }
        })?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("{}/{}", table, id)));
        }

        Ok(())
    }

    /// Delete a record by id.
    pub(crate) fn delete_record(&self, table: &str, id: &str) -> Result<(), ServiceError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let affected = self
            .sql
            .exec(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(ServiceError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(())
    }

    /// List records with equality filters, an optional LIKE search over
    /// the given text columns, pagination, and a total count.
    pub(crate) fn list_records<T: DeserializeOwned + Serialize>(
        &self,
        table: &str,
        filters: &[(&str, Value)],
        search: Option<(&[&str], &str)>,
        limit: usize,
        offset: usize,
    ) -> Result<ListResult<T>, ServiceError> {
        let mut where_clauses = Vec::new();
        let mut params = Vec::new();

        for (col, val) in filters {
            params.push(val.clone());
            where_clauses.push(format!("{} = ?{}", col, params.len()));
        }

        if let Some((cols, q)) = search {
            params.push(Value::Text(format!("%{}%", q)));
            let idx = params.len();
            let ors: Vec<String> = cols.iter().map(|c| format!("{} LIKE ?{}", c, idx)).collect();
            where_clauses.push(format!("({})", ors.join(" OR ")));
        }

        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) as cnt FROM {}{}", table, where_sql);
        let rows = self
            .sql
            .query(&count_sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let total = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        params.push(Value::Integer(limit as i64));
        let limit_idx = params.len();
        params.push(Value::Integer(offset as i64));
        let offset_idx = params.len();

        let sql = format!(
            "SELECT data FROM {}{} ORDER BY created_at DESC LIMIT ?{} OFFSET ?{}",
            table, where_sql, limit_idx, offset_idx,
        );

        let rows = self
            .sql
            .query(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
            let item: T = serde_json::from_str(data)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            items.push(item);
        }

        Ok(ListResult { items, total })
    }

    /// Count records with equality filters.
    pub(crate) fn count_records(
        &self,
        table: &str,
        filters: &[(&str, Value)],
    ) -> Result<i64, ServiceError> {
        let mut where_clauses = Vec::new();
        let mut params = Vec::new();

        for (col, val) in filters {
            params.push(val.clone());
            where_clauses.push(format!("{} = ?{}", col, params.len()));
        }

        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let sql = format!("SELECT COUNT(*) as cnt FROM {}{}", table, where_sql);
        let rows = self
            .sql
            .query(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> CrmService {
    let sql = Arc::new(kontor_sql::SqliteStore::open_in_memory().unwrap());
    CrmService::new(sql).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;

    #[test]
    fn check_fillable_rejects_unknown_key() {
        let input = serde_json::json!({"name": "Ana", "isAdmin": true});
        let err = CrmService::check_fillable(&input, Person::FILLABLE, "person").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("isAdmin"));
    }

    #[test]
    fn check_fillable_rejects_non_object() {
        let err =
            CrmService::check_fillable(&serde_json::json!([1, 2]), Person::FILLABLE, "person")
                .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn build_from_input_applies_defaults_and_casts() {
        let person: Person = CrmService::build_from_input(
            serde_json::json!({"name": "Ana", "email": "ana@example.com"}),
            Person::FILLABLE,
            "person",
        )
        .unwrap();
        assert_eq!(person.status, "Activo");
        assert!(person.is_lead());
    }

    #[test]
    fn apply_patch_refreshes_updated_at() {
        let current = Person {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            updated_at: "2020-01-01T00:00:00Z".into(),
            ..Default::default()
        };
        let patched: Person = CrmService::apply_patch(
            &current,
            serde_json::json!({"phone": "+51 999"}),
            Person::FILLABLE,
            "person",
        )
        .unwrap();
        assert_eq!(patched.phone, "+51 999");
        assert_ne!(patched.updated_at, current.updated_at);
    }

    #[test]
    fn apply_patch_rejects_immutable_id() {
        let current = Person::default();
        let err = CrmService::apply_patch(
            &current,
            serde_json::json!({"id": "hijack"}),
            Person::FILLABLE,
            "person",
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
