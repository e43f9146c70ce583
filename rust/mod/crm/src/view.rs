//! Table view-models for the CRM resources.
//!
//! Rendering is pure: it reads the records and produces a
//! `ResourceTable`; deletion and edits go back through the service.

use kontor_ui::{Column, ResourceRecord};

use crate::model::{Enterprise, EnterpriseRequirement, Person};

impl ResourceRecord for Person {
    fn title() -> &'static str {
        "Persons"
    }

    fn columns() -> &'static [Column] {
        &[
            Column { key: "fullName", label: "Full name" },
            Column { key: "email", label: "Email" },
            Column { key: "phone", label: "Phone" },
            Column { key: "type", label: "Type" },
            Column { key: "status", label: "Status" },
        ]
    }

    fn empty_message() -> &'static str {
        "No persons registered yet."
    }

    fn row_id(&self) -> String {
        self.id.clone()
    }

    fn cells(&self) -> Vec<String> {
        let type_label = if self.is_client() { "Client" } else { "Lead" };
        vec![
            self.full_name(),
            self.email.clone(),
            self.phone.clone(),
            type_label.to_string(),
            self.status.clone(),
        ]
    }
}

impl ResourceRecord for Enterprise {
    fn title() -> &'static str {
        "Enterprises"
    }

    fn columns() -> &'static [Column] {
        &[
            Column { key: "name", label: "Name" },
            Column { key: "taxId", label: "Tax ID" },
            Column { key: "active", label: "Active" },
        ]
    }

    fn empty_message() -> &'static str {
        "No enterprises registered yet."
    }

    fn row_id(&self) -> String {
        self.id.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.tax_id.clone().unwrap_or_default(),
            if self.active { "Yes" } else { "No" }.to_string(),
        ]
    }
}

impl ResourceRecord for EnterpriseRequirement {
    fn title() -> &'static str {
        "Enterprise requirements"
    }

    fn columns() -> &'static [Column] {
        &[
            Column { key: "name", label: "Document" },
            Column { key: "extension", label: "Extension" },
            Column { key: "uploadDate", label: "Uploaded" },
            Column { key: "lastUpdated", label: "Last updated" },
        ]
    }

    fn empty_message() -> &'static str {
        "No requirement documents uploaded yet."
    }

    fn row_id(&self) -> String {
        self.id.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.extension.clone(),
            self.upload_date.to_string(),
            self.last_updated.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use kontor_core::ListParams;
    use kontor_ui::{ResourceTable, RowAction, RowHandlers};

    use crate::service::person::PersonFilters;
    use crate::service::test_service;

    #[test]
    fn person_cells_follow_column_order() {
        let svc = test_service();
        let person = svc
            .create_person(serde_json::json!({
                "name": "Ana",
                "lastName": "Quispe",
                "secondLastName": "Rojas",
                "email": "ana@example.com",
                "phone": "+51 987654321",
            }))
            .unwrap();

        let table = ResourceTable::render(&[person]);
        assert_eq!(table.title, "Persons");
        assert_eq!(table.rows[0].cells[0], "Ana Quispe Rojas");
        assert_eq!(table.rows[0].cells[3], "Lead");
        assert_eq!(table.rows[0].cells[4], "Activo");
    }

    #[test]
    fn empty_person_table_keeps_its_message() {
        let table = ResourceTable::render::<crate::model::Person>(&[]);
        assert!(table.is_empty());
        assert_eq!(table.empty_message, "No persons registered yet.");
    }

    #[test]
    fn deleting_a_row_through_handlers_shrinks_the_listing() {
        let svc = test_service();
        svc.seed_demo(3, 7).unwrap();

        let params = ListParams::default();
        let filters = PersonFilters::default();
        let listing = svc.list_persons(&params, &filters).unwrap();
        let table = ResourceTable::render(&listing.items);
        assert_eq!(table.rows.len(), 3);

        let target = table.rows[1].id.clone();
        let mut on_delete = |id: &str| {
            svc.delete_person(id).unwrap();
        };
        let mut handlers = RowHandlers {
            on_delete: Some(&mut on_delete),
            ..Default::default()
        };
        handlers.dispatch(RowAction::Delete, &target);
        drop(handlers);

        let after = svc.list_persons(&params, &filters).unwrap();
        assert_eq!(after.total, 2);
        assert!(after.items.iter().all(|p| p.id != target));
    }
}
