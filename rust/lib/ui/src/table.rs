use serde::Serialize;

/// A table column definition: stable key + display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

/// Per-row actions exposed behind the row's disclosure menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

/// One rendered row: record id plus one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRow {
    pub id: String,
    pub cells: Vec<String>,
    pub actions: Vec<RowAction>,
}

/// A rendered resource listing.
///
/// Rendering is a pure function of the input collection: the same
/// records always produce the same table, and the records are never
/// mutated. An empty collection renders `empty_message`, not a blank view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTable {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<ResourceRow>,
    pub empty_message: String,
}

impl ResourceTable {
    /// Render a collection of records into a table.
    pub fn render<T: ResourceRecord>(records: &[T]) -> Self {
        let rows = records
            .iter()
            .map(|r| ResourceRow {
                id: r.row_id(),
                cells: r.cells(),
                actions: vec![RowAction::View, RowAction::Edit, RowAction::Delete],
            })
            .collect();

        Self {
            title: T::title().to_string(),
            columns: T::columns().to_vec(),
            rows,
            empty_message: T::empty_message().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A domain record that can be rendered as a table row.
pub trait ResourceRecord {
    /// Table title, e.g. "Persons".
    fn title() -> &'static str;

    /// Fixed column set for this resource.
    fn columns() -> &'static [Column];

    /// Message shown when the collection is empty.
    fn empty_message() -> &'static str;

    /// Stable row identifier (the record's primary key).
    fn row_id(&self) -> String;

    /// One cell per column, in column order.
    fn cells(&self) -> Vec<String>;
}

/// Caller-provided row action handlers.
///
/// The table layer performs no persistence itself — dispatch hands the
/// row id to whichever handler the caller wired up. Missing handlers
/// make the action a no-op.
#[derive(Default)]
pub struct RowHandlers<'a> {
    pub on_view: Option<&'a mut dyn FnMut(&str)>,
    pub on_edit: Option<&'a mut dyn FnMut(&str)>,
    pub on_delete: Option<&'a mut dyn FnMut(&str)>,
}

impl<'a> RowHandlers<'a> {
    /// Dispatch a row action to its handler.
    pub fn dispatch(&mut self, action: RowAction, row_id: &str) {
        let handler = match action {
            RowAction::View => self.on_view.as_mut(),
            RowAction::Edit => self.on_edit.as_mut(),
            RowAction::Delete => self.on_delete.as_mut(),
        };
        if let Some(h) = handler {
            h(row_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: String,
        label: String,
    }

    impl ResourceRecord for Item {
        fn title() -> &'static str {
            "Items"
        }
        fn columns() -> &'static [Column] {
            &[Column { key: "label", label: "Label" }]
        }
        fn empty_message() -> &'static str {
            "No items yet."
        }
        fn row_id(&self) -> String {
            self.id.clone()
        }
        fn cells(&self) -> Vec<String> {
            vec![self.label.clone()]
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                id: format!("id-{i}"),
                label: format!("item {i}"),
            })
            .collect()
    }

    #[test]
    fn empty_collection_renders_empty_state() {
        let table = ResourceTable::render::<Item>(&[]);
        assert!(table.is_empty());
        assert_eq!(table.empty_message, "No items yet.");
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn rendering_is_pure() {
        let records = items(3);
        let first = ResourceTable::render(&records);
        let second = ResourceTable::render(&records);
        assert_eq!(first, second);
        assert_eq!(first.rows.len(), 3);
        assert_eq!(first.rows[1].cells, vec!["item 1".to_string()]);
    }

    #[test]
    fn dispatch_routes_to_handler() {
        let mut deleted = Vec::new();
        let mut on_delete = |id: &str| deleted.push(id.to_string());
        let mut handlers = RowHandlers {
            on_delete: Some(&mut on_delete),
            ..Default::default()
        };

        handlers.dispatch(RowAction::Delete, "id-1");
        // No view handler wired: no-op, no panic.
        handlers.dispatch(RowAction::View, "id-1");
        drop(handlers);

        assert_eq!(deleted, vec!["id-1".to_string()]);
    }
}
