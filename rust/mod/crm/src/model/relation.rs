use serde::Serialize;

/// Result of resolving a relation accessor.
///
/// Relations are never duck-typed: the variant says whether the accessor
/// produced a single related record (belongs-to), a collection
/// (has-many), or nothing. Resolving a relation of an unsaved record —
/// or one whose foreign key points nowhere — yields `Absent` (belongs-to)
/// or an empty `Many` (has-many), not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Related<T> {
    /// A single related record (belongs-to).
    One(T),
    /// A collection of related records (has-many).
    Many(Vec<T>),
    /// No related record.
    Absent,
}

impl<T> Related<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Related::Absent)
    }

    /// Number of related records: 1, n, or 0.
    pub fn len(&self) -> usize {
        match self {
            Related::One(_) => 1,
            Related::Many(items) => items.len(),
            Related::Absent => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_serialization() {
        let one: Related<u32> = Related::One(7);
        assert_eq!(
            serde_json::to_value(&one).unwrap(),
            serde_json::json!({"kind": "one", "data": 7})
        );

        let absent: Related<u32> = Related::Absent;
        assert_eq!(
            serde_json::to_value(&absent).unwrap(),
            serde_json::json!({"kind": "absent"})
        );
    }

    #[test]
    fn len_by_variant() {
        assert_eq!(Related::One(1).len(), 1);
        assert_eq!(Related::Many(vec![1, 2, 3]).len(), 3);
        assert_eq!(Related::<u32>::Absent.len(), 0);
        assert!(Related::<u32>::Many(vec![]).is_empty());
    }
}
