use serde::{Deserialize, Serialize};

/// Enterprise — an organization that owns requirement documents.
/// PK = id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enterprise {
    /// Unique identifier (UUIDv4, no dashes).
    #[serde(default)]
    pub id: String,

    /// Legal or trade name.
    pub name: String,

    /// Tax registration number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    /// Whether the record is active.
    #[serde(default = "default_true")]
    pub active: bool,

    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    #[serde(default)]
    pub updated_at: String,
}

impl Enterprise {
    /// Attributes settable via bulk assignment (create/patch input).
    pub const FILLABLE: &'static [&'static str] = &["name", "taxId", "active"];
}

impl Default for Enterprise {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            tax_id: None,
            active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
