use serde::{Deserialize, Serialize};

/// Person type: a lead (prospect) or a client.
pub const PERSON_TYPE_LEAD: u32 = 1;
pub const PERSON_TYPE_CLIENT: u32 = 2;

/// Person — a contact with a typed role (lead or client).
/// PK = id.
///
/// `email` and `national_id` (when present) are unique across all
/// persons; the schema enforces this with UNIQUE columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique identifier (UUIDv4, no dashes).
    #[serde(default)]
    pub id: String,

    /// First name.
    pub name: String,

    /// Paternal surname.
    #[serde(default)]
    pub last_name: String,

    /// Maternal surname.
    #[serde(default)]
    pub second_last_name: String,

    /// National identity document number (unique, nullable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,

    /// Email address (unique).
    pub email: String,

    /// Phone number.
    #[serde(default)]
    pub phone: String,

    /// Free-text status, e.g. "Activo". The lead/client distinction
    /// that logic relies on lives in `person_type_id`, not here.
    #[serde(default = "default_status")]
    pub status: String,

    /// Person type: 1 = Lead, 2 = Client.
    #[serde(default = "default_person_type")]
    pub person_type_id: u32,

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

impl Person {
    /// Attributes settable via bulk assignment (create/patch input).
    /// Any other key is rejected with a validation error.
    pub const FILLABLE: &'static [&'static str] = &[
        "name",
        "lastName",
        "secondLastName",
        "nationalId",
        "email",
        "phone",
        "status",
        "personTypeId",
        "active",
    ];

    pub fn is_lead(&self) -> bool {
        self.person_type_id == PERSON_TYPE_LEAD
    }

    pub fn is_client(&self) -> bool {
        self.person_type_id == PERSON_TYPE_CLIENT
    }

    /// Full display name: "name lastName secondLastName".
    pub fn full_name(&self) -> String {
        [&self.name, &self.last_name, &self.second_last_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Person {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            last_name: String::new(),
            second_last_name: String::new(),
            national_id: None,
            email: String::new(),
            phone: String::new(),
            status: default_status(),
            person_type_id: default_person_type(),
            active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

fn default_status() -> String {
    "Activo".to_string()
}

fn default_person_type() -> u32 {
    PERSON_TYPE_LEAD
}

fn default_true() -> bool {
    true
}
