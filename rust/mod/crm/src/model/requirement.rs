use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// EnterpriseRequirement — an uploaded requirement document belonging
/// to one enterprise (the requirement row stores the foreign key).
///
/// `upload_date <= last_updated` is expected but deliberately not
/// validated: the two dates may be corrected independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseRequirement {
    /// Unique identifier (UUIDv4, no dashes).
    #[serde(default)]
    pub id: String,

    /// Owning enterprise id.
    #[serde(default)]
    pub enterprise_id: String,

    /// Document name.
    pub name: String,

    /// File extension, e.g. "pdf".
    #[serde(default)]
    pub extension: String,

    /// Calendar date of the original upload.
    pub upload_date: NaiveDate,

    /// Calendar date of the last re-upload or correction.
    pub last_updated: NaiveDate,

    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    #[serde(default)]
    pub updated_at: String,
}

impl EnterpriseRequirement {
    /// Attributes settable via bulk assignment (create/patch input).
    pub const FILLABLE: &'static [&'static str] = &[
        "enterpriseId",
        "name",
        "extension",
        "uploadDate",
        "lastUpdated",
    ];
}

impl Default for EnterpriseRequirement {
    fn default() -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            id: String::new(),
            enterprise_id: String::new(),
            name: String::new(),
            extension: String::new(),
            upload_date: today,
            last_updated: today,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
