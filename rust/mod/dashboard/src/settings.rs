use std::sync::Arc;

use serde::{Deserialize, Serialize};

use kontor_core::ServiceError;
use kontor_kv::KVStore;

use crate::range::TimeRange;

const SETTINGS_KEY: &str = "dashboard/settings";

/// Persisted per-deployment dashboard preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    pub default_range: TimeRange,
    pub currency: String,
    pub locale: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_range: TimeRange::Last30Days,
            currency: "PEN".into(),
            locale: "es-PE".into(),
        }
    }
}

/// Settings storage on top of the KV store.
pub struct SettingsStore {
    kv: Arc<dyn KVStore>,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Load settings; a missing document yields the defaults.
    pub fn load(&self) -> Result<DashboardSettings, ServiceError> {
        let bytes = self
            .kv
            .get(SETTINGS_KEY)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        match bytes {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Internal(e.to_string())),
            None => Ok(DashboardSettings::default()),
        }
    }

    pub fn save(&self, settings: &DashboardSettings) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(settings)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv
            .set(SETTINGS_KEY, &bytes)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        tracing::info!(range = %settings.default_range, "dashboard settings saved");
        Ok(())
    }
}
