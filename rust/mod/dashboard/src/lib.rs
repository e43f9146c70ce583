//! Dashboard module — aggregated CRM metrics, export, and settings.

pub mod api;
pub mod page;
pub mod range;
pub mod service;
pub mod settings;

use std::sync::Arc;

use axum::Router;

use kontor_core::Module;
use kontor_kv::KVStore;
use kontor_sql::SQLStore;

pub use page::DashboardPage;
pub use range::TimeRange;
pub use service::{DashboardService, DashboardSummary};
pub use settings::{DashboardSettings, SettingsStore};

pub struct DashboardModule {
    service: Arc<DashboardService>,
    settings: Arc<SettingsStore>,
}

impl DashboardModule {
    pub fn new(sql: Arc<dyn SQLStore>, kv: Arc<dyn KVStore>) -> Self {
        Self {
            service: Arc::new(DashboardService::new(sql)),
            settings: Arc::new(SettingsStore::new(kv)),
        }
    }

    pub fn service(&self) -> Arc<DashboardService> {
        self.service.clone()
    }
}

impl Module for DashboardModule {
    fn name(&self) -> &str {
        "dashboard"
    }

    fn routes(&self) -> Router {
        api::router(api::AppState {
            service: self.service.clone(),
            settings: self.settings.clone(),
        })
    }
}
