pub mod api;
pub mod factory;
pub mod model;
pub mod service;
pub mod view;

use std::sync::Arc;

use axum::Router;
use kontor_core::Module;

use service::CrmService;

/// CRM module — persons, enterprises, and enterprise requirements.
pub struct CrmModule {
    service: Arc<CrmService>,
}

impl CrmModule {
    pub fn new(service: CrmService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<CrmService> {
        self.service.clone()
    }
}

impl Module for CrmModule {
    fn name(&self) -> &str {
        "crm"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
