pub mod enterprises;
pub mod persons;
pub mod requirements;

use std::sync::Arc;

use axum::{Json, Router};
use serde::Serialize;

use kontor_core::ServiceError;

use crate::service::CrmService;

/// Shared application state.
pub type AppState = Arc<CrmService>;

/// Build the CRM API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/crm/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(persons::routes())
        .merge(enterprises::routes())
        .merge(requirements::routes())
}

/// Wrap a service result into a JSON response.
pub(crate) fn ok_json<T: Serialize>(
    result: Result<T, ServiceError>,
) -> Result<Json<T>, ServiceError> {
    result.map(Json)
}
