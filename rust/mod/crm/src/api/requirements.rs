use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use kontor_core::{ListParams, ListResult, ServiceError};
use kontor_ui::ResourceTable;

use crate::model::{Enterprise, EnterpriseRequirement, Related};
use crate::service::requirement::RequirementFilters;
use super::{ok_json, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requirements", post(create_requirement).get(list_requirements))
        .route("/requirements/view", get(requirements_view))
        .route(
            "/requirements/{id}",
            get(get_requirement)
                .patch(update_requirement)
                .delete(delete_requirement),
        )
        .route("/requirements/{id}/enterprise", get(requirement_enterprise))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    q: Option<String>,
    enterprise_id: Option<String>,
}

impl RequirementQuery {
    fn split(self) -> (ListParams, RequirementFilters) {
        let mut params = ListParams::default();
        if let Some(limit) = self.limit {
            params.limit = limit;
        }
        params.offset = self.offset.unwrap_or_default();
        params.q = self.q;
        let filters = RequirementFilters {
            enterprise_id: self.enterprise_id,
        };
        (params, filters)
    }
}

async fn create_requirement(
    State(svc): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<EnterpriseRequirement>, ServiceError> {
    ok_json(svc.create_requirement(body))
}

async fn get_requirement(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EnterpriseRequirement>, ServiceError> {
    ok_json(svc.get_requirement(&id))
}

async fn list_requirements(
    State(svc): State<AppState>,
    Query(q): Query<RequirementQuery>,
) -> Result<Json<ListResult<EnterpriseRequirement>>, ServiceError> {
    let (params, filters) = q.split();
    ok_json(svc.list_requirements(&params, &filters))
}

async fn requirements_view(
    State(svc): State<AppState>,
    Query(q): Query<RequirementQuery>,
) -> Result<Json<ResourceTable>, ServiceError> {
    let (params, filters) = q.split();
    let listing = svc.list_requirements(&params, &filters)?;
    Ok(Json(ResourceTable::render(&listing.items)))
}

async fn update_requirement(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<EnterpriseRequirement>, ServiceError> {
    ok_json(svc.update_requirement(&id, body))
}

async fn delete_requirement(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_requirement(&id)?;
    Ok(Json(serde_json::json!({"deleted": id})))
}

async fn requirement_enterprise(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Related<Enterprise>>, ServiceError> {
    let requirement = svc.get_requirement(&id)?;
    ok_json(svc.requirement_enterprise(&requirement))
}
