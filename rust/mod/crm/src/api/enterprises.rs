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
use super::{ok_json, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enterprises", post(create_enterprise).get(list_enterprises))
        .route("/enterprises/view", get(enterprises_view))
        .route(
            "/enterprises/{id}",
            get(get_enterprise)
                .patch(update_enterprise)
                .delete(delete_enterprise),
        )
        .route("/enterprises/{id}/requirements", get(enterprise_requirements))
}

#[derive(Deserialize)]
struct EnterpriseQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    q: Option<String>,
}

impl EnterpriseQuery {
    fn params(self) -> ListParams {
        let mut params = ListParams::default();
        if let Some(limit) = self.limit {
            params.limit = limit;
        }
        params.offset = self.offset.unwrap_or_default();
        params.q = self.q;
        params
    }
}

async fn create_enterprise(
    State(svc): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Enterprise>, ServiceError> {
    ok_json(svc.create_enterprise(body))
}

async fn get_enterprise(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Enterprise>, ServiceError> {
    ok_json(svc.get_enterprise(&id))
}

async fn list_enterprises(
    State(svc): State<AppState>,
    Query(q): Query<EnterpriseQuery>,
) -> Result<Json<ListResult<Enterprise>>, ServiceError> {
    ok_json(svc.list_enterprises(&q.params()))
}

async fn enterprises_view(
    State(svc): State<AppState>,
    Query(q): Query<EnterpriseQuery>,
) -> Result<Json<ResourceTable>, ServiceError> {
    let listing = svc.list_enterprises(&q.params())?;
    Ok(Json(ResourceTable::render(&listing.items)))
}

async fn update_enterprise(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Enterprise>, ServiceError> {
    ok_json(svc.update_enterprise(&id, body))
}

async fn delete_enterprise(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_enterprise(&id)?;
    Ok(Json(serde_json::json!({"deleted": id})))
}

async fn enterprise_requirements(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Related<EnterpriseRequirement>>, ServiceError> {
    // Resolving the relation for an unknown id still surfaces 404.
    let enterprise = svc.get_enterprise(&id)?;
    ok_json(svc.enterprise_requirements(&enterprise))
}
