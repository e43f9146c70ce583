use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use kontor_core::{ListParams, ListResult, ServiceError};
use kontor_ui::ResourceTable;

use crate::model::Person;
use crate::service::person::PersonFilters;
use super::{ok_json, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/persons", post(create_person).get(list_persons))
        .route("/persons/view", get(persons_view))
        .route(
            "/persons/{id}",
            get(get_person).patch(update_person).delete(delete_person),
        )
        .route("/persons/{id}/convert", post(convert_person))
}

// ListParams fields are declared inline rather than flattened; flatten
// breaks numeric query fields under serde_urlencoded.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    q: Option<String>,
    person_type_id: Option<u32>,
    active: Option<bool>,
}

impl PersonQuery {
    fn split(self) -> (ListParams, PersonFilters) {
        let mut params = ListParams::default();
        if let Some(limit) = self.limit {
            params.limit = limit;
        }
        params.offset = self.offset.unwrap_or_default();
        params.q = self.q;
        let filters = PersonFilters {
            person_type_id: self.person_type_id,
            active: self.active,
        };
        (params, filters)
    }
}

async fn create_person(
    State(svc): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Person>, ServiceError> {
    ok_json(svc.create_person(body))
}

async fn get_person(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ServiceError> {
    ok_json(svc.get_person(&id))
}

async fn list_persons(
    State(svc): State<AppState>,
    Query(q): Query<PersonQuery>,
) -> Result<Json<ListResult<Person>>, ServiceError> {
    let (params, filters) = q.split();
    ok_json(svc.list_persons(&params, &filters))
}

async fn persons_view(
    State(svc): State<AppState>,
    Query(q): Query<PersonQuery>,
) -> Result<Json<ResourceTable>, ServiceError> {
    let (params, filters) = q.split();
    let listing = svc.list_persons(&params, &filters)?;
    Ok(Json(ResourceTable::render(&listing.items)))
}

async fn update_person(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Person>, ServiceError> {
    ok_json(svc.update_person(&id, body))
}

async fn delete_person(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_person(&id)?;
    Ok(Json(serde_json::json!({"deleted": id})))
}

async fn convert_person(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ServiceError> {
    ok_json(svc.convert_to_client(&id))
}
