use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json,
};
use serde::Deserialize;

use kontor_core::ServiceError;
use kontor_export::ExportFormat;

use crate::range::TimeRange;
use crate::service::{DashboardService, DashboardSummary};
use crate::settings::{DashboardSettings, SettingsStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
    pub settings: Arc<SettingsStore>,
}

/// Build the dashboard API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/dashboard/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/export", get(export))
        .route("/settings", get(get_settings).put(put_settings))
}

#[derive(Deserialize)]
struct RangeQuery {
    range: Option<String>,
}

impl RangeQuery {
    /// Explicit `?range=` wins; otherwise the stored default applies.
    fn resolve(&self, settings: &SettingsStore) -> Result<TimeRange, ServiceError> {
        match &self.range {
            Some(s) => s.parse().map_err(ServiceError::Validation),
            None => Ok(settings.load()?.default_range),
        }
    }
}

#[derive(Deserialize)]
struct ExportQuery {
    range: Option<String>,
    #[serde(default = "default_format")]
    format: String,
}

fn default_format() -> String {
    "csv".into()
}

async fn summary(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<DashboardSummary>, ServiceError> {
    let range = q.resolve(&state.settings)?;
    state.service.summary(range).map(Json)
}

async fn export(
    State(state): State<AppState>,
    Query(q): Query<ExportQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let range = RangeQuery { range: q.range }.resolve(&state.settings)?;
    let format: ExportFormat = q.format.parse().map_err(ServiceError::Validation)?;
    let bytes = state.service.export(range, format)?;

    let disposition = format!(
        "attachment; filename=\"dashboard-{}.{}\"",
        range.as_str(),
        format.extension(),
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<DashboardSettings>, ServiceError> {
    state.settings.load().map(Json)
}

async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<DashboardSettings>,
) -> Result<Json<DashboardSettings>, ServiceError> {
    state.settings.save(&settings)?;
    Ok(Json(settings))
}
