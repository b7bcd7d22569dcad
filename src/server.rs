//! JSON query surface for the presentation layer.
//!
//! The store is loaded before the listener binds and shared read-only; each
//! request runs one full recomputation.

use crate::dashboard::{recompute, Dashboard, DashboardQuery, Theme};
use crate::errors::AppError;
use crate::filter::Selection;
use crate::loader::RecordStore;
use crate::types::{MonthOption, RegionOption};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

pub type SharedStore = Arc<RecordStore>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/options", get(options))
        .route("/api/dashboard", get(dashboard_get).post(dashboard_post))
        .with_state(store)
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, store: SharedStore) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub months: Vec<MonthOption>,
    pub regions: Vec<RegionOption>,
}

async fn options(State(store): State<SharedStore>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        months: store.month_options().to_vec(),
        regions: store.region_options().to_vec(),
    })
}

/// Query-string form: `?months=1,2&regions=21,22&theme=dark&legend=false`.
/// An omitted axis means the initial selection; an empty one selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub months: Option<String>,
    pub regions: Option<String>,
    pub theme: Option<String>,
    pub legend: Option<bool>,
}

impl DashboardParams {
    pub fn into_query(self, store: &RecordStore) -> Result<DashboardQuery, AppError> {
        let initial = DashboardQuery::initial(store);
        Ok(DashboardQuery {
            months: match self.months {
                Some(s) => Selection::parse_list(&s)?,
                None => initial.months,
            },
            regions: match self.regions {
                Some(s) => Selection::parse_list(&s)?,
                None => initial.regions,
            },
            theme: match self.theme {
                Some(s) => s.parse::<Theme>()?,
                None => initial.theme,
            },
            show_legend: self.legend.unwrap_or(initial.show_legend),
        })
    }
}

async fn dashboard_get(
    State(store): State<SharedStore>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError> {
    let query = params.into_query(&store)?;
    Ok(Json(recompute(&store, &query)))
}

async fn dashboard_post(
    State(store): State<SharedStore>,
    Json(query): Json<DashboardQuery>,
) -> Json<Dashboard> {
    Json(recompute(&store, &query))
}
