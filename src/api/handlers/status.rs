//! Health and navigation endpoints

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::DashboardState;
use crate::api::envelope::ApiResponse;
use crate::dashboard::{navigation_items, NavigationItem};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health - Liveness check
pub async fn health_check(State(state): State<DashboardState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
    })
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub title: String,
    pub items: Vec<NavigationItem>,
}

/// GET /api/v1/navigation - Dashboard title and sidebar entries
pub async fn get_navigation(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(NavigationResponse {
        title: state.title.clone(),
        items: navigation_items(),
    })
}
