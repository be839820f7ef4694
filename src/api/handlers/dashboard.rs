//! Stateful dashboard endpoints
//!
//! Submitting releases the dashboard lock while the prediction request is
//! in flight. Workflow outcomes (including validation and upstream
//! failures) are part of the returned snapshot, so these endpoints answer
//! 200 unless the request itself is malformed.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{dashboard_error_response, DashboardState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::dashboard::{
    CarbonWorkflow, Dashboard, DashboardError, DashboardView, FertilizerWorkflow, RegionalWorkflow,
};
use crate::forms::FormField;

// ============================================================================
// Snapshots
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DashboardResponse<'a> {
    pub title: &'a str,
    #[serde(flatten)]
    pub dashboard: &'a Dashboard,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WorkflowSnapshot<'a> {
    SoilCarbon(&'a CarbonWorkflow),
    Fertilizer(&'a FertilizerWorkflow),
    Regional(&'a RegionalWorkflow),
}

/// One view's form and state.
#[derive(Debug, Serialize)]
pub struct ViewResponse<'a> {
    pub view: DashboardView,
    pub workflow: WorkflowSnapshot<'a>,
}

fn view_response(dashboard: &Dashboard, view: DashboardView) -> Response {
    let workflow = match view {
        DashboardView::Home => {
            return dashboard_error_response(&DashboardError::NoForm(view));
        }
        DashboardView::SoilCarbon => WorkflowSnapshot::SoilCarbon(dashboard.soil_carbon()),
        DashboardView::Fertilizer => WorkflowSnapshot::Fertilizer(dashboard.fertilizer()),
        DashboardView::Regional => WorkflowSnapshot::Regional(dashboard.regional()),
    };
    ApiResponse::ok(ViewResponse { view, workflow })
}

fn parse_view(raw: &str) -> Result<DashboardView, Response> {
    raw.parse::<DashboardView>()
        .map_err(|msg| ApiErrorResponse::not_found(msg))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/dashboard - Current view and every workflow
pub async fn get_dashboard(State(state): State<DashboardState>) -> Response {
    let dashboard = state.dashboard.read().await;
    ApiResponse::ok(DashboardResponse {
        title: &state.title,
        dashboard: &dashboard,
    })
}

#[derive(Debug, Deserialize)]
pub struct SetViewRequest {
    pub view: DashboardView,
}

/// POST /api/v1/dashboard/view - Switch the selected view
pub async fn set_view(
    State(state): State<DashboardState>,
    Json(request): Json<SetViewRequest>,
) -> Response {
    let mut dashboard = state.dashboard.write().await;
    dashboard.navigate(request.view);
    ApiResponse::ok(DashboardResponse {
        title: &state.title,
        dashboard: &dashboard,
    })
}

#[derive(Debug, Deserialize)]
pub struct InputChangeRequest {
    pub field: String,
    #[serde(deserialize_with = "crate::forms::string_or_number")]
    pub value: String,
}

/// POST /api/v1/dashboard/:view/input - Update one form field
pub async fn update_input(
    State(state): State<DashboardState>,
    Path(view): Path<String>,
    Json(request): Json<InputChangeRequest>,
) -> Response {
    let view = match parse_view(&view) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let field = match request.field.parse::<FormField>() {
        Ok(f) => f,
        Err(e) => return ApiErrorResponse::bad_request(e.to_string()),
    };

    let mut dashboard = state.dashboard.write().await;
    if let Err(e) = dashboard.handle_input_change(view, field, request.value) {
        return dashboard_error_response(&e);
    }
    view_response(&dashboard, view)
}

/// POST /api/v1/dashboard/:view/submit - Validate and run the view's prediction
pub async fn submit_view(
    State(state): State<DashboardState>,
    Path(view): Path<String>,
) -> Response {
    let view = match parse_view(&view) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let pending = {
        let mut dashboard = state.dashboard.write().await;
        match dashboard.begin_submit(view) {
            Ok(p) => p,
            Err(e) => return dashboard_error_response(&e),
        }
    };

    if let Some(pending) = pending {
        info!(view = %view, "Submitting dashboard form");
        let done = pending.execute(state.recommender.as_ref()).await;
        if !state.dashboard.write().await.complete(done) {
            debug!(view = %view, "Submission superseded before it completed");
        }
    }

    let dashboard = state.dashboard.read().await;
    view_response(&dashboard, view)
}

/// POST /api/v1/dashboard/:view/reset - Clear the view's form and result
pub async fn reset_view(
    State(state): State<DashboardState>,
    Path(view): Path<String>,
) -> Response {
    let view = match parse_view(&view) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut dashboard = state.dashboard.write().await;
    if let Err(e) = dashboard.reset(view) {
        return dashboard_error_response(&e);
    }
    view_response(&dashboard, view)
}
