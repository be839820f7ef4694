//! API route definitions
//!
//! - /api/v1/navigation - sidebar entries
//! - /api/v1/dashboard - current view and workflow snapshots
//! - /api/v1/dashboard/:view/{input,submit,reset} - per-view form actions
//! - /api/v1/predict/* - stateless prediction proxies
//! - /health - liveness at the root

use axum::{routing::{get, post}, Router};

use super::handlers::{self, DashboardState};

/// Create all versioned API routes
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/navigation", get(handlers::get_navigation))
        // Stateful dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/dashboard/view", post(handlers::set_view))
        .route("/dashboard/:view/input", post(handlers::update_input))
        .route("/dashboard/:view/submit", post(handlers::submit_view))
        .route("/dashboard/:view/reset", post(handlers::reset_view))
        // Stateless predictions
        .route("/predict/soil-carbon", post(handlers::predict_soil_carbon))
        .route("/predict/fertilizer", post(handlers::predict_fertilizer))
        .route("/predict/fertilizer/combined", post(handlers::predict_fertilizer_combined))
        .route("/predict/organic-fertilizer", post(handlers::predict_organic_fertilizer))
        .route("/predict/regional", post(handlers::predict_regional))
        .with_state(state)
}

/// Health endpoint at root level
pub fn root_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
