//! Stateless prediction endpoints: form body in, result out

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::{client_error_response, DashboardState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::client::ClientError;
use crate::forms::{CarbonForm, FertilizerForm, Form, RegionalForm, SoilForm};
use crate::types::SampleProfile;

fn respond<T: Serialize>(outcome: Result<T, ClientError>) -> Response {
    match outcome {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => client_error_response(&e),
    }
}

/// POST /api/v1/predict/soil-carbon
pub async fn predict_soil_carbon(
    State(state): State<DashboardState>,
    Json(form): Json<CarbonForm>,
) -> Response {
    let sample = match form.validate() {
        Ok(s) => s,
        Err(e) => return ApiErrorResponse::validation(e.to_string()),
    };
    respond(state.recommender.predict_soil_carbon(&sample).await)
}

/// POST /api/v1/predict/fertilizer - Mineral fertilizer only
pub async fn predict_fertilizer(
    State(state): State<DashboardState>,
    Json(form): Json<FertilizerForm>,
) -> Response {
    let query = match form.validate() {
        Ok(q) => q,
        Err(e) => return ApiErrorResponse::validation(e.to_string()),
    };
    respond(state.recommender.predict_fertilizer(&query).await)
}

/// POST /api/v1/predict/fertilizer/combined - Mineral and organic together
pub async fn predict_fertilizer_combined(
    State(state): State<DashboardState>,
    Json(form): Json<FertilizerForm>,
) -> Response {
    let query = match form.validate() {
        Ok(q) => q,
        Err(e) => return ApiErrorResponse::validation(e.to_string()),
    };
    respond(state.recommender.predict_fertilizer_combined(&query).await)
}

/// POST /api/v1/predict/organic-fertilizer - Soil parameters, fertilizer ranges
pub async fn predict_organic_fertilizer(
    State(state): State<DashboardState>,
    Json(form): Json<SoilForm>,
) -> Response {
    let sample = match form.parse(SampleProfile::Fertilizer) {
        Ok(s) => s,
        Err(e) => return ApiErrorResponse::validation(e.to_string()),
    };
    respond(state.recommender.predict_organic_fertilizer(&sample).await)
}

/// POST /api/v1/predict/regional
pub async fn predict_regional(
    State(state): State<DashboardState>,
    Json(form): Json<RegionalForm>,
) -> Response {
    let query = match form.validate() {
        Ok(q) => q,
        Err(e) => return ApiErrorResponse::validation(e.to_string()),
    };
    respond(state.recommender.predict_regional(&query).await)
}
