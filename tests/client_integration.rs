//! Recommendation client against a mock prediction service
//!
//! Each test starts an axum server on 127.0.0.1:0 that records request
//! bodies and headers and answers with canned responses.

use smartfarm::client::{ClientError, Endpoint, RecommendationClient, Recommender};
use smartfarm::config::{defaults, EndpointConfig, HttpConfig};
use smartfarm::forms::{FertilizerForm, Form, FormField, RegionalForm};
use smartfarm::types::{FertilizerQuery, RegionalQuery, SampleProfile, SoilSample};
use smartfarm::workflow::{Workflow, WorkflowState};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock service
// ============================================================================

#[derive(Clone, Default)]
struct Mock {
    responses: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

impl Mock {
    fn respond(&self, endpoint: &str, status: StatusCode, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), (status, body));
        self
    }

    fn requests_to(&self, endpoint: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _, _)| e == endpoint)
            .map(|(_, _, body)| body.clone())
            .collect()
    }

    fn content_types(&self) -> Vec<Option<String>> {
        self.requests.lock().unwrap().iter().map(|(_, ct, _)| ct.clone()).collect()
    }
}

async fn handle(
    State(mock): State<Mock>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.requests
        .lock()
        .unwrap()
        .push((endpoint.clone(), content_type, body));

    let responses = mock.responses.lock().unwrap();
    match responses.get(&endpoint) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))),
    }
}

async fn start(mock: &Mock) -> RecommendationClient {
    let app = Router::new()
        .route("/:endpoint", post(handle))
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let endpoints = EndpointConfig::with_base_url(&format!("http://{addr}"));
    RecommendationClient::new(endpoints, &HttpConfig::default()).unwrap()
}

// ============================================================================
// Fixtures
// ============================================================================

fn sample() -> SoilSample {
    SoilSample::new(0.3, 20.0, 5.8, 0.4, SampleProfile::Fertilizer).unwrap()
}

fn fertilizer_query() -> FertilizerQuery {
    FertilizerQuery::new(sample(), "Maize").unwrap()
}

fn fertilizer_response(crop: &str) -> Value {
    json!({
        "primary_recommendation": "DAP",
        "confidence": 81.5,
        "all_recommendations": [
            {"fertilizer": "DAP", "confidence": 81.5},
            {"fertilizer": "NPK 17:17:17", "confidence": 11.0}
        ],
        "input_parameters": {
            "nitrogen_percent": 0.3,
            "phosphorus_ppm": 20.0,
            "soil_ph": 5.8,
            "potassium_meq_percent": 0.4,
            "crop": crop
        },
        "validation_warnings": []
    })
}

fn organic_response() -> Value {
    json!({
        "predicted_rate_tons_per_acre": 3.2,
        "confidence_interval": {"lower": 2.8, "upper": 3.6, "std": 0.2},
        "model_performance": {"test_r2": 0.81, "test_rmse": 0.4, "test_mae": 0.3},
        "input_parameters": {
            "nitrogen_percent": 0.3,
            "phosphorus_ppm": 20.0,
            "soil_ph": 5.8,
            "potassium_meq_percent": 0.4
        },
        "validation_warnings": ["Phosphorus is low for maize"]
    })
}

fn regional_response(county: &str, crop: &str) -> Value {
    json!({
        "primary_recommendation": "CAN",
        "confidence": 64.0,
        "all_recommendations": [
            {"fertilizer": "CAN", "confidence": 64.0, "rank": 1},
            {"fertilizer": "DAP", "confidence": 30.0, "rank": 2}
        ],
        "input_parameters": {"county": county, "crop": crop}
    })
}

// ============================================================================
// Request shapes
// ============================================================================

#[tokio::test]
async fn test_soil_carbon_request_uses_short_names() {
    let mock = Mock::default();
    mock.respond(
        "soil-carbon",
        StatusCode::OK,
        json!({
            "organic_carbon": 2.31,
            "input_parameters": {"nitrogen": 1.2, "phosphorus": 40.0, "ph": 6.5, "potassium": 0.8}
        }),
    );
    let client = start(&mock).await;

    let sample = SoilSample::new(1.2, 40.0, 6.5, 0.8, SampleProfile::SoilCarbon).unwrap();
    let result = client.predict_soil_carbon(&sample).await.unwrap();

    assert_eq!(result.organic_carbon, 2.31);
    assert_eq!(
        mock.requests_to("soil-carbon"),
        [json!({"nitrogen": 1.2, "phosphorus": 40.0, "ph": 6.5, "potassium": 0.8})]
    );
    assert_eq!(mock.content_types(), [Some("application/json".to_string())]);
}

#[tokio::test]
async fn test_fertilizer_request_has_normalized_crop() {
    let mock = Mock::default();
    mock.respond("fertilizer", StatusCode::OK, fertilizer_response("maize"));
    let client = start(&mock).await;

    let result = client.predict_fertilizer(&fertilizer_query()).await.unwrap();

    assert_eq!(result.primary_recommendation, "DAP");
    assert_eq!(
        mock.requests_to("fertilizer"),
        [json!({
            "nitrogen_percent": 0.3,
            "phosphorus_ppm": 20.0,
            "soil_ph": 5.8,
            "potassium_meq_percent": 0.4,
            "crop": "maize"
        })]
    );
}

#[tokio::test]
async fn test_non_2xx_is_http_error() {
    let mock = Mock::default();
    mock.respond("fertilizer", StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "boom"}));
    let client = start(&mock).await;

    let err = client.predict_fertilizer(&fertilizer_query()).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 500");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let mock = Mock::default();
    mock.respond("soil-carbon", StatusCode::OK, json!({"carbon": "lots"}));
    let client = start(&mock).await;

    let err = client.predict_soil_carbon(&sample()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { endpoint: Endpoint::SoilCarbon, .. }));
}

// ============================================================================
// Combined fertilizer call
// ============================================================================

#[tokio::test]
async fn test_combined_sends_both_requests() {
    let mock = Mock::default();
    mock.respond("fertilizer", StatusCode::OK, fertilizer_response("maize"))
        .respond("organic-fertilizer", StatusCode::OK, organic_response());
    let client = start(&mock).await;

    let combined = client.predict_fertilizer_combined(&fertilizer_query()).await.unwrap();

    assert_eq!(combined.fertilizer.primary_recommendation, "DAP");
    assert_eq!(combined.organic.predicted_rate_tons_per_acre, 3.2);
    assert_eq!(combined.organic.validation_warnings, ["Phosphorus is low for maize"]);
    assert_eq!(
        mock.requests_to("organic-fertilizer"),
        [json!({
            "nitrogen_percent": 0.3,
            "phosphorus_ppm": 20.0,
            "soil_ph": 5.8,
            "potassium_meq_percent": 0.4
        })]
    );
}

#[tokio::test]
async fn test_combined_fails_when_organic_fails() {
    let mock = Mock::default();
    mock.respond("fertilizer", StatusCode::OK, fertilizer_response("maize"))
        .respond("organic-fertilizer", StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let client = start(&mock).await;

    let err = client.predict_fertilizer_combined(&fertilizer_query()).await.unwrap_err();
    assert_eq!(err.failed_endpoint(), Some(Endpoint::OrganicFertilizer));
    assert_eq!(
        err.to_string(),
        "Organic fertilizer recommendation request failed: HTTP error! status: 500"
    );
}

// ============================================================================
// Regional
// ============================================================================

#[tokio::test]
async fn test_regional_normalizes_inputs() {
    let mock = Mock::default();
    mock.respond("regional", StatusCode::OK, regional_response("Kiambu", "maize"));
    let client = start(&mock).await;

    let query = RegionalQuery::new("kiambu", "MAIZE").unwrap();
    let result = client.predict_regional(&query).await.unwrap();

    assert_eq!(mock.requests_to("regional"), [json!({"county": "Kiambu", "crop": "maize"})]);
    assert_eq!(result.all_recommendations[1].rank, 2);
}

#[tokio::test]
async fn test_regional_unknown_county_message() {
    let mock = Mock::default();
    mock.respond(
        "regional",
        StatusCode::BAD_REQUEST,
        json!({"detail": "Unknown county: Atlantis"}),
    );
    let client = start(&mock).await;

    let query = RegionalQuery::new("atlantis", "maize").unwrap();
    let err = client.predict_regional(&query).await.unwrap_err();
    assert!(matches!(err, ClientError::Domain(_)));
    assert_eq!(err.to_string(), defaults::UNKNOWN_COUNTY_MESSAGE);
}

#[tokio::test]
async fn test_regional_other_rejection_is_verbatim() {
    let mock = Mock::default();
    mock.respond(
        "regional",
        StatusCode::BAD_REQUEST,
        json!({"detail": "Crop 'kale' is not supported in Meru"}),
    );
    let client = start(&mock).await;

    let query = RegionalQuery::new("Meru", "kale").unwrap();
    let err = client.predict_regional(&query).await.unwrap_err();
    assert_eq!(err.to_string(), "Crop 'kale' is not supported in Meru");
}

#[tokio::test]
async fn test_regional_server_error_is_generic_http() {
    let mock = Mock::default();
    mock.respond("regional", StatusCode::SERVICE_UNAVAILABLE, json!({"detail": "down"}));
    let client = start(&mock).await;

    let query = RegionalQuery::new("Meru", "maize").unwrap();
    let err = client.predict_regional(&query).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 503");
}

// ============================================================================
// Echo reconciliation
// ============================================================================

#[tokio::test]
async fn test_echo_drift_keeps_sent_values() {
    let mock = Mock::default();
    // Service echoes a different crop than we sent
    mock.respond("fertilizer", StatusCode::OK, fertilizer_response("beans"));
    let client = start(&mock).await;

    let result = client.predict_fertilizer(&fertilizer_query()).await.unwrap();
    assert_eq!(result.input_parameters.crop, "maize");
}

#[tokio::test]
async fn test_missing_echo_is_filled_in() {
    let mock = Mock::default();
    mock.respond("soil-carbon", StatusCode::OK, json!({"organic_carbon": 1.9}));
    let client = start(&mock).await;

    let result = client.predict_soil_carbon(&sample()).await.unwrap();
    assert_eq!(result.input_parameters.nitrogen, 0.3);
    assert_eq!(result.input_parameters.ph, 5.8);
}

// ============================================================================
// Workflow end to end
// ============================================================================

#[tokio::test]
async fn test_workflow_validation_failure_sends_nothing() {
    let mock = Mock::default();
    let client = start(&mock).await;

    let mut workflow: Workflow<FertilizerForm, _> = Workflow::new();
    workflow.handle_input_change(FormField::Nitrogen, "0.3").unwrap();
    workflow.handle_input_change(FormField::Crop, "maize").unwrap();

    let state = workflow
        .submit(|q| async move { client.predict_fertilizer_combined(&q).await })
        .await;
    assert_eq!(state.error(), Some("Please fill in all fields"));
    assert!(mock.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_workflow_regional_round_trip() {
    let mock = Mock::default();
    mock.respond("regional", StatusCode::OK, regional_response("Kiambu", "maize"));
    let client = start(&mock).await;

    let form = RegionalForm::new(" kiambu ", "Maize");
    let query = form.validate().unwrap();
    assert_eq!(query.county(), "Kiambu");

    let mut workflow: Workflow<RegionalForm, _> = Workflow::new();
    workflow.handle_input_change(FormField::County, " kiambu ").unwrap();
    workflow.handle_input_change(FormField::Crop, "Maize").unwrap();
    let state = workflow
        .submit(|q| async move { client.predict_regional(&q).await })
        .await;

    match state {
        WorkflowState::Succeeded(result) => {
            assert_eq!(result.primary_recommendation, "CAN");
            assert_eq!(result.input_parameters.county, "Kiambu");
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let endpoints = EndpointConfig::with_base_url("http://127.0.0.1:1");
    let client = RecommendationClient::new(endpoints, &HttpConfig::default()).unwrap();

    let err = tokio_test::assert_err!(client.predict_organic_fertilizer(&sample()).await);
    assert!(matches!(err, ClientError::Network { endpoint: Endpoint::OrganicFertilizer, .. }));
}

#[tokio::test]
async fn test_timeout_config_still_succeeds_for_fast_service() {
    let mock = Mock::default();
    mock.respond("soil-carbon", StatusCode::OK, json!({"organic_carbon": 2.0}));
    let base = start(&mock).await;

    let http = HttpConfig {
        timeout_secs: Some(5),
        ..HttpConfig::default()
    };
    let endpoints = EndpointConfig {
        soil_carbon: base.url(Endpoint::SoilCarbon).to_string(),
        ..EndpointConfig::default()
    };
    let client = RecommendationClient::new(endpoints, &http).unwrap();

    let result = tokio_test::assert_ok!(client.predict_soil_carbon(&sample()).await);
    assert_eq!(result.organic_carbon, 2.0);
}
