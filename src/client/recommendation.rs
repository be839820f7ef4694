//! Recommendation Client - reqwest-backed HTTP client for the prediction services
//!
//! One POST per operation, JSON in and out. No retries and no caching; a
//! timeout is only applied when configured.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::classify_regional_rejection;
use super::{ClientError, Endpoint, Recommender};
use crate::config::{DashboardConfig, EndpointConfig, HttpConfig};
use crate::types::{
    CarbonParameters, FertilizerParameters, FertilizerQuery, FertilizerResult,
    OrganicFertilizerResult, PredictionResult, RegionalParameters, RegionalQuery, RegionalResult,
    SoilParameters, SoilSample,
};

/// HTTP client for the four prediction services
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    http: reqwest::Client,
    endpoints: EndpointConfig,
}

impl RecommendationClient {
    /// Create a new client for the given service URLs.
    pub fn new(endpoints: EndpointConfig, http_config: &HttpConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().user_agent(http_config.user_agent.as_str());
        if let Some(secs) = http_config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(ClientError::Setup)?;

        Ok(Self { http, endpoints })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ClientError> {
        Self::new(config.endpoints.clone(), &config.http)
    }

    /// Get configured URL for an endpoint
    pub fn url(&self, endpoint: Endpoint) -> &str {
        self.endpoints.url(endpoint)
    }

    /// POST `body` and return the raw response, mapping transport failures.
    async fn send<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url(endpoint);
        debug!(endpoint = %endpoint, url, "Sending prediction request");

        self.http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| {
                warn!(endpoint = %endpoint, error = %source, "Prediction service unreachable");
                ClientError::Network { endpoint, source }
            })
    }

    /// Decode a 2xx body into `T`, replacing the service's parameter echo
    /// with the parameters actually sent.
    async fn decode<P, T>(
        endpoint: Endpoint,
        resp: reqwest::Response,
        sent: &P,
    ) -> Result<T, ClientError>
    where
        P: Serialize + DeserializeOwned + PartialEq + Sync,
        T: DeserializeOwned,
    {
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| ClientError::Network { endpoint, source })?;
        let decode_err = |reason: String| ClientError::Decode { endpoint, reason };

        let mut body: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| decode_err(e.to_string()))?;
        let sent_value = serde_json::to_value(sent).map_err(|e| decode_err(e.to_string()))?;

        let object = body
            .as_object_mut()
            .ok_or_else(|| decode_err("expected a JSON object".to_string()))?;
        match object.get("input_parameters") {
            None => debug!(endpoint = %endpoint, "Service did not echo input parameters"),
            Some(echo) => {
                let matches = serde_json::from_value::<P>(echo.clone())
                    .map(|e| e == *sent)
                    .unwrap_or(false);
                if !matches {
                    warn!(
                        endpoint = %endpoint,
                        echoed = %echo,
                        sent = %sent_value,
                        "Service echoed different input parameters, keeping the values sent"
                    );
                }
            }
        }
        object.insert("input_parameters".to_string(), sent_value);

        serde_json::from_value(body).map_err(|e| decode_err(e.to_string()))
    }

    /// POST, check status, decode. Any non-2xx is an `Http` error.
    async fn post_json<P, T>(&self, endpoint: Endpoint, body: &P) -> Result<T, ClientError>
    where
        P: Serialize + DeserializeOwned + PartialEq + Sync,
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let resp = self.send(endpoint, body).await?;
        let status = resp.status();

        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Prediction service returned error status");
            return Err(ClientError::http(status.as_u16()));
        }

        let result = Self::decode(endpoint, resp, body).await?;
        info!(
            endpoint = %endpoint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prediction received"
        );
        Ok(result)
    }
}

#[async_trait]
impl Recommender for RecommendationClient {
    async fn predict_soil_carbon(&self, sample: &SoilSample) -> Result<PredictionResult, ClientError> {
        self.post_json(Endpoint::SoilCarbon, &CarbonParameters::from(sample))
            .await
    }

    async fn predict_fertilizer(&self, query: &FertilizerQuery) -> Result<FertilizerResult, ClientError> {
        self.post_json(Endpoint::Fertilizer, &FertilizerParameters::from(query))
            .await
    }

    async fn predict_organic_fertilizer(
        &self,
        sample: &SoilSample,
    ) -> Result<OrganicFertilizerResult, ClientError> {
        self.post_json(Endpoint::OrganicFertilizer, &SoilParameters::from(sample))
            .await
    }

    /// Regional 400s are inspected: unknown counties get a domain message,
    /// other rejections surface the server `detail`.
    async fn predict_regional(&self, query: &RegionalQuery) -> Result<RegionalResult, ClientError> {
        let endpoint = Endpoint::Regional;
        let body = RegionalParameters::from(query);

        let resp = self.send(endpoint, &body).await?;
        match resp.status() {
            StatusCode::BAD_REQUEST => {
                let text = resp
                    .text()
                    .await
                    .map_err(|source| ClientError::Network { endpoint, source })?;
                let err = classify_regional_rejection(&text);
                info!(county = %body.county, crop = %body.crop, error = %err, "Regional request rejected");
                Err(err)
            }
            status if status.is_success() => Self::decode(endpoint, resp, &body).await,
            status => {
                warn!(endpoint = %endpoint, status = status.as_u16(), "Prediction service returned error status");
                Err(ClientError::http(status.as_u16()))
            }
        }
    }
}
