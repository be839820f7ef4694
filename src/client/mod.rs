//! Recommendation Client: validated queries in, typed predictions out
//!
//! Talks to four hosted prediction services over JSON/HTTP:
//!
//! - **soil-carbon**: organic carbon estimate from NPK + pH
//! - **fertilizer**: mineral fertilizer ranking for a crop
//! - **organic-fertilizer**: organic application rate with model metrics
//! - **regional**: county-level fertilizer ranking
//!
//! [`Recommender`] is the seam the workflows and the HTTP API depend on;
//! [`RecommendationClient`] is the reqwest-backed implementation.

mod error;
mod recommendation;

pub use error::{classify_regional_rejection, ClientError};
pub use recommendation::RecommendationClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{
    CombinedFertilizerResult, FertilizerQuery, FertilizerResult, OrganicFertilizerResult,
    PredictionResult, RegionalQuery, RegionalResult, SoilSample,
};

/// One of the external prediction services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    SoilCarbon,
    Fertilizer,
    OrganicFertilizer,
    Regional,
}

impl Endpoint {
    pub const ALL: [Self; 4] = [
        Self::SoilCarbon,
        Self::Fertilizer,
        Self::OrganicFertilizer,
        Self::Regional,
    ];

    /// Human-readable name used at the start of a sentence.
    pub const fn title(self) -> &'static str {
        match self {
            Self::SoilCarbon => "Soil carbon prediction",
            Self::Fertilizer => "Fertilizer recommendation",
            Self::OrganicFertilizer => "Organic fertilizer recommendation",
            Self::Regional => "Regional recommendation",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SoilCarbon => write!(f, "soil-carbon"),
            Self::Fertilizer => write!(f, "fertilizer"),
            Self::OrganicFertilizer => write!(f, "organic-fertilizer"),
            Self::Regional => write!(f, "regional"),
        }
    }
}

/// Prediction operations consumed by workflows and API handlers.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn predict_soil_carbon(&self, sample: &SoilSample) -> Result<PredictionResult, ClientError>;

    async fn predict_fertilizer(&self, query: &FertilizerQuery) -> Result<FertilizerResult, ClientError>;

    async fn predict_organic_fertilizer(
        &self,
        sample: &SoilSample,
    ) -> Result<OrganicFertilizerResult, ClientError>;

    async fn predict_regional(&self, query: &RegionalQuery) -> Result<RegionalResult, ClientError>;

    /// Fertilizer and organic fertilizer for the same sample, fetched concurrently.
    ///
    /// Both must succeed. The first failure wins and is wrapped with the
    /// endpoint it came from; no partial result is returned.
    async fn predict_fertilizer_combined(
        &self,
        query: &FertilizerQuery,
    ) -> Result<CombinedFertilizerResult, ClientError> {
        let fertilizer = async {
            self.predict_fertilizer(query)
                .await
                .map_err(|e| e.in_sub_request(Endpoint::Fertilizer))
        };
        let organic = async {
            self.predict_organic_fertilizer(query.sample())
                .await
                .map_err(|e| e.in_sub_request(Endpoint::OrganicFertilizer))
        };

        let (fertilizer, organic) = futures::future::try_join(fertilizer, organic).await?;
        Ok(CombinedFertilizerResult { fertilizer, organic })
    }
}
