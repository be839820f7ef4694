//! Request payloads and response shapes for the four prediction services.
//!
//! Parameter structs double as the request body and the `input_parameters`
//! echo in each response.

use serde::{Deserialize, Serialize};

use super::{FertilizerQuery, RegionalQuery, SoilSample};

/// Confidence at or above this is rated high.
pub const HIGH_CONFIDENCE_PERCENT: f64 = 70.0;
/// Confidence at or above this (and below high) is rated medium.
pub const MEDIUM_CONFIDENCE_PERCENT: f64 = 50.0;

// ============================================================================
// Confidence Rating
// ============================================================================

/// Display tier for a recommendation confidence percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_percent(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE_PERCENT {
            Self::High
        } else if confidence >= MEDIUM_CONFIDENCE_PERCENT {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Soil-carbon request body. The carbon service uses short field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonParameters {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub ph: f64,
    pub potassium: f64,
}

impl From<&SoilSample> for CarbonParameters {
    fn from(s: &SoilSample) -> Self {
        Self {
            nitrogen: s.nitrogen_percent,
            phosphorus: s.phosphorus_ppm,
            ph: s.soil_ph,
            potassium: s.potassium_meq_percent,
        }
    }
}

/// Organic-fertilizer request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilParameters {
    pub nitrogen_percent: f64,
    pub phosphorus_ppm: f64,
    pub soil_ph: f64,
    pub potassium_meq_percent: f64,
}

impl From<&SoilSample> for SoilParameters {
    fn from(s: &SoilSample) -> Self {
        Self {
            nitrogen_percent: s.nitrogen_percent,
            phosphorus_ppm: s.phosphorus_ppm,
            soil_ph: s.soil_ph,
            potassium_meq_percent: s.potassium_meq_percent,
        }
    }
}

/// Fertilizer request body: soil parameters plus crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerParameters {
    pub nitrogen_percent: f64,
    pub phosphorus_ppm: f64,
    pub soil_ph: f64,
    pub potassium_meq_percent: f64,
    pub crop: String,
}

impl From<&FertilizerQuery> for FertilizerParameters {
    fn from(q: &FertilizerQuery) -> Self {
        let s = q.sample();
        Self {
            nitrogen_percent: s.nitrogen_percent,
            phosphorus_ppm: s.phosphorus_ppm,
            soil_ph: s.soil_ph,
            potassium_meq_percent: s.potassium_meq_percent,
            crop: q.crop().to_string(),
        }
    }
}

/// Regional request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalParameters {
    pub county: String,
    pub crop: String,
}

impl From<&RegionalQuery> for RegionalParameters {
    fn from(q: &RegionalQuery) -> Self {
        Self {
            county: q.county().to_string(),
            crop: q.crop().to_string(),
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Soil organic carbon estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub organic_carbon: f64,
    pub input_parameters: CarbonParameters,
}

/// One ranked fertilizer candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRecommendation {
    pub fertilizer: String,
    pub confidence: f64,
}

impl FertilizerRecommendation {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_percent(self.confidence)
    }
}

/// Mineral fertilizer recommendation for a soil sample and crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerResult {
    pub primary_recommendation: String,
    pub confidence: f64,
    pub all_recommendations: Vec<FertilizerRecommendation>,
    pub input_parameters: FertilizerParameters,
    #[serde(default)]
    pub validation_warnings: Vec<String>,
}

impl FertilizerResult {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_percent(self.confidence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub std: f64,
}

/// Held-out test metrics reported by the organic fertilizer model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub test_r2: f64,
    pub test_rmse: f64,
    pub test_mae: f64,
}

/// Organic fertilizer application rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicFertilizerResult {
    pub predicted_rate_tons_per_acre: f64,
    pub confidence_interval: ConfidenceInterval,
    pub model_performance: ModelPerformance,
    pub input_parameters: SoilParameters,
    #[serde(default)]
    pub validation_warnings: Vec<String>,
}

/// Both halves of the combined fertilizer workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFertilizerResult {
    pub fertilizer: FertilizerResult,
    pub organic: OrganicFertilizerResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub fertilizer: String,
    pub confidence: f64,
    pub rank: u32,
}

impl RankedRecommendation {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_percent(self.confidence)
    }
}

/// Region-based recommendation for a county and crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalResult {
    pub primary_recommendation: String,
    pub confidence: f64,
    pub all_recommendations: Vec<RankedRecommendation>,
    pub input_parameters: RegionalParameters,
}

impl RegionalResult {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_percent(self.confidence)
    }
}
