//! System-wide default constants.
//!
//! Centralises endpoint URLs and user-facing messages.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Prediction Services
// ============================================================================

/// Soil organic carbon predictor.
pub const SOIL_CARBON_URL: &str = "https://godfreyowino-organic-carbon-predictor.hf.space/predict";

/// Mineral fertilizer recommender.
pub const FERTILIZER_URL: &str =
    "https://godfreyowino-smart-fertilizer-recommender.hf.space/predict";

/// Organic fertilizer rate predictor. Deployment-specific; override in `[endpoints]`.
pub const ORGANIC_FERTILIZER_URL: &str =
    "https://godfreyowino-organic-fertilizer-recommender.hf.space/predict";

/// County-level recommender. Deployment-specific; override in `[endpoints]`.
pub const REGIONAL_URL: &str =
    "https://godfreyowino-regional-fertilizer-recommender.hf.space/predict";

// ============================================================================
// HTTP
// ============================================================================

/// Dashboard API bind address.
pub const SERVER_ADDR: &str = "127.0.0.1:8080";

/// User-Agent sent to the prediction services.
pub const USER_AGENT: &str = concat!("smartfarm-dashboard/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Regional Service Rejections
// ============================================================================

/// Substring the regional service puts in a 400 `detail` for counties outside
/// its training data.
pub const UNKNOWN_COUNTY_MARKER: &str = "Unknown county";

/// Shown instead of the raw server text when the county is unknown.
pub const UNKNOWN_COUNTY_MESSAGE: &str = "Sorry, the model was not trained on data for this county. \
     Please try a neighbouring county.";

/// Shown for a 400 without a usable `detail`.
pub const GENERIC_INVALID_REQUEST_MESSAGE: &str =
    "Invalid request. Please check the county and crop you entered.";

// ============================================================================
// Dashboard
// ============================================================================

pub const DASHBOARD_TITLE: &str = "Smart Farm Dashboard";
